//! Request/response plumbing shared by the API handlers

pub mod envelope;
pub mod error;
pub mod json;
pub mod lenient;

pub use envelope::{DataResponse, SuccessResponse};
pub use error::{ApiError, ApiErrorResponse, GENERIC_ERROR_MESSAGE};
pub use json::Json;
