//! Success envelopes shared by the knowledge endpoints

use serde::Serialize;

/// `{"data": ...}` wrapper for value-bearing responses.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"success": true}` wrapper for deletions.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
