//! HTTP API layer - router, state, and handlers

pub mod health;
pub mod knowledge;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
