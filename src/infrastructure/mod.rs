//! Infrastructure layer - external clients, services, and logging

pub mod logging;
pub mod qdrant;
pub mod services;
