//! service-core: Shared infrastructure for the collections platform services.
pub mod auth;
pub mod error;
pub mod observability;

pub use axum;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;
