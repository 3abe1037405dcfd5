//! Shared types for the canteen ordering system
//!
//! Models exchanged between the server and its clients, the unified error
//! system, and the call-number display transform.

pub mod call_number;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use call_number::{DisplayRange, to_display_number};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
