//! 工具模块
//!
//! - [`AppError`] / [`ApiResponse`] (from shared::error)
//! - 日志

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
