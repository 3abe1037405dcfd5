//! Repository Module
//!
//! Free functions over `&SqlitePool` (or `&mut SqliteConnection` when the
//! call must join a caller-owned transaction).

pub mod call_number;
pub mod cart;
pub mod order;
pub mod product;
pub mod time_slot;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// SQLite reported BUSY/LOCKED or the pool timed out; the statement had no effect
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RepoError {
    /// Whether retrying the same statement may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, RepoError::Busy(_))
    }
}

/// Primary SQLite result codes (extended codes carry these in the low byte)
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut => RepoError::Busy(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return RepoError::Duplicate(db_err.message().to_string());
                }
                let primary = db_err
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                match primary {
                    Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => RepoError::Busy(err.to_string()),
                    _ => RepoError::Database(err.to_string()),
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Busy(msg) => {
                tracing::warn!(error = %msg, "Database busy");
                AppError::new(ErrorCode::SystemBusy)
            }
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: RepoError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err: RepoError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_transient());
    }

    #[test]
    fn test_app_error_conversion() {
        let app: AppError = RepoError::Busy("locked".into()).into();
        assert_eq!(app.code, ErrorCode::SystemBusy);

        let app: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
        assert_eq!(app.message, "bad");
    }
}
