//! Database-backed call number allocator
//!
//! The counter lives in `call_number_state` and is advanced with one
//! `UPDATE ... RETURNING` statement, so allocation is atomic across pool
//! connections and across processes that open the same database file.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{AllocationError, CallNumberAllocator, CallNumberBackend};
use crate::db::repository::{RepoError, call_number as call_number_repo};

/// Attempts per allocation when SQLite reports BUSY/LOCKED
const MAX_RETRY_ATTEMPTS: u32 = 4;
/// Base delay between retries (exponential backoff)
const RETRY_BASE_DELAY_MS: u64 = 20;

#[derive(Debug, Clone)]
pub struct SqliteAllocator {
    pool: SqlitePool,
}

impl SqliteAllocator {
    /// Create the counter row (starting at `start`) if missing.
    /// An existing counter is kept as is.
    pub async fn init(pool: SqlitePool, start: i64) -> Result<Self, AllocationError> {
        let next = call_number_repo::init(&pool, start).await.map_err(storage_error)?;
        tracing::info!(next_raw = next, "Database call number allocator ready");
        Ok(Self { pool })
    }

    /// No row updated: either the counter is missing or it cannot advance
    async fn explain_no_update(&self) -> AllocationError {
        match call_number_repo::peek(&self.pool).await {
            Ok(Some(_)) => AllocationError::Exhausted,
            Ok(None) => AllocationError::NotInitialized,
            Err(e) => storage_error(e),
        }
    }
}

fn storage_error(err: RepoError) -> AllocationError {
    match err {
        RepoError::NotFound(_) => AllocationError::NotInitialized,
        other => AllocationError::Storage(other.to_string()),
    }
}

#[async_trait]
impl CallNumberAllocator for SqliteAllocator {
    async fn next(&self) -> Result<i64, AllocationError> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            match call_number_repo::take_next(&self.pool).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => return Err(self.explain_no_update().await),
                // A busy statement had no effect, so retrying cannot double-issue
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, attempt = attempt + 1, "Call number allocation busy");
                    last_error = Some(e);
                    if attempt + 1 < MAX_RETRY_ATTEMPTS {
                        let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(storage_error(e)),
            }
        }

        Err(last_error
            .map(storage_error)
            .unwrap_or_else(|| AllocationError::Storage("retries exhausted".into())))
    }

    async fn peek(&self) -> Result<i64, AllocationError> {
        call_number_repo::peek(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or(AllocationError::NotInitialized)
    }

    fn backend(&self) -> CallNumberBackend {
        CallNumberBackend::Database
    }

    #[cfg(any(test, feature = "test-util"))]
    async fn reset(&self, start: i64) -> Result<(), AllocationError> {
        call_number_repo::reset(&self.pool, start).await.map_err(storage_error)
    }
}
