//! Call Number Allocation (取餐号)
//!
//! Every confirmed order gets a raw call number from exactly one allocator
//! per deployment. Raw values are unique and strictly increasing; the
//! customer-facing number is derived on read with [`shared::DisplayRange`].
//!
//! A value handed out by [`CallNumberAllocator::next`] is consumed even if the
//! order that requested it fails afterwards. Gaps in the raw sequence are
//! expected; reissuing a value is never allowed.
//!
//! Two backends:
//! - [`MemoryAllocator`] keeps the counter in process memory (single process)
//! - [`SqliteAllocator`] keeps it in a singleton row, shared by every
//!   process that opens the same database file

mod memory;
mod sqlite;

pub use memory::MemoryAllocator;
pub use sqlite::SqliteAllocator;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use shared::AppError;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::repository::call_number as call_number_repo;

/// Allocation failure. The caller must abort the whole order.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Backing store failed, or stayed busy after all retries
    #[error("call number storage error: {0}")]
    Storage(String),

    /// Database counter row is missing
    #[error("call number counter is not initialized")]
    NotInitialized,

    /// Counter reached i64::MAX
    #[error("call number sequence exhausted")]
    Exhausted,
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        // Cause stays in the log; customers only see "could not be placed"
        tracing::error!(error = %err, "Call number allocation failed");
        AppError::allocation_failed()
    }
}

/// Which allocator implementation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallNumberBackend {
    Memory,
    Database,
}

impl CallNumberBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            CallNumberBackend::Memory => "memory",
            CallNumberBackend::Database => "database",
        }
    }
}

impl fmt::Display for CallNumberBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallNumberBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CallNumberBackend::Memory),
            "database" | "db" | "sqlite" => Ok(CallNumberBackend::Database),
            other => Err(format!("unknown call number backend '{other}' (expected memory|database)")),
        }
    }
}

/// Source of raw call numbers
#[async_trait]
pub trait CallNumberAllocator: Send + Sync + fmt::Debug {
    /// Issue the next raw call number.
    ///
    /// No two successful calls on the same allocator (or on allocators sharing
    /// a backing store) return the same value.
    async fn next(&self) -> Result<i64, AllocationError>;

    /// Value the next call to [`next`](Self::next) would return, without consuming it
    async fn peek(&self) -> Result<i64, AllocationError>;

    fn backend(&self) -> CallNumberBackend;

    /// Discard all state and restart the sequence at `start`.
    ///
    /// Test harnesses only. Not compiled into production builds.
    #[cfg(any(test, feature = "test-util"))]
    async fn reset(&self, start: i64) -> Result<(), AllocationError>;
}

/// Build the configured allocator
///
/// The memory backend never starts below a call number already stored on an
/// order, so a restart cannot collide with orders from a previous run.
pub async fn build_allocator(
    backend: CallNumberBackend,
    start: i64,
    pool: &SqlitePool,
) -> Result<Arc<dyn CallNumberAllocator>, AllocationError> {
    match backend {
        CallNumberBackend::Memory => {
            let max_assigned = call_number_repo::max_assigned(pool)
                .await
                .map_err(|e| AllocationError::Storage(e.to_string()))?;
            let seed = match max_assigned {
                Some(max) if max >= start => max.checked_add(1).ok_or(AllocationError::Exhausted)?,
                _ => start,
            };
            if seed != start {
                tracing::info!(
                    configured_start = start,
                    seed,
                    "Memory call number allocator seeded past existing orders"
                );
            }
            Ok(Arc::new(MemoryAllocator::new(seed)))
        }
        CallNumberBackend::Database => {
            let allocator = SqliteAllocator::init(pool.clone(), start).await?;
            Ok(Arc::new(allocator))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Allocator whose storage is always down
    #[derive(Debug, Default)]
    pub struct FailingAllocator;

    #[async_trait]
    impl CallNumberAllocator for FailingAllocator {
        async fn next(&self) -> Result<i64, AllocationError> {
            Err(AllocationError::Storage("storage unavailable".into()))
        }

        async fn peek(&self) -> Result<i64, AllocationError> {
            Err(AllocationError::Storage("storage unavailable".into()))
        }

        fn backend(&self) -> CallNumberBackend {
            CallNumberBackend::Memory
        }

        async fn reset(&self, _start: i64) -> Result<(), AllocationError> {
            Ok(())
        }
    }
}
