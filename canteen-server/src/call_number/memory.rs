//! In-process call number allocator

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{AllocationError, CallNumberAllocator, CallNumberBackend};

/// Counter guarded by a mutex. Only safe as the single source of truth when
/// exactly one server process runs.
#[derive(Debug)]
pub struct MemoryAllocator {
    next_value: Mutex<i64>,
}

impl MemoryAllocator {
    pub fn new(start: i64) -> Self {
        Self {
            next_value: Mutex::new(start),
        }
    }

    fn take(&self) -> Result<i64, AllocationError> {
        let mut next = self.next_value.lock();
        let issued = *next;
        *next = issued.checked_add(1).ok_or(AllocationError::Exhausted)?;
        Ok(issued)
    }
}

#[async_trait]
impl CallNumberAllocator for MemoryAllocator {
    async fn next(&self) -> Result<i64, AllocationError> {
        self.take()
    }

    async fn peek(&self) -> Result<i64, AllocationError> {
        Ok(*self.next_value.lock())
    }

    fn backend(&self) -> CallNumberBackend {
        CallNumberBackend::Memory
    }

    #[cfg(any(test, feature = "test-util"))]
    async fn reset(&self, start: i64) -> Result<(), AllocationError> {
        *self.next_value.lock() = start;
        Ok(())
    }
}
