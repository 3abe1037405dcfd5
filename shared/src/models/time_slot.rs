//! Pickup Time Slot Model (取餐时段)

use serde::{Deserialize, Serialize};

/// Capacity-limited pickup time bucket
///
/// `remaining` counts the orders the slot can still accept
/// (`0 <= remaining <= capacity`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeSlot {
    pub id: i64,
    /// Human label, e.g. "12:10-12:20"
    pub label: String,
    /// Slot start (Unix millis)
    pub starts_at: i64,
    pub capacity: i64,
    pub remaining: i64,
    pub created_at: i64,
}

impl TimeSlot {
    pub fn is_full(&self) -> bool {
        self.remaining <= 0
    }
}

/// Create time slot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotCreate {
    pub label: String,
    pub starts_at: i64,
    pub capacity: i64,
}
