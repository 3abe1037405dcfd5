//! 叫号显示转换
//!
//! The allocator hands out raw, strictly increasing sequence values. Customers
//! never see those: the ticket shows a short number that cycles through a
//! fixed window, like a deli-counter dispenser.
//!
//! ```text
//! display = (raw mod range_size) + base
//! ```
//!
//! With the default window (`base = 201`, `range_size = 99`) every raw value
//! maps into `201..=299`. The mapping is lossy: raw values `range_size` apart
//! share a display number. Only the raw value is unique; the window must be
//! larger than the number of orders waiting for pickup at any one time.

use serde::{Deserialize, Serialize};

/// Default first display number
pub const DEFAULT_DISPLAY_BASE: i64 = 201;
/// Default number of distinct display numbers (201..=299)
pub const DEFAULT_DISPLAY_RANGE: i64 = 99;

/// Map a raw call number into the display window.
///
/// Pure and deterministic. `range_size` must be positive; negative raw values
/// still land inside the window because the remainder is Euclidean.
pub fn to_display_number(raw: i64, base: i64, range_size: i64) -> i64 {
    debug_assert!(range_size > 0, "display range must be positive");
    raw.rem_euclid(range_size) + base
}

/// Display window configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRange {
    /// Smallest display number
    pub base: i64,
    /// Number of distinct display numbers
    pub range_size: i64,
}

impl DisplayRange {
    pub const fn new(base: i64, range_size: i64) -> Self {
        Self { base, range_size }
    }

    /// Apply the transform with this window
    #[inline]
    pub fn display(&self, raw: i64) -> i64 {
        to_display_number(raw, self.base, self.range_size)
    }

    /// Largest display number (inclusive)
    pub fn max(&self) -> i64 {
        self.base + self.range_size - 1
    }

    pub fn contains(&self, display: i64) -> bool {
        (self.base..=self.max()).contains(&display)
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_BASE, DEFAULT_DISPLAY_RANGE)
    }
}
