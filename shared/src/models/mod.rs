//! Data models
//!
//! Shared between canteen-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); money is integer yen.

pub mod cart;
pub mod order;
pub mod product;
pub mod time_slot;

// Re-exports
pub use cart::*;
pub use order::*;
pub use product::*;
pub use time_slot::*;
