//! Cart Model (购物车)

use serde::{Deserialize, Serialize};

/// One product in a user's cart, joined with current product data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub is_available: bool,
}

impl CartLine {
    /// `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Cart view returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub lines: Vec<CartLine>,
    /// Sum of line totals in yen
    pub total: i64,
}

/// Set cart quantity payload (quantity 0 removes the product)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub product_id: i64,
    pub quantity: i64,
}
