//! Order Model (订单)

use serde::{Deserialize, Serialize};

use crate::call_number::DisplayRange;

/// Order lifecycle status
///
/// ```text
/// PENDING ──pay──▶ PAID ──▶ READY ──▶ PICKED_UP
///    │              │
///    └──────────────┴──▶ CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// Placed, awaiting payment
    Pending,
    /// Paid, kitchen is preparing
    Paid,
    /// Ready at the counter, call number announced
    Ready,
    /// Collected by the customer
    PickedUp,
    Cancelled,
}

impl OrderStatus {
    /// Whether a status change from `self` to `next` is allowed
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Paid, Ready)
                | (Ready, PickedUp)
                | (Pending, Cancelled)
                | (Paid, Cancelled)
        )
    }

    /// Terminal orders no longer hold a call number at the counter
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::PickedUp | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Ready => "READY",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Order entity
///
/// `call_number` is the raw allocator value, assigned once at creation and
/// never changed. Use [`Order::to_view`] for anything shown to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub time_slot_id: i64,
    pub status: OrderStatus,
    /// Total in yen
    pub total: i64,
    /// Raw call number
    pub call_number: i64,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Render the order for API responses and receipts
    pub fn to_view(&self, range: &DisplayRange) -> OrderView {
        OrderView {
            id: self.id,
            user_id: self.user_id.clone(),
            time_slot_id: self.time_slot_id,
            status: self.status,
            total: self.total,
            call_number: range.display(self.call_number),
            call_number_raw: self.call_number,
            items: self.items.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Order line (name and price copied at checkout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub line_total: i64,
}

/// Externally visible order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub user_id: String,
    pub time_slot_id: i64,
    pub status: OrderStatus,
    pub total: i64,
    /// Display call number (bounded window)
    pub call_number: i64,
    /// Raw call number, for staff reconciliation
    pub call_number_raw: i64,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload (the cart supplies the items)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub time_slot_id: i64,
}

/// Update order status payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Order list query (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Call number allocator status (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallNumberStatus {
    /// `memory` or `database`
    pub backend: String,
    /// Raw value the next order will receive
    pub next_raw: i64,
    /// Display number the next order will receive
    pub next_display: i64,
    pub display_base: i64,
    pub display_range: i64,
}
