//! Order Repository
//!
//! Writes take `&mut SqliteConnection` so the checkout flow can run them in
//! one transaction; reads take the pool.

use super::{RepoError, RepoResult};
use shared::models::{CartLine, Order, OrderItem, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str =
    "SELECT id, user_id, time_slot_id, status, total, call_number, created_at, updated_at FROM customer_order";

/// Upper bound for list page size
pub const MAX_PAGE_SIZE: i64 = 200;

/// Insert the order header. Returns the new order id.
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: &str,
    time_slot_id: i64,
    total: i64,
    call_number: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO customer_order (id, user_id, time_slot_id, status, total, call_number, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(user_id)
    .bind(time_slot_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(total)
    .bind(call_number)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

/// Copy one cart line onto the order
pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    line: &CartLine,
    line_total: i64,
) -> RepoResult<OrderItem> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_item (order_id, product_id, name, unit_price, quantity, line_total) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(order_id)
    .bind(line.product_id)
    .bind(&line.name)
    .bind(line.unit_price)
    .bind(line.quantity)
    .bind(line_total)
    .fetch_one(conn)
    .await?;

    Ok(OrderItem {
        id,
        order_id,
        product_id: line.product_id,
        name: line.name.clone(),
        unit_price: line.unit_price,
        quantity: line.quantity,
        line_total,
    })
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, name, unit_price, quantity, line_total FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Find order by id with items loaded
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(mut order) => {
            order.items = find_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// Newest first, optionally filtered by status
pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let offset = offset.max(0);

    let mut orders = match status {
        Some(status) => {
            let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, Order>(&sql)
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, Order>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    for order in &mut orders {
        order.items = find_items(pool, order.id).await?;
    }
    Ok(orders)
}

pub async fn list_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let mut orders = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    for order in &mut orders {
        order.items = find_items(pool, order.id).await?;
    }
    Ok(orders)
}

/// Move an order from `from` to `to`. Returns `false` if the order is no
/// longer in `from` (lost a race with another update).
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    if !from.can_transition_to(to) {
        return Err(RepoError::Validation(format!(
            "Cannot move order from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE customer_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(to.as_str())
        .bind(now)
        .bind(id)
        .bind(from.as_str())
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Orders still waiting at the counter (not picked up, not cancelled)
pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM customer_order WHERE status NOT IN (?1, ?2)",
    )
    .bind(OrderStatus::PickedUp.as_str())
    .bind(OrderStatus::Cancelled.as_str())
    .fetch_one(pool)
    .await?;
    Ok(count)
}
