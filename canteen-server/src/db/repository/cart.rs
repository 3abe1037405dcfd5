//! Cart Repository

use super::{RepoError, RepoResult};
use shared::models::CartLine;
use sqlx::{SqliteConnection, SqlitePool};

const LINES_SQL: &str = "SELECT c.product_id, p.name, p.price AS unit_price, c.quantity, p.is_available FROM cart_item c JOIN product p ON p.id = c.product_id WHERE c.user_id = ? ORDER BY c.updated_at, c.product_id";

/// Cart lines joined with the current product name, price and availability
pub async fn find_lines(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(LINES_SQL)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(lines)
}

/// Same as [`find_lines`], inside the checkout transaction
pub async fn find_lines_in(conn: &mut SqliteConnection, user_id: &str) -> RepoResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(LINES_SQL)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(lines)
}

/// Set the quantity of a product in the cart (0 removes it)
pub async fn set_quantity(
    pool: &SqlitePool,
    user_id: &str,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    if quantity < 0 {
        return Err(RepoError::Validation("quantity must be >= 0".into()));
    }
    if quantity == 0 {
        sqlx::query("DELETE FROM cart_item WHERE user_id = ? AND product_id = ?")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        return Ok(());
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO cart_item (user_id, product_id, quantity, updated_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(user_id, product_id) DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Empty the cart (runs inside the checkout transaction)
pub async fn clear(conn: &mut SqliteConnection, user_id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
