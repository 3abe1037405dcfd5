//! Call Number State Repository (Singleton)
//!
//! One row (`id = 1`) holds the next raw call number. Every mutation is a
//! single statement, so SQLite's write lock makes it atomic with respect to
//! other connections and processes sharing the file.

use super::RepoResult;
use sqlx::SqlitePool;

const SINGLETON_ID: i64 = 1;

/// Seed the counter if the row does not exist yet.
///
/// An existing row is left untouched so a restart continues the sequence.
/// Returns the value the next allocation will issue.
pub async fn init(pool: &SqlitePool, start: i64) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO call_number_state (id, next_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    )
    .bind(SINGLETON_ID)
    .bind(start)
    .bind(now)
    .execute(pool)
    .await?;

    let next = peek(pool).await?;
    Ok(next.unwrap_or(start))
}

/// Atomically increment the counter and return the pre-increment value.
///
/// `None` when the singleton row is missing or the counter is at `i64::MAX`.
pub async fn take_next(pool: &SqlitePool) -> RepoResult<Option<i64>> {
    let now = shared::util::now_millis();
    let issued = sqlx::query_scalar::<_, i64>(
        "UPDATE call_number_state SET next_value = next_value + 1, updated_at = ?1 WHERE id = ?2 AND next_value < ?3 RETURNING next_value - 1",
    )
    .bind(now)
    .bind(SINGLETON_ID)
    .bind(i64::MAX)
    .fetch_optional(pool)
    .await?;
    Ok(issued)
}

/// Read the value the next allocation will issue (no increment)
pub async fn peek(pool: &SqlitePool) -> RepoResult<Option<i64>> {
    let next = sqlx::query_scalar::<_, i64>("SELECT next_value FROM call_number_state WHERE id = ?")
        .bind(SINGLETON_ID)
        .fetch_optional(pool)
        .await?;
    Ok(next)
}

/// Overwrite the counter (test harnesses only)
#[cfg(any(test, feature = "test-util"))]
pub async fn reset(pool: &SqlitePool, start: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO call_number_state (id, next_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) ON CONFLICT(id) DO UPDATE SET next_value = excluded.next_value, updated_at = excluded.updated_at",
    )
    .bind(SINGLETON_ID)
    .bind(start)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Highest raw call number already stored on an order
pub async fn max_assigned(pool: &SqlitePool) -> RepoResult<Option<i64>> {
    let max = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(call_number) FROM customer_order")
        .fetch_one(pool)
        .await?;
    Ok(max)
}
