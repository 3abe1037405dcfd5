//! Time Slot Repository
//!
//! `remaining` is only ever changed by guarded single-statement updates so
//! concurrent checkouts cannot drive it below zero.

use super::{RepoError, RepoResult};
use shared::models::{TimeSlot, TimeSlotCreate};
use sqlx::{SqliteConnection, SqlitePool};

const SLOT_SELECT: &str = "SELECT id, label, starts_at, capacity, remaining, created_at FROM time_slot";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TimeSlot>> {
    let sql = format!("{SLOT_SELECT} ORDER BY starts_at, id");
    let slots = sqlx::query_as::<_, TimeSlot>(&sql).fetch_all(pool).await?;
    Ok(slots)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TimeSlot>> {
    let sql = format!("{SLOT_SELECT} WHERE id = ?");
    let slot = sqlx::query_as::<_, TimeSlot>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(slot)
}

pub async fn create(pool: &SqlitePool, data: TimeSlotCreate) -> RepoResult<TimeSlot> {
    let label = data.label.trim();
    if label.is_empty() {
        return Err(RepoError::Validation("label cannot be empty".into()));
    }
    if data.capacity < 0 {
        return Err(RepoError::Validation("capacity must be >= 0".into()));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO time_slot (id, label, starts_at, capacity, remaining, created_at) VALUES (?1, ?2, ?3, ?4, ?4, ?5)",
    )
    .bind(id)
    .bind(label)
    .bind(data.starts_at)
    .bind(data.capacity)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create time slot".into()))
}

/// Take one unit of capacity. Returns `false` when the slot is full or missing.
pub async fn reserve(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE time_slot SET remaining = remaining - 1 WHERE id = ? AND remaining > 0")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Give one unit of capacity back (cancellation), never above `capacity`
pub async fn release(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE time_slot SET remaining = MIN(remaining + 1, capacity) WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
