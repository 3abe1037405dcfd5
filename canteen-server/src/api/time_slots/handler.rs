//! Time Slot API Handlers

use axum::{Json, extract::State};
use shared::models::{TimeSlot, TimeSlotCreate};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, time_slot};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<TimeSlot>>>> {
    let slots = time_slot::find_all(&state.pool).await?;
    Ok(Json(ApiResponse::success(slots)))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TimeSlotCreate>,
) -> AppResult<Json<ApiResponse<TimeSlot>>> {
    let capacity = payload.capacity;
    let slot = time_slot::create(&state.pool, payload)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) if capacity < 0 => {
                AppError::with_message(ErrorCode::InvalidCapacity, msg)
            }
            other => other.into(),
        })?;
    audit_log!(
        user.id,
        "create",
        format!("time_slot:{}", slot.id),
        format!("{} capacity={}", slot.label, slot.capacity)
    );
    Ok(Json(ApiResponse::success(slot)))
}
