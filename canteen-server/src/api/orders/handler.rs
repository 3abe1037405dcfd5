//! Order API Handlers
//!
//! Orders leave the server only as [`OrderView`], which carries the display
//! call number.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use shared::models::{CreateOrderRequest, Order, OrderView};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::time_slot;
use crate::orders::render_receipt;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Owner or staff only
fn ensure_visible(order: &Order, user: &CurrentUser) -> AppResult<()> {
    if order.user_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::PermissionDenied).with_detail("order_id", order.id))
    }
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = state.orders.create_order(&user.id, payload.time_slot_id).await?;
    Ok(Json(ApiResponse::success(order.to_view(state.display_range()))))
}

pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<OrderView>>>> {
    let range = state.display_range();
    let orders = state.orders.list_for_user(&user.id).await?;
    let views = orders.iter().map(|o| o.to_view(range)).collect();
    Ok(Json(ApiResponse::success(views)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = state.orders.get(id).await?;
    ensure_visible(&order, &user)?;
    Ok(Json(ApiResponse::success(order.to_view(state.display_range()))))
}

pub async fn receipt(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let order = state.orders.get(id).await?;
    ensure_visible(&order, &user)?;
    let slot = time_slot::find_by_id(&state.pool, order.time_slot_id).await?;

    let text = render_receipt(&order, slot.as_ref(), state.display_range());
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// Payment provider confirmed the charge (PENDING → PAID)
pub async fn confirm_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = state.orders.mark_paid(&user.id, id).await?;
    Ok(Json(ApiResponse::success(order.to_view(state.display_range()))))
}
