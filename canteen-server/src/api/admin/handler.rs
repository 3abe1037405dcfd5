//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{CallNumberStatus, OrderListQuery, OrderView, UpdateOrderStatusRequest};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

pub async fn list_orders(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderView>>>> {
    let range = state.display_range();
    let orders = state.orders.list(&query).await?;
    let views = orders.iter().map(|o| o.to_view(range)).collect();
    Ok(Json(ApiResponse::success(views)))
}

pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = state.orders.update_status(id, payload.status, &user.id).await?;
    Ok(Json(ApiResponse::success(order.to_view(state.display_range()))))
}

pub async fn call_number_status(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<CallNumberStatus>>> {
    let status = state.orders.call_number_status().await?;
    Ok(Json(ApiResponse::success(status)))
}
