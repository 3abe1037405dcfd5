//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Product, ProductAvailabilityUpdate, ProductCreate};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only products that can be ordered right now
    #[serde(default)]
    pub available: bool,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = if query.available {
        product::find_available(&state.pool).await?
    } else {
        product::find_all(&state.pool).await?
    };
    Ok(Json(ApiResponse::success(products)))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let created = product::create(&state.pool, payload).await?;
    audit_log!(user.id, "create", format!("product:{}", created.id), created.name.clone());
    Ok(Json(ApiResponse::success(created)))
}

pub async fn set_availability(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductAvailabilityUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let updated = product::set_availability(&state.pool, id, payload.is_available)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
            }
            other => other.into(),
        })?;
    audit_log!(
        user.id,
        "update",
        format!("product:{id}"),
        format!("is_available={}", payload.is_available)
    );
    Ok(Json(ApiResponse::success(updated)))
}
