//! Cart API Handlers

use axum::{Json, extract::State};
use shared::models::{Cart, CartItemUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, cart, product};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

async fn load_cart(state: &ServerState, user_id: &str) -> AppResult<Cart> {
    let lines = cart::find_lines(&state.pool, user_id).await?;
    let total = lines
        .iter()
        .try_fold(0i64, |acc, line| line.line_total().and_then(|t| acc.checked_add(t)))
        .ok_or_else(|| AppError::new(ErrorCode::InvalidPrice))?;
    Ok(Cart {
        user_id: user_id.to_string(),
        lines,
        total,
    })
}

pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = load_cart(&state, &user.id).await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// Set the quantity of one product (0 removes it)
pub async fn set_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    if payload.quantity < 0 {
        return Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", payload.quantity));
    }

    if payload.quantity > 0 {
        let found = product::find_by_id(&state.pool, payload.product_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", payload.product_id)
            })?;
        if !found.is_available {
            return Err(AppError::new(ErrorCode::ProductUnavailable).with_detail("product_id", found.id));
        }
    }

    cart::set_quantity(&state.pool, &user.id, payload.product_id, payload.quantity)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::InvalidQuantity, msg),
            other => other.into(),
        })?;

    let cart = load_cart(&state, &user.id).await?;
    Ok(Json(ApiResponse::success(cart)))
}

pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let mut conn = state.pool.acquire().await.map_err(RepoError::from)?;
    let removed = cart::clear(&mut conn, &user.id).await?;
    tracing::debug!(user_id = %user.id, removed, "Cart cleared");

    let cart = load_cart(&state, &user.id).await?;
    Ok(Json(ApiResponse::success(cart)))
}
