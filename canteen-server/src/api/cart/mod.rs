//! Cart API 模块 (购物车)
//!
//! The cart belongs to the caller (`X-User-Id`).

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/cart",
        get(handler::get_cart)
            .put(handler::set_item)
            .delete(handler::clear),
    )
}
