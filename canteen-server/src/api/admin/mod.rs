//! Admin API 模块 (仅管理员)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/admin/orders | GET | 订单列表 (status, limit, offset) |
//! | /api/admin/orders/{id}/status | PUT | 修改订单状态 |
//! | /api/admin/call-number | GET | 取餐号分配器状态 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list_orders))
        .route("/orders/{id}/status", put(handler::update_status))
        .route("/call-number", get(handler::call_number_status))
        .route_layer(middleware::from_fn(require_admin))
}
