//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | POST | 从购物车下单 |
//! | /api/orders/mine | GET | 我的订单 |
//! | /api/orders/{id} | GET | 订单详情 (本人或管理员) |
//! | /api/orders/{id}/receipt | GET | 取餐小票 (text/plain) |
//! | /api/orders/{id}/payment | POST | 支付确认 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/mine", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/receipt", get(handler::receipt))
        .route("/{id}/payment", post(handler::confirm_payment))
}
