//! Product API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));

    // 菜单维护：仅管理员
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/availability", put(handler::set_availability))
        .route_layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
