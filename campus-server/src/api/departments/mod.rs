//! Department API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::auth::roles::MANAGEMENT;
use crate::core::ServerState;

/// Department router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/departments", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可查看
    let read_routes = Router::new().route("/", get(handler::list));

    // 管理路由：管理层 (系主任、院长、超级管理员)
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(MANAGEMENT)));

    read_routes.merge(manage_routes)
}
