//! Mess Menu API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::auth::roles::MESS_STAFF;
use crate::core::ServerState;

/// Mess menu router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/mess-menus", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：登录即可查看
    let read_routes = Router::new().route("/", get(handler::list));

    // 管理路由：食堂主管或超级管理员
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(MESS_STAFF)));

    read_routes.merge(manage_routes)
}
