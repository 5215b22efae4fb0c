//! User API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::roles::SUPER_ADMIN_ONLY;
use crate::auth::{require_owner, require_role};
use crate::core::ServerState;

/// User router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // 管理路由：仅超级管理员 (角色变更属于提权操作)
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{userId}/profile", put(handler::update_profile))
        .layer(middleware::from_fn(require_role(SUPER_ADMIN_ONLY)));

    // 单用户路由：本人或超级管理员
    let owner_routes = Router::new()
        .route("/{userId}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_owner("userId")));

    admin_routes.merge(owner_routes)
}
