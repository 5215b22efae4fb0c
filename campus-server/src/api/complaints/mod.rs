//! Complaint API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::roles::WARDEN_OR_ADMIN;
use crate::auth::{require_owner, require_role};
use crate::core::ServerState;

/// Complaint router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/complaints", routes())
}

fn routes() -> Router<ServerState> {
    // 提交：登录即可，归属者即提交者本人
    let submit_routes = Router::new().route("/", post(handler::create));

    // 处理：宿管或超级管理员
    let warden_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_role(WARDEN_OR_ADMIN)));

    // 单用户的投诉：本人或超级管理员
    let owner_routes = Router::new()
        .route("/user/{userId}", get(handler::by_user))
        .layer(middleware::from_fn(require_owner("userId")));

    submit_routes.merge(warden_routes).merge(owner_routes)
}
