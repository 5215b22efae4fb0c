//! Attendance API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::roles::FACULTY_OR_ADMIN;
use crate::auth::{require_owner, require_role};
use crate::core::ServerState;

/// Attendance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    // 登记与总览：教师或管理员
    let faculty_routes = Router::new()
        .route("/", post(handler::mark).get(handler::list))
        .layer(middleware::from_fn(require_role(FACULTY_OR_ADMIN)));

    // 单个学生的记录：本人或超级管理员
    let owner_routes = Router::new()
        .route("/student/{userId}", get(handler::by_student))
        .layer(middleware::from_fn(require_owner("userId")));

    faculty_routes.merge(owner_routes)
}
