//! Attendance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::context::normalize_user_id;
use crate::auth::{AuthContext, Role};
use crate::core::ServerState;
use crate::db::models::{AttendanceCreate, AttendanceRecord, AttendanceStatus, UserId};
use crate::db::repository::{AttendanceRepository, ProfileRepository};
use crate::utils::{AppError, AppResult};

/// Mark attendance payload
#[derive(Debug, Deserialize)]
pub struct AttendanceMarkRequest {
    /// Student user id (bare key or "user:<key>")
    pub student: String,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
    pub status: AttendanceStatus,
}

/// List query
#[derive(Debug, Deserialize)]
pub struct AttendanceListQuery {
    pub date: Option<String>,
}

/// Mark attendance for one student on one date
pub async fn mark(
    State(state): State<ServerState>,
    ctx: AuthContext,
    Json(req): Json<AttendanceMarkRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    chrono::NaiveDate::parse_from_str(&req.date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date: {}", req.date)))?;

    let student: UserId = normalize_user_id(&req.student)
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid student id: {}", req.student)))?;

    let marked_by: UserId = ctx
        .user_id
        .parse()
        .map_err(|_| AppError::internal("malformed caller id"))?;

    // 被登记者必须存在且是学生
    let profile = ProfileRepository::new(state.get_db())
        .find_by_user(&student)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Student {} not found", req.student)))?;
    if profile.role != Role::Student {
        return Err(AppError::validation(format!(
            "User {} is not a student",
            req.student
        )));
    }

    let record = AttendanceRepository::new(state.get_db())
        .create(AttendanceCreate {
            student,
            date: req.date,
            status: req.status,
            marked_by,
        })
        .await?;

    Ok(Json(record))
}

/// List attendance records, optionally filtered by date
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = AttendanceRepository::new(state.get_db())
        .find_all(query.date)
        .await?;
    Ok(Json(records))
}

/// List attendance records for one student
pub async fn by_student(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let student: UserId = normalize_user_id(&user_id)
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid student id: {}", user_id)))?;

    let records = AttendanceRepository::new(state.get_db())
        .find_by_student(&student)
        .await?;
    Ok(Json(records))
}
