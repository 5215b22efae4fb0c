//! Complaint API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthContext;
use crate::auth::context::normalize_user_id;
use crate::core::ServerState;
use crate::db::models::{Complaint, ComplaintCreate, ComplaintStatus, UserId};
use crate::db::repository::ComplaintRepository;
use crate::utils::{AppError, AppResult};

/// Create complaint payload
#[derive(Debug, Deserialize, Validate)]
pub struct ComplaintCreateRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 40))]
    pub category: String,
}

/// Status change payload
#[derive(Debug, Deserialize)]
pub struct ComplaintStatusRequest {
    pub status: ComplaintStatus,
}

/// File a new complaint (owner is the caller)
pub async fn create(
    State(state): State<ServerState>,
    ctx: AuthContext,
    Json(req): Json<ComplaintCreateRequest>,
) -> AppResult<Json<Complaint>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user: UserId = ctx
        .user_id
        .parse()
        .map_err(|_| AppError::internal("malformed caller id"))?;

    let complaint = ComplaintRepository::new(state.get_db())
        .create(ComplaintCreate {
            user,
            title: req.title,
            description: req.description,
            category: req.category,
        })
        .await?;

    Ok(Json(complaint))
}

/// List all complaints
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Complaint>>> {
    let complaints = ComplaintRepository::new(state.get_db()).find_all().await?;
    Ok(Json(complaints))
}

/// List complaints filed by one user
pub async fn by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Complaint>>> {
    let user: UserId = normalize_user_id(&user_id)
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid user id: {}", user_id)))?;

    let complaints = ComplaintRepository::new(state.get_db())
        .find_by_user(&user)
        .await?;
    Ok(Json(complaints))
}

/// Update complaint status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<ComplaintStatusRequest>,
) -> AppResult<Json<Complaint>> {
    let complaint = ComplaintRepository::new(state.get_db())
        .update_status(&id, req.status)
        .await?;
    Ok(Json(complaint))
}
