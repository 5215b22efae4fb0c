//! Department API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Department, DepartmentCreate, DepartmentUpdate};
use crate::db::repository::DepartmentRepository;
use crate::utils::AppResult;

/// List all departments
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Department>>> {
    let departments = DepartmentRepository::new(state.get_db()).find_all().await?;
    Ok(Json(departments))
}

/// Create a new department
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<Json<Department>> {
    let department = DepartmentRepository::new(state.get_db())
        .create(payload)
        .await?;
    Ok(Json(department))
}

/// Update a department
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<Json<Department>> {
    let department = DepartmentRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(Json(department))
}

/// Delete a department
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = DepartmentRepository::new(state.get_db())
        .delete(&id)
        .await?;
    Ok(Json(result))
}
