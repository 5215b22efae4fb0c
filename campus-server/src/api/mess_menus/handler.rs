//! Mess Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{MessMenu, MessMenuCreate, MessMenuUpdate};
use crate::db::repository::MessMenuRepository;
use crate::utils::{AppError, AppResult};

const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// List all menus
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MessMenu>>> {
    let menus = MessMenuRepository::new(state.get_db()).find_all().await?;
    Ok(Json(menus))
}

/// Create a menu for one (day, meal) slot
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<MessMenuCreate>,
) -> AppResult<Json<MessMenu>> {
    payload.day = payload.day.to_lowercase();
    if !DAYS.contains(&payload.day.as_str()) {
        return Err(AppError::validation(format!("Invalid day: {}", payload.day)));
    }

    let menu = MessMenuRepository::new(state.get_db())
        .create(payload)
        .await?;
    Ok(Json(menu))
}

/// Update a menu
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MessMenuUpdate>,
) -> AppResult<Json<MessMenu>> {
    let menu = MessMenuRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(Json(menu))
}

/// Delete a menu
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = MessMenuRepository::new(state.get_db()).delete(&id).await?;
    Ok(Json(result))
}
