//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::auth::handler::UserInfo;
use crate::auth::context::normalize_user_id;
use crate::core::ServerState;
use crate::db::models::{Profile, ProfileUpdate};
use crate::db::repository::{ProfileRepository, UserRepository};
use crate::utils::{AppError, AppResult};

/// List all users with their profiles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = UserRepository::new(state.get_db()).find_all().await?;
    let profiles = ProfileRepository::new(state.get_db());

    let mut result = Vec::with_capacity(users.len());
    for user in users {
        let Some(user_id) = user.id.clone() else {
            continue;
        };
        if let Some(profile) = profiles.find_by_user(&user_id).await? {
            result.push(UserInfo {
                id: user_id.to_string(),
                email: user.email,
                name: profile.name,
                role: profile.role,
                department: profile.department,
            });
        }
    }

    Ok(Json(result))
}

/// Get one user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let id = normalize_user_id(&user_id);

    let user = UserRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user_id)))?;

    let record_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("user record missing id"))?;

    let profile = ProfileRepository::new(state.get_db())
        .find_by_user(&record_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} has no profile", user_id)))?;

    Ok(Json(UserInfo {
        id: record_id.to_string(),
        email: user.email,
        name: profile.name,
        role: profile.role,
        department: profile.department,
    }))
}

/// Update a user's profile (name, role, department)
pub async fn update_profile(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    let id = normalize_user_id(&user_id);

    let user = UserRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user_id)))?;

    let record_id = user
        .id
        .ok_or_else(|| AppError::internal("user record missing id"))?;

    let profiles = ProfileRepository::new(state.get_db());
    let profile = profiles
        .find_by_user(&record_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} has no profile", user_id)))?;

    let profile_id = profile
        .id
        .ok_or_else(|| AppError::internal("profile record missing id"))?;

    let updated = profiles.update(&profile_id.to_string(), payload).await?;
    Ok(Json(updated))
}
