//! Authentication Handlers
//!
//! Handles registration, login and current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{AuthContext, Role};
use crate::core::ServerState;
use crate::db::models::{ProfileCreate, UserCreate};
use crate::db::repository::{ProfileRepository, UserRepository};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: Role,
    pub department: Option<String>,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token + user info returned by register/login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public view of a user (identity + profile)
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Register handler
///
/// Creates the identity and its profile in one request; every identity
/// must carry a profile before any role-gated call can be authorized.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let users = UserRepository::new(state.get_db());
    let user = users
        .create(UserCreate {
            email: req.email,
            password: req.password,
        })
        .await?;

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("user record missing id"))?;

    let profiles = ProfileRepository::new(state.get_db());
    let profile = profiles
        .create(ProfileCreate {
            user: user_id.clone(),
            name: req.name,
            role: req.role,
            department: req.department,
        })
        .await?;

    let token = state
        .get_jwt_service()
        .generate_token(&user_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        email = %user.email,
        role = %profile.role,
        "User registered"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id.to_string(),
            email: user.email,
            name: profile.name,
            role: profile.role,
            department: profile.department,
        },
    }))
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let users = UserRepository::new(state.get_db());
    let user = users.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // 统一错误消息，避免暴露邮箱是否注册
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::InvalidCredentials);
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::InvalidCredentials);
        }
    };

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("user record missing id"))?;

    // 无档案即无角色，按认证失败处理 (与认证中间件一致)
    let profiles = ProfileRepository::new(state.get_db());
    let profile = profiles.find_by_user(&user_id).await?.ok_or_else(|| {
        tracing::warn!(user_id = %user_id, "Login failed - profile missing");
        AppError::InvalidCredentials
    })?;

    let token = state
        .get_jwt_service()
        .generate_token(&user_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        email = %user.email,
        role = %profile.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id.to_string(),
            email: user.email,
            name: profile.name,
            role: profile.role,
            department: profile.department,
        },
    }))
}

/// Get current user info
pub async fn me(ctx: AuthContext) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: ctx.user_id,
        email: ctx.email,
        name: ctx.profile.name,
        role: ctx.profile.role,
        department: ctx.profile.department,
    }))
}
