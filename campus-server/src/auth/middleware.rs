//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件。
//! 流水线是严格的线性组合：先认证，再执行零个或多个
//! 授权检查，任何一步失败立即短路返回。

use std::future::Future;
use std::pin::Pin;

use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::context::{owns_or_admin, permits};
use crate::auth::{AuthContext, JwtError, JwtService, Role};
use crate::core::ServerState;
use crate::db::repository::{ProfileRepository, RepoError, UserRepository};
use crate::security_log;
use crate::utils::AppError;

/// 归属检查缓冲请求体的上限
const OWNER_BODY_LIMIT: usize = 64 * 1024;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 然后从数据库解析用户与档案 (两次串行查询，不做缓存)。
/// 成功后将 [`AuthContext`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (含 `/health`)
/// - `/api/auth/login`, `/api/auth/register`
///
/// # 错误处理
///
/// | 情况 | 响应 |
/// |------|------|
/// | 无 Bearer 令牌 | 401 access token required |
/// | 签名或结构无效 | 401 invalid token |
/// | 令牌过期 | 401 token expired |
/// | 用户或档案不存在 | 401 invalid token |
/// | 存储层意外失败 | 500 (详情仅记录日志) |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route = path == "/api/auth/login" || path == "/api/auth/register";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.to_string());

    let ctx = authenticate(&state, auth_header.as_deref(), req.uri()).await?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// 完整的认证流程：令牌校验 + 用户/档案解析
///
/// 档案查询依赖已解析的用户 ID，两次查询串行进行。
pub(crate) async fn authenticate(
    state: &ServerState,
    auth_header: Option<&str>,
    uri: &http::Uri,
) -> Result<AuthContext, AppError> {
    let token = match auth_header.and_then(JwtService::extract_from_header) {
        Some(token) => token,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::MissingToken);
        }
    };

    let jwt_service = state.get_jwt_service();
    let claims = jwt_service.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", uri)
        );
        match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    })?;

    let users = UserRepository::new(state.get_db());
    let user = match users.find_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            security_log!(
                "WARN",
                "auth_identity_missing",
                sub = claims.sub.clone(),
                uri = format!("{:?}", uri)
            );
            return Err(AppError::InvalidToken);
        }
        // 令牌携带的 ID 格式非法，与伪造令牌同样处理
        Err(RepoError::Validation(_)) => return Err(AppError::InvalidToken),
        Err(e) => return Err(AppError::database(e.to_string())),
    };

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("user record missing id"))?;

    let profiles = ProfileRepository::new(state.get_db());
    let profile = match profiles.find_by_user(&user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            security_log!(
                "WARN",
                "auth_profile_missing",
                sub = claims.sub.clone(),
                uri = format!("{:?}", uri)
            );
            return Err(AppError::InvalidToken);
        }
        Err(e) => return Err(AppError::database(e.to_string())),
    };

    Ok(AuthContext {
        user_id: user_id.to_string(),
        email: user.email,
        profile,
    })
}

/// 角色检查中间件 - 要求角色属于指定集合
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// use campus_server::auth::roles::FACULTY_OR_ADMIN;
///
/// Router::new()
///     .route("/api/attendance", post(handler::mark))
///     .layer(middleware::from_fn(require_role(FACULTY_OR_ADMIN)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403，响应携带 `required` 与 `current` 字段
pub fn require_role(
    required: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let ctx = req.auth_context()?;

            let current = ctx.role();
            if !permits(required, current) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = ctx.user_id.clone(),
                    required = format!("{:?}", required),
                    current = current.as_str()
                );
                return Err(AppError::InsufficientRole { required, current });
            }

            Ok(next.run(req).await)
        })
    }
}

/// 归属检查中间件 - 要求调用者就是资源归属者 (或最高管理员)
///
/// `field` 指定携带归属用户 ID 的字段名。路径参数优先于请求体：
/// 仅当路径中没有该字段时才解析 JSON 请求体。两处都没有该字段
/// 视为无法确认归属，拒绝访问。
///
/// # 错误
///
/// 归属不符返回 403 access denied
pub fn require_owner(
    field: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let ctx = req.auth_context()?.clone();

            // 最高管理员无条件放行
            if ctx.role().is_top_admin() {
                return Ok(next.run(req).await);
            }

            let (mut parts, body) = req.into_parts();

            let mut owner = match RawPathParams::from_request_parts(&mut parts, &()).await {
                Ok(params) => params
                    .iter()
                    .find(|(name, _)| *name == field)
                    .map(|(_, value)| value.to_string()),
                Err(_) => None,
            };

            let body = if owner.is_none() && is_json_request(&parts.headers) {
                let bytes = to_bytes(body, OWNER_BODY_LIMIT)
                    .await
                    .map_err(|_| AppError::validation("request body too large"))?;
                owner = serde_json::from_slice::<serde_json::Value>(&bytes)
                    .ok()
                    .and_then(|value| {
                        value
                            .get(field)
                            .and_then(|v| v.as_str().map(str::to_string))
                    });
                Body::from(bytes)
            } else {
                body
            };

            let Some(owner) = owner else {
                security_log!(
                    "WARN",
                    "ownership_unresolved",
                    user_id = ctx.user_id.clone(),
                    field = field
                );
                return Err(AppError::AccessDenied);
            };

            if !owns_or_admin(&ctx, &owner) {
                security_log!(
                    "WARN",
                    "ownership_denied",
                    user_id = ctx.user_id.clone(),
                    owner = owner.clone(),
                    field = field
                );
                return Err(AppError::AccessDenied);
            }

            Ok(next.run(Request::from_parts(parts, body)).await)
        })
    }
}

fn is_json_request(headers: &http::HeaderMap) -> bool {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// 从请求中提取 AuthContext 的扩展方法
pub trait AuthContextExt {
    /// 从请求扩展中获取 AuthContext
    ///
    /// # 错误
    ///
    /// 未认证返回 401
    fn auth_context(&self) -> Result<&AuthContext, AppError>;
}

impl AuthContextExt for Request {
    fn auth_context(&self) -> Result<&AuthContext, AppError> {
        self.extensions()
            .get::<AuthContext>()
            .ok_or(AppError::MissingToken)
    }
}
