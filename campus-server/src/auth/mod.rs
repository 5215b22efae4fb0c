//! 认证授权模块
//!
//! 提供 JWT 认证、角色模型和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`Role`] - 角色闭集枚举
//! - [`AuthContext`] - 当前请求的用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_role`] / [`require_owner`] - 授权检查中间件

pub mod context;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod roles;

pub use context::{AuthContext, owns_or_admin, permits};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{AuthContextExt, require_auth, require_owner, require_role};
pub use roles::Role;
