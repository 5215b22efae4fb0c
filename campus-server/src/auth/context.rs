//! 请求上下文
//!
//! [`AuthContext`] 由认证中间件在每个请求上构建，
//! 作为不可变值存入请求扩展，请求结束即销毁。
//! 授权谓词是上下文上的纯同步函数，不做任何 I/O。

use crate::auth::Role;
use crate::db::models::Profile;

/// 当前请求的用户上下文
///
/// # 示例
///
/// ```ignore
/// async fn handler(ctx: AuthContext) -> Json<()> {
///     println!("用户: {}, 角色: {}", ctx.email, ctx.role());
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// 用户记录 ID ("user:<key>")
    pub user_id: String,
    /// 用户邮箱
    pub email: String,
    /// 用户档案 (姓名、角色、院系)
    pub profile: Profile,
}

impl AuthContext {
    /// 当前角色
    pub fn role(&self) -> Role {
        self.profile.role
    }
}

/// 角色谓词：当前角色是否属于所需角色集合
pub fn permits(required: &[Role], current: Role) -> bool {
    required.contains(&current)
}

/// 归属谓词：调用者是最高管理员，或资源归属者就是调用者本人
pub fn owns_or_admin(ctx: &AuthContext, owner_id: &str) -> bool {
    ctx.role().is_top_admin() || normalize_user_id(owner_id) == ctx.user_id
}

/// 归一化用户 ID：裸 key 补全为 "user:<key>" 记录形式
pub fn normalize_user_id(raw: &str) -> String {
    if raw.contains(':') {
        raw.to_string()
    } else {
        format!("user:{raw}")
    }
}
