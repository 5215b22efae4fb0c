//! 角色定义
//!
//! 角色是一个闭集枚举，编译期穷举匹配。
//! 常用的角色组合以常量切片的形式给出 (数据而非函数)，
//! 路由按需组合 [`require_role`](crate::auth::require_role)。

use std::fmt;

use serde::{Deserialize, Serialize};

/// Campus roles (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    HostelWarden,
    MessSupervisor,
    Hod,
    Director,
    SuperAdmin,
}

impl Role {
    /// Wire form of the role (matches the serde representation)
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::HostelWarden => "hostel_warden",
            Role::MessSupervisor => "mess_supervisor",
            Role::Hod => "hod",
            Role::Director => "director",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// 最高管理员角色：归属检查无条件放行
    pub const fn is_top_admin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========== Guard sets (data, not functions) ==========

/// 仅超级管理员
pub const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

/// 教师或超级管理员
pub const FACULTY_OR_ADMIN: &[Role] = &[Role::Faculty, Role::SuperAdmin];

/// 仅学生
pub const STUDENT_ONLY: &[Role] = &[Role::Student];

/// 宿管或超级管理员
pub const WARDEN_OR_ADMIN: &[Role] = &[Role::HostelWarden, Role::SuperAdmin];

/// 食堂主管或超级管理员
pub const MESS_STAFF: &[Role] = &[Role::MessSupervisor, Role::SuperAdmin];

/// 管理层 (系主任、院长、超级管理员)
pub const MANAGEMENT: &[Role] = &[Role::Hod, Role::Director, Role::SuperAdmin];
