//! Profile Model
//!
//! 与用户一一对应的档案记录，承载角色与描述性属性。
//! 任何角色门控操作之前，用户必须已经拥有档案。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::user::UserId;
use crate::auth::Role;

/// Profile ID type
pub type ProfileId = RecordId;

/// Profile model matching the `profile` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProfileId>,
    /// Owning user (one-to-one)
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Create profile payload
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub user: UserId,
    pub name: String,
    pub role: Role,
    pub department: Option<String>,
}

/// Update profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}
