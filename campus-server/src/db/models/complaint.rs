//! Complaint Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::user::UserId;

/// Complaint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

/// Complaint model matching the `complaint` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user (the one who filed it)
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub created_at: i64,
}

/// Create complaint payload
#[derive(Debug, Clone)]
pub struct ComplaintCreate {
    pub user: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
}
