//! Attendance Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::user::UserId;

/// Attendance status (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// Attendance record matching the `attendance` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Student the record belongs to
    #[serde(with = "serde_helpers::record_id")]
    pub student: UserId,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
    pub status: AttendanceStatus,
    /// Faculty member who marked it
    #[serde(with = "serde_helpers::record_id")]
    pub marked_by: UserId,
}

/// Create attendance payload
#[derive(Debug, Clone)]
pub struct AttendanceCreate {
    pub student: UserId,
    pub date: String,
    pub status: AttendanceStatus,
    pub marked_by: UserId,
}
