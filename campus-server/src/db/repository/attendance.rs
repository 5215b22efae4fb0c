//! Attendance Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AttendanceCreate, AttendanceRecord, UserId};

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all records, optionally restricted to a date
    pub async fn find_all(&self, date: Option<String>) -> RepoResult<Vec<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = match date {
            Some(date) => self
                .base
                .db()
                .query("SELECT * FROM attendance WHERE date = $date ORDER BY date DESC")
                .bind(("date", date))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM attendance ORDER BY date DESC")
                .await?
                .take(0)?,
        };
        Ok(records)
    }

    /// Find records for one student
    pub async fn find_by_student(&self, student: &UserId) -> RepoResult<Vec<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE student = $student ORDER BY date DESC")
            .bind(("student", student.clone()))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Find a single record for student + date
    pub async fn find_by_student_and_date(
        &self,
        student: &UserId,
        date: &str,
    ) -> RepoResult<Option<AttendanceRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE student = $student AND date = $date LIMIT 1")
            .bind(("student", student.clone()))
            .bind(("date", date.to_string()))
            .await?;
        let records: Vec<AttendanceRecord> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Create a new record
    ///
    /// One record per student per date.
    pub async fn create(&self, data: AttendanceCreate) -> RepoResult<AttendanceRecord> {
        if self
            .find_by_student_and_date(&data.student, &data.date)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Attendance for '{}' on {} already marked",
                data.student, data.date
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE attendance SET
                    student = $student,
                    date = $date,
                    status = $status,
                    marked_by = $marked_by
                RETURN AFTER"#,
            )
            .bind(("student", data.student))
            .bind(("date", data.date))
            .bind(("status", data.status))
            .bind(("marked_by", data.marked_by))
            .await?;

        let created: Option<AttendanceRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create attendance record".to_string()))
    }
}
