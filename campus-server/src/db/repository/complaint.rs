//! Complaint Repository

use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Complaint, ComplaintCreate, ComplaintStatus, UserId};

#[derive(Clone)]
pub struct ComplaintRepository {
    base: BaseRepository,
}

impl ComplaintRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all complaints, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query("SELECT * FROM complaint ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(complaints)
    }

    /// Find complaints filed by one user
    pub async fn find_by_user(&self, user: &UserId) -> RepoResult<Vec<Complaint>> {
        let complaints: Vec<Complaint> = self
            .base
            .db()
            .query("SELECT * FROM complaint WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(complaints)
    }

    /// Create a new complaint (status starts at `open`)
    pub async fn create(&self, data: ComplaintCreate) -> RepoResult<Complaint> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE complaint SET
                    user = $user,
                    title = $title,
                    description = $description,
                    category = $category,
                    status = $status,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("user", data.user))
            .bind(("title", data.title))
            .bind(("description", data.description))
            .bind(("category", data.category))
            .bind(("status", ComplaintStatus::Open))
            .bind(("created_at", chrono::Utc::now().timestamp()))
            .await?;

        let created: Option<Complaint> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create complaint".to_string()))
    }

    /// Update complaint status
    pub async fn update_status(&self, id: &str, status: ComplaintStatus) -> RepoResult<Complaint> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        #[derive(Serialize)]
        struct StatusPatch {
            status: ComplaintStatus,
        }

        let updated: Option<Complaint> = self
            .base
            .db()
            .update(thing)
            .merge(StatusPatch { status })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Complaint {} not found", id)))
    }
}
