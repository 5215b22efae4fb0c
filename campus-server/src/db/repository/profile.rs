//! Profile Repository

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Profile, ProfileCreate, ProfileUpdate, UserId};

#[derive(Clone)]
pub struct ProfileRepository {
    base: BaseRepository,
}

impl ProfileRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find profile by owning user id
    pub async fn find_by_user(&self, user: &UserId) -> RepoResult<Option<Profile>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM profile WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?;
        let profiles: Vec<Profile> = result.take(0)?;
        Ok(profiles.into_iter().next())
    }

    /// Create a new profile
    ///
    /// Enforces the one-profile-per-user invariant.
    pub async fn create(&self, data: ProfileCreate) -> RepoResult<Profile> {
        if self.find_by_user(&data.user).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already has a profile",
                data.user
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE profile SET
                    user = $user,
                    name = $name,
                    role = $role,
                    department = $department
                RETURN AFTER"#,
            )
            .bind(("user", data.user))
            .bind(("name", data.name))
            .bind(("role", data.role))
            .bind(("department", data.department))
            .await?;

        let created: Option<Profile> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create profile".to_string()))
    }

    /// Update a profile
    pub async fn update(&self, id: &str, data: ProfileUpdate) -> RepoResult<Profile> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let updated: Option<Profile> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Profile {} not found", id)))
    }
}
