//! Department Repository

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Department, DepartmentCreate, DepartmentUpdate};

#[derive(Clone)]
pub struct DepartmentRepository {
    base: BaseRepository,
}

impl DepartmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all departments
    pub async fn find_all(&self) -> RepoResult<Vec<Department>> {
        let departments: Vec<Department> = self
            .base
            .db()
            .query("SELECT * FROM department ORDER BY name")
            .await?
            .take(0)?;
        Ok(departments)
    }

    /// Find department by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM department WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let departments: Vec<Department> = result.take(0)?;
        Ok(departments.into_iter().next())
    }

    /// Create a new department
    pub async fn create(&self, data: DepartmentCreate) -> RepoResult<Department> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Department '{}' already exists",
                data.name
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE department SET
                    name = $name,
                    code = $code,
                    hod_name = $hod_name
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("code", data.code))
            .bind(("hod_name", data.hod_name))
            .await?;

        let created: Option<Department> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create department".to_string()))
    }

    /// Update a department
    pub async fn update(&self, id: &str, data: DepartmentUpdate) -> RepoResult<Department> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        if let Some(ref new_name) = data.name
            && let Some(existing) = self.find_by_name(new_name).await?
            && existing.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Department '{}' already exists",
                new_name
            )));
        }

        let updated: Option<Department> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Department {} not found", id)))
    }

    /// Delete a department
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let deleted: Option<Department> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
