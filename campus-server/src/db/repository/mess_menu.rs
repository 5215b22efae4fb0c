//! Mess Menu Repository

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MealType, MessMenu, MessMenuCreate, MessMenuUpdate};

#[derive(Clone)]
pub struct MessMenuRepository {
    base: BaseRepository,
}

impl MessMenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menus
    pub async fn find_all(&self) -> RepoResult<Vec<MessMenu>> {
        let menus: Vec<MessMenu> = self
            .base
            .db()
            .query("SELECT * FROM mess_menu ORDER BY day")
            .await?
            .take(0)?;
        Ok(menus)
    }

    /// Find the menu for one (day, meal) slot
    pub async fn find_by_slot(&self, day: &str, meal: MealType) -> RepoResult<Option<MessMenu>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM mess_menu WHERE day = $day AND meal = $meal LIMIT 1")
            .bind(("day", day.to_string()))
            .bind(("meal", meal))
            .await?;
        let menus: Vec<MessMenu> = result.take(0)?;
        Ok(menus.into_iter().next())
    }

    /// Create a new menu
    ///
    /// One menu per (day, meal) slot.
    pub async fn create(&self, data: MessMenuCreate) -> RepoResult<MessMenu> {
        if self.find_by_slot(&data.day, data.meal).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu for {} {:?} already exists",
                data.day, data.meal
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE mess_menu SET
                    day = $day,
                    meal = $meal,
                    items = $items
                RETURN AFTER"#,
            )
            .bind(("day", data.day))
            .bind(("meal", data.meal))
            .bind(("items", data.items))
            .await?;

        let created: Option<MessMenu> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create mess menu".to_string()))
    }

    /// Update a menu
    pub async fn update(&self, id: &str, data: MessMenuUpdate) -> RepoResult<MessMenu> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let updated: Option<MessMenu> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Mess menu {} not found", id)))
    }

    /// Delete a menu
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let deleted: Option<MessMenu> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
