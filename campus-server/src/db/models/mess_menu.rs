//! Mess Menu Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Meal slot (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

/// Mess menu matching the `mess_menu` table; unique per (day, meal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessMenu {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Day of week, lowercase ("monday" .. "sunday")
    pub day: String,
    pub meal: MealType,
    pub items: Vec<String>,
}

/// Create mess menu payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessMenuCreate {
    pub day: String,
    pub meal: MealType,
    pub items: Vec<String>,
}

/// Update mess menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessMenuUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}
