//! Category model
//!
//! Tag-like grouping for catalog products. Names are unique
//! case-insensitively; uniqueness is enforced in the repository.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_thing::option",
        default
    )]
    pub id: Option<Thing>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix epoch microseconds; enumeration order key
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}
