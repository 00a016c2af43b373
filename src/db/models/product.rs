//! Product model
//!
//! Catalog entry shown on the storefront. `category_ids` holds record
//! links into the `category` table; every link must resolve at write
//! time (checked in the repository).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_thing::option",
        default
    )]
    pub id: Option<Thing>,
    pub name: String,
    pub description: String,
    /// Exact decimal, never a float
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Native record links so SurrealQL `CONTAINS` comparisons against
    /// a bound Thing match; converted to "table:id" strings at the
    /// response boundary
    #[serde(default)]
    pub category_ids: Vec<Thing>,
    /// Unix epoch microseconds; enumeration order key
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
