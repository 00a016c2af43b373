//! Catalog read side
//!
//! [`QueryEngine`] composes the product store's filtered listing with
//! category enrichment for storefront responses.

pub mod query;

pub use query::{CatalogQuery, ProductWithCategories, QueryEngine};
