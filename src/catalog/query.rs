//! Catalog query engine
//!
//! Read-only composition over the product and category stores: applies
//! the storefront filters conjunctively and resolves each hit's
//! category links into full objects.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use crate::db::models::{Category, Product};
use crate::db::repository::{BaseRepository, ProductRepository, RepoResult};

/// Storefront listing filters. Absent filters are no-ops.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring match on name or description
    pub search: Option<String>,
    /// Category membership ("category:xxx" or the pure id)
    pub category_id: Option<String>,
    /// Admin-only view; the public listing keeps this false
    pub include_inactive: bool,
}

/// Response view of a product with its category links resolved.
/// Record links flatten to "table:id" strings here; the stored model
/// keeps them native.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategories {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub is_active: bool,
    pub category_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub categories: Vec<Category>,
}

impl ProductWithCategories {
    fn new(product: Product, categories: Vec<Category>) -> Self {
        Self {
            id: product
                .id
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            is_active: product.is_active,
            category_ids: product
                .category_ids
                .iter()
                .map(|t| t.to_string())
                .collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
            categories,
        }
    }
}

#[derive(Clone)]
pub struct QueryEngine {
    base: BaseRepository,
    products: ProductRepository,
}

impl QueryEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    /// Filtered, enriched listing in creation order
    pub async fn query(&self, params: CatalogQuery) -> RepoResult<Vec<ProductWithCategories>> {
        let products = self
            .products
            .search(params.search, params.category_id, params.include_inactive)
            .await?;
        self.enrich(products).await
    }

    /// Single enriched product
    pub async fn get(&self, id: &str) -> RepoResult<Option<ProductWithCategories>> {
        match self.products.find_by_id(id).await? {
            Some(product) => Ok(self.enrich(vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Resolve category links for a batch of products with one query
    async fn enrich(&self, products: Vec<Product>) -> RepoResult<Vec<ProductWithCategories>> {
        let mut wanted: Vec<Thing> = Vec::new();
        for product in &products {
            for link in &product.category_ids {
                if !wanted.contains(link) {
                    wanted.push(link.clone());
                }
            }
        }

        let mut by_id: HashMap<String, Category> = HashMap::new();
        if !wanted.is_empty() {
            let categories: Vec<Category> = self
                .base
                .db()
                .query("SELECT * FROM category WHERE id IN $ids")
                .bind(("ids", wanted))
                .await?
                .take(0)?;
            for category in categories {
                if let Some(id) = &category.id {
                    by_id.insert(id.to_string(), category.clone());
                }
            }
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let categories = product
                    .category_ids
                    .iter()
                    .filter_map(|link| by_id.get(&link.to_string()).cloned())
                    .collect();
                ProductWithCategories::new(product, categories)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::db::models::{CategoryCreate, ProductCreate, ProductUpdate};
    use crate::db::repository::CategoryRepository;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    struct Fixture {
        engine: QueryEngine,
        products: ProductRepository,
        llaveros: String,
        gatos: String,
    }

    /// Three products across two categories:
    /// "Llavero gato" (Llaveros + Gatos), "Llavero perro" (Llaveros),
    /// "Figura gato" (Gatos)
    async fn fixture() -> Fixture {
        let db = connect_memory().await.expect("in-memory db");
        let categories = CategoryRepository::new(db.clone());
        let products = ProductRepository::new(db.clone());

        let llaveros = categories
            .create(CategoryCreate {
                name: "Llaveros".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
            .unwrap()
            .to_string();
        let gatos = categories
            .create(CategoryCreate {
                name: "Gatos".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
            .unwrap()
            .to_string();

        for (name, cats) in [
            ("Llavero gato", vec![llaveros.clone(), gatos.clone()]),
            ("Llavero perro", vec![llaveros.clone()]),
            ("Figura gato", vec![gatos.clone()]),
        ] {
            products
                .create(ProductCreate {
                    name: name.to_string(),
                    description: format!("{} impreso en PLA", name),
                    price: Decimal::from_str("9.99").unwrap(),
                    image_url: None,
                    category_ids: cats,
                    is_active: None,
                })
                .await
                .unwrap();
        }

        Fixture {
            engine: QueryEngine::new(db),
            products,
            llaveros,
            gatos,
        }
    }

    fn names(hits: &[ProductWithCategories]) -> Vec<&str> {
        hits.iter().map(|h| h.name.as_str()).collect()
    }

    #[tokio::test]
    async fn filters_combine_conjunctively() {
        let fx = fixture().await;

        let hits = fx
            .engine
            .query(CatalogQuery {
                search: Some("llavero".to_string()),
                category_id: Some(fx.gatos.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(names(&hits), vec!["Llavero gato"]);

        let hits = fx
            .engine
            .query(CatalogQuery {
                category_id: Some(fx.llaveros.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(names(&hits), vec!["Llavero gato", "Llavero perro"]);
    }

    #[tokio::test]
    async fn no_filters_returns_everything_in_creation_order() {
        let fx = fixture().await;
        let hits = fx.engine.query(CatalogQuery::default()).await.unwrap();
        assert_eq!(
            names(&hits),
            vec!["Llavero gato", "Llavero perro", "Figura gato"]
        );
    }

    #[tokio::test]
    async fn query_is_idempotent() {
        let fx = fixture().await;
        let params = CatalogQuery {
            search: Some("gato".to_string()),
            ..Default::default()
        };
        let first = fx.engine.query(params.clone()).await.unwrap();
        let second = fx.engine.query(params).await.unwrap();
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["Llavero gato", "Figura gato"]);
    }

    #[tokio::test]
    async fn hits_carry_resolved_categories() {
        let fx = fixture().await;
        let hits = fx
            .engine
            .query(CatalogQuery {
                search: Some("llavero gato".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let mut category_names: Vec<&str> =
            hits[0].categories.iter().map(|c| c.name.as_str()).collect();
        category_names.sort_unstable();
        assert_eq!(category_names, vec!["Gatos", "Llaveros"]);
    }

    #[tokio::test]
    async fn inactive_products_are_hidden_unless_requested() {
        let fx = fixture().await;
        let all = fx.products.find_all(true).await.unwrap();
        let perro = all.iter().find(|p| p.name == "Llavero perro").unwrap();
        fx.products
            .update(
                &perro.id.clone().unwrap().to_string(),
                ProductUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let public = fx.engine.query(CatalogQuery::default()).await.unwrap();
        assert_eq!(names(&public), vec!["Llavero gato", "Figura gato"]);

        let admin = fx
            .engine
            .query(CatalogQuery {
                include_inactive: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admin.len(), 3);
    }
}
