//! Product Repository

use super::{
    BaseRepository, CategoryRepository, RepoError, RepoResult, make_thing, now_micros,
    strip_table_prefix,
};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "product";
const CATEGORY_TABLE: &str = "category";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
    categories: CategoryRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            categories: CategoryRepository::new(db),
        }
    }

    /// Find all products in creation order
    pub async fn find_all(&self, include_inactive: bool) -> RepoResult<Vec<Product>> {
        self.search(None, None, include_inactive).await
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Filtered listing: case-insensitive substring match on name or
    /// description, category membership, active flag. Filters combine
    /// conjunctively; absent filters match everything.
    pub async fn search(
        &self,
        term: Option<String>,
        category_id: Option<String>,
        include_inactive: bool,
    ) -> RepoResult<Vec<Product>> {
        let term = term
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let mut clauses: Vec<&str> = Vec::new();
        if term.is_some() {
            clauses.push(
                "(string::contains(string::lowercase(name), $term) \
                 OR string::contains(string::lowercase(description), $term))",
            );
        }
        if category_id.is_some() {
            clauses.push("category_ids CONTAINS $cat");
        }
        if !include_inactive {
            clauses.push("is_active = true");
        }

        let sql = if clauses.is_empty() {
            "SELECT * FROM product ORDER BY created_at".to_string()
        } else {
            format!(
                "SELECT * FROM product WHERE {} ORDER BY created_at",
                clauses.join(" AND ")
            )
        };

        let mut query = self.base.db().query(sql);
        if let Some(term) = term {
            query = query.bind(("term", term));
        }
        if let Some(cat) = category_id {
            let pure = strip_table_prefix(CATEGORY_TABLE, &cat).to_string();
            query = query.bind(("cat", make_thing(CATEGORY_TABLE, &pure)));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let name = validated_name(&data.name)?;
        let description = validated_description(&data.description)?;
        validate_price(data.price)?;
        let category_ids = self.resolve_categories(&data.category_ids).await?;

        let now = now_micros();
        let product = Product {
            id: None,
            name,
            description,
            price: data.price,
            image_url: data.image_url.unwrap_or_default(),
            is_active: data.is_active.unwrap_or(true),
            category_ids,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update; only supplied fields are validated and written
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let name = data.name.as_deref().map(validated_name).transpose()?;
        let description = data
            .description
            .as_deref()
            .map(validated_description)
            .transpose()?;
        if let Some(price) = data.price {
            validate_price(price)?;
        }
        let category_ids = match data.category_ids {
            Some(ids) => Some(self.resolve_categories(&ids).await?),
            None => None,
        };

        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category_ids: Option<Vec<Thing>>,
            updated_at: i64,
        }

        let update_data = ProductUpdateDb {
            name,
            description,
            price: data.price,
            image_url: data.image_url,
            is_active: data.is_active,
            category_ids,
            updated_at: now_micros(),
        };

        let pure_id = strip_table_prefix(TABLE, id);
        let thing = make_thing(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<Product> = self.base.db().delete((TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Map category id strings to record links, requiring each to exist
    async fn resolve_categories(&self, ids: &[String]) -> RepoResult<Vec<Thing>> {
        let mut things: Vec<Thing> = Vec::with_capacity(ids.len());
        for id in ids {
            let thing = make_thing(CATEGORY_TABLE, strip_table_prefix(CATEGORY_TABLE, id));
            if things.contains(&thing) {
                continue;
            }
            if self.categories.find_by_id(id).await?.is_none() {
                return Err(RepoError::Validation(format!(
                    "Category {} does not exist",
                    id
                )));
            }
            things.push(thing);
        }
        Ok(things)
    }
}

fn validated_name(name: &str) -> RepoResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation(
            "Product name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validated_description(description: &str) -> RepoResult<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(RepoError::Validation(
            "Product description cannot be empty".to_string(),
        ));
    }
    Ok(description.to_string())
}

fn validate_price(price: Decimal) -> RepoResult<()> {
    if price < Decimal::ZERO {
        return Err(RepoError::Validation(
            "Product price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::db::models::CategoryCreate;
    use std::str::FromStr;

    async fn repos() -> (ProductRepository, CategoryRepository) {
        let db = connect_memory().await.expect("in-memory db");
        (
            ProductRepository::new(db.clone()),
            CategoryRepository::new(db),
        )
    }

    fn product(name: &str, price: &str) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            description: format!("{} impreso en PLA", name),
            price: Decimal::from_str(price).unwrap(),
            image_url: None,
            category_ids: vec![],
            is_active: None,
        }
    }

    #[tokio::test]
    async fn price_round_trips_exactly() {
        let (products, _) = repos().await;
        let created = products.create(product("Llavero gato", "19.99")).await.unwrap();
        assert_eq!(created.price, Decimal::from_str("19.99").unwrap());

        let fetched = products
            .find_by_id(&created.id.unwrap().to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.price, Decimal::from_str("19.99").unwrap());
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let (products, _) = repos().await;
        let err = products
            .create(product("Llavero gato", "-0.01"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Zero is a valid price
        products.create(product("Muestra gratis", "0")).await.unwrap();
    }

    #[tokio::test]
    async fn empty_name_and_description_are_rejected() {
        let (products, _) = repos().await;

        let mut data = product("Llavero gato", "5.00");
        data.name = "  ".to_string();
        assert!(matches!(
            products.create(data).await.unwrap_err(),
            RepoError::Validation(_)
        ));

        let mut data = product("Llavero gato", "5.00");
        data.description = "".to_string();
        assert!(matches!(
            products.create(data).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unknown_category_reference_is_rejected() {
        let (products, _) = repos().await;
        let mut data = product("Llavero gato", "5.00");
        data.category_ids = vec!["category:desconocida".to_string()];

        let err = products.create(data).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(products.find_all(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let (products, categories) = repos().await;
        let cat = categories
            .create(CategoryCreate {
                name: "Llaveros".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let cat_id = cat.id.unwrap().to_string();

        let mut data = product("Llavero gato", "5.00");
        data.category_ids = vec![cat_id.clone()];
        let created = products.create(data).await.unwrap();
        let id = created.id.clone().unwrap().to_string();

        let updated = products
            .update(
                &id,
                ProductUpdate {
                    price: Some(Decimal::from_str("7.50").unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::from_str("7.50").unwrap());
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.category_ids, created.category_ids);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_with_unknown_category_leaves_product_unchanged() {
        let (products, _) = repos().await;
        let created = products.create(product("Llavero gato", "5.00")).await.unwrap();
        let id = created.id.clone().unwrap().to_string();

        let err = products
            .update(
                &id,
                ProductUpdate {
                    category_ids: Some(vec!["category:desconocida".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let fetched = products.find_by_id(&id).await.unwrap().unwrap();
        assert!(fetched.category_ids.is_empty());
    }

    #[tokio::test]
    async fn category_links_set_by_update_match_filters_and_delete_guard() {
        let (products, categories) = repos().await;
        let cat = categories
            .create(CategoryCreate {
                name: "Llaveros".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let cat_id = cat.id.unwrap().to_string();

        // Created without categories, linked afterwards
        let created = products.create(product("Llavero gato", "5.00")).await.unwrap();
        let id = created.id.unwrap().to_string();
        products
            .update(
                &id,
                ProductUpdate {
                    category_ids: Some(vec![cat_id.clone()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The link representation matches what the category filter binds
        let hits = products
            .search(None, Some(cat_id.clone()), false)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Llavero gato");

        // And what the referenced-delete guard counts
        let err = categories.delete(&cat_id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn toggling_is_active_controls_default_listing() {
        let (products, _) = repos().await;
        let created = products.create(product("Llavero gato", "5.00")).await.unwrap();
        let id = created.id.unwrap().to_string();

        products
            .update(
                &id,
                ProductUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(products.find_all(false).await.unwrap().is_empty());
        assert_eq!(products.find_all(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_matches_name_or_description_ignoring_case() {
        let (products, _) = repos().await;
        products.create(product("Llavero gato", "5.00")).await.unwrap();
        products.create(product("Soporte auriculares", "12.00")).await.unwrap();

        let hits = products
            .search(Some("LLAVERO".to_string()), None, false)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Llavero gato");

        // Description matches too
        let hits = products
            .search(Some("pla".to_string()), None, false)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = products
            .search(Some("inexistente".to_string()), None, false)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let (products, _) = repos().await;
        let err = products.delete("product:nada").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
