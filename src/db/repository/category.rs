//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing, now_micros, strip_table_prefix};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories in creation order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let category: Option<Category> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Find category by name, case-insensitive
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let lowered = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE string::lowercase(name) = $name LIMIT 1")
            .bind(("name", lowered))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }

        // Names are unique ignoring case
        if self.find_by_name(&name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = Category {
            id: None,
            name,
            description: data.description,
            created_at: now_micros(),
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let name = match data.name {
            Some(raw) => {
                let name = raw.trim().to_string();
                if name.is_empty() {
                    return Err(RepoError::Validation(
                        "Category name cannot be empty".to_string(),
                    ));
                }
                // Renaming onto another category's name is a duplicate;
                // changing only the casing of this one is not
                if name.to_lowercase() != existing.name.to_lowercase()
                    && self.find_by_name(&name).await?.is_some()
                {
                    return Err(RepoError::Duplicate(format!(
                        "Category '{}' already exists",
                        name
                    )));
                }
                Some(name)
            }
            None => None,
        };

        #[derive(Serialize)]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
        }

        let update_data = CategoryUpdateDb {
            name,
            description: data.description,
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
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Hard delete a category; refused while any product references it
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);

        let cat_thing = make_thing(TABLE, pure_id);
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE category_ids CONTAINS $cat GROUP ALL")
            .bind(("cat", cat_thing))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;

        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Conflict(
                "Cannot delete a category that products still reference".to_string(),
            ));
        }

        let deleted: Option<Category> = self.base.db().delete((TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::db::models::ProductCreate;
    use crate::db::repository::ProductRepository;
    use rust_decimal::Decimal;

    async fn repo() -> CategoryRepository {
        let db = connect_memory().await.expect("in-memory db");
        CategoryRepository::new(db)
    }

    fn cat(name: &str) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_and_list_in_creation_order() {
        let repo = repo().await;
        repo.create(cat("Llaveros")).await.unwrap();
        repo.create(cat("Soportes")).await.unwrap();
        repo.create(cat("Decoracion")).await.unwrap();

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Llaveros", "Soportes", "Decoracion"]);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_ignoring_case() {
        let repo = repo().await;
        repo.create(cat("Soportes")).await.unwrap();

        let err = repo.create(cat("soportes")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = repo.create(cat("  SOPORTES  ")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let repo = repo().await;
        let err = repo.create(cat("   ")).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn rename_onto_existing_name_is_rejected() {
        let repo = repo().await;
        repo.create(cat("Soportes")).await.unwrap();
        let other = repo.create(cat("Llaveros")).await.unwrap();
        let other_id = other.id.unwrap().to_string();

        let err = repo
            .update(
                &other_id,
                CategoryUpdate {
                    name: Some("SOPORTES".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Changing only the casing of its own name is allowed
        let renamed = repo
            .update(
                &other_id,
                CategoryUpdate {
                    name: Some("LLAVEROS".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "LLAVEROS");
    }

    #[tokio::test]
    async fn update_unknown_category_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update("category:missing", CategoryUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_referenced_category_is_refused() {
        let db = connect_memory().await.expect("in-memory db");
        let categories = CategoryRepository::new(db.clone());
        let products = ProductRepository::new(db);

        let category = categories.create(cat("Llaveros")).await.unwrap();
        let cat_id = category.id.clone().unwrap().to_string();

        products
            .create(ProductCreate {
                name: "Llavero gato".to_string(),
                description: "Llavero con forma de gato".to_string(),
                price: Decimal::new(599, 2),
                image_url: None,
                category_ids: vec![cat_id.clone()],
                is_active: None,
            })
            .await
            .unwrap();

        let err = categories.delete(&cat_id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        // Category and product are both still there, untouched
        let still = categories.find_by_id(&cat_id).await.unwrap().unwrap();
        assert_eq!(still.name, "Llaveros");
        let listed = products.find_all(true).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category_ids.len(), 1);
    }

    #[tokio::test]
    async fn delete_unreferenced_category_succeeds() {
        let repo = repo().await;
        let category = repo.create(cat("Vacia")).await.unwrap();
        let id = category.id.unwrap().to_string();

        repo.delete(&id).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());

        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
