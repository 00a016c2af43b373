//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/categories - all categories in creation order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;

    tracing::info!(name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;

    tracing::info!(id = %id, "Category updated");
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// Refused with a 409 while any product still references the category
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(id = %id, "Category deleted");
    Ok(Json(true))
}
