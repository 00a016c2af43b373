//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::MaybeUser;
use crate::catalog::{CatalogQuery, ProductWithCategories, QueryEngine};
use crate::core::ServerState;
use crate::db::models::{ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub active_only: Option<bool>,
}

/// GET /api/products - filtered catalog listing
///
/// `active_only` defaults to true; turning it off requires an admin
/// token so inactive products never leak to the storefront.
pub async fn list(
    State(state): State<ServerState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<ProductWithCategories>>> {
    let active_only = params.active_only.unwrap_or(true);
    if !active_only {
        match &user {
            Some(u) if u.is_admin() => {}
            Some(_) => return Err(AppError::forbidden("Administrator role required")),
            None => return Err(AppError::unauthorized()),
        }
    }

    let engine = QueryEngine::new(state.get_db());
    let products = engine
        .query(CatalogQuery {
            search: params.search,
            category_id: params.category_id,
            include_inactive: !active_only,
        })
        .await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - single product with resolved categories
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductWithCategories>> {
    let engine = QueryEngine::new(state.get_db());
    let product = engine
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductWithCategories>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;

    let id = product.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    tracing::info!(id = %id, name = %product.name, "Product created");

    let engine = QueryEngine::new(state.get_db());
    let full = engine
        .get(&id)
        .await?
        .ok_or_else(|| AppError::internal("Failed to load created product"))?;
    Ok(Json(full))
}

/// PUT /api/products/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductWithCategories>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = ProductRepository::new(state.get_db());
    repo.update(&id, payload).await?;

    tracing::info!(id = %id, "Product updated");

    let engine = QueryEngine::new(state.get_db());
    let full = engine
        .get(&id)
        .await?
        .ok_or_else(|| AppError::internal("Failed to load updated product"))?;
    Ok(Json(full))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let lock = state.catalog_lock();
    let _guard = lock.lock().await;

    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(id = %id, "Product deleted");
    Ok(Json(true))
}
