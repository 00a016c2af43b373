//! Database layer
//!
//! Embedded SurrealDB storage:
//! - [`models`] - table structs and DTOs
//! - [`repository`] - CRUD repositories

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "printpro";
const DATABASE: &str = "catalog";

/// Open the embedded database at the given directory.
pub async fn connect(data_dir: &Path) -> Result<Surreal<Db>, AppError> {
    let path = data_dir.join("catalog.db");
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
    select_ns(&db).await?;
    Ok(db)
}

/// Open an in-memory database. Used by tests.
pub async fn connect_memory() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
    select_ns(&db).await?;
    Ok(db)
}

async fn select_ns(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))
}
