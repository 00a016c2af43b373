//! Shared server state
//!
//! Holds the database handle, JWT service and the catalog write lock;
//! cloned into every handler via axum `State`.

use std::path::Path;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::db::models::{ROLE_ADMIN, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    config: Config,
    db: Surreal<Db>,
    jwt_service: Arc<JwtService>,
    /// Serializes catalog mutations so the referential-integrity checks
    /// (category existence on product writes, reference count on
    /// category deletes) cannot interleave
    catalog_lock: Arc<Mutex<()>>,
}

impl ServerState {
    /// Open the on-disk database and build the state
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let data_dir = Path::new(&config.data_dir);
        std::fs::create_dir_all(data_dir)
            .map_err(|e| AppError::internal(format!("Failed to create data dir: {}", e)))?;
        let db = db::connect(data_dir).await?;
        Self::with_db(config, db).await
    }

    /// Build the state around an already-open database. Tests use this
    /// with the in-memory engine.
    pub async fn with_db(config: Config, db: Surreal<Db>) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self {
            config,
            db,
            jwt_service,
            catalog_lock: Arc::new(Mutex::new(())),
        };
        state.seed_admin().await?;
        Ok(state)
    }

    /// Create the initial admin account unless it already exists
    async fn seed_admin(&self) -> Result<(), AppError> {
        let users = UserRepository::new(self.db.clone());
        if users
            .find_by_username(&self.config.admin_username)
            .await?
            .is_none()
        {
            users
                .create(UserCreate {
                    username: self.config.admin_username.clone(),
                    email: self.config.admin_email.clone(),
                    password: self.config.admin_password.clone(),
                    role: ROLE_ADMIN.to_string(),
                })
                .await?;
            tracing::info!(username = %self.config.admin_username, "Seeded admin account");
        }
        Ok(())
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn catalog_lock(&self) -> Arc<Mutex<()>> {
        self.catalog_lock.clone()
    }
}
