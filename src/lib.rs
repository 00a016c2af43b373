//! PrintPro Server - catalog and admin backend for a small 3D-printing
//! storefront
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # config, state, server assembly
//! ├── auth/      # JWT authentication, admin gating
//! ├── api/       # HTTP routes and handlers
//! ├── catalog/   # read-side query engine
//! ├── db/        # embedded SurrealDB models and repositories
//! └── utils/     # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use catalog::{CatalogQuery, QueryEngine};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
