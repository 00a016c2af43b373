//! Database models
//!
//! Table structs and request DTOs. Record links serialize as
//! "table:id" strings via [`serde_thing`].

pub mod category;
pub mod product;
pub mod serde_thing;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{ROLE_ADMIN, ROLE_USER, User, UserCreate, UserInfo};
