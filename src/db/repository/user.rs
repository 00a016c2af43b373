//! User Repository

use super::{BaseRepository, RepoError, RepoResult, now_micros};
use crate::db::models::{User, UserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user. Only reachable from startup seeding; there is no
    /// registration endpoint.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.username
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: None,
            username: data.username,
            email: data.email,
            password_hash,
            role: data.role,
            is_active: true,
            created_at: now_micros(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::db::models::ROLE_ADMIN;

    #[tokio::test]
    async fn seeded_user_verifies_its_own_password_only() {
        let db = connect_memory().await.expect("in-memory db");
        let repo = UserRepository::new(db);

        repo.create(UserCreate {
            username: "admin".to_string(),
            email: "admin@printpro3d.com".to_string(),
            password: "Admin123!".to_string(),
            role: ROLE_ADMIN.to_string(),
        })
        .await
        .unwrap();

        let user = repo.find_by_username("admin").await.unwrap().unwrap();
        assert!(user.verify_password("Admin123!").unwrap());
        assert!(!user.verify_password("admin123!").unwrap());

        let err = repo
            .create(UserCreate {
                username: "admin".to_string(),
                email: "other@printpro3d.com".to_string(),
                password: "x".to_string(),
                role: ROLE_ADMIN.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
