//! On-disk storage bootstrap tests.

use printpro_server::core::{Config, ServerState};
use printpro_server::db::models::CategoryCreate;
use printpro_server::db::repository::{CategoryRepository, UserRepository};

#[tokio::test]
async fn on_disk_state_initializes_and_seeds_admin_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_str().expect("utf-8 path"), 0);

    let state = ServerState::initialize(config).await.expect("state");

    let users = UserRepository::new(state.get_db());
    let admin = users
        .find_by_username("admin")
        .await
        .expect("query")
        .expect("seeded admin");
    assert_eq!(admin.role, "admin");
    assert!(admin.is_active);

    // Re-running the bootstrap against the same database must not
    // create a second admin
    ServerState::with_db(state.get_config().clone(), state.get_db())
        .await
        .expect("rebootstrap");
    let again = users
        .find_by_username("admin")
        .await
        .expect("query")
        .expect("admin still there");
    assert_eq!(again.id, admin.id);

    // Writes land on disk through the same handle
    let categories = CategoryRepository::new(state.get_db());
    categories
        .create(CategoryCreate {
            name: "Llaveros".to_string(),
            description: Some("Llaveros impresos".to_string()),
        })
        .await
        .expect("create category");
    assert_eq!(categories.find_all().await.expect("list").len(), 1);
}
