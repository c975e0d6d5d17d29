use axum_test::TestServer;
use teamboard::build_router;
use teamboard::config::Config;
use teamboard::repositories::InMemoryStore;
use teamboard::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expiration_hours: 24,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Direct handle on the backing store, for seeding and inspecting rows
    pub store: InMemoryStore,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::in_memory(test_config(), store.clone());

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            store,
        }
    }
}
