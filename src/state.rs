use sea_orm::{ConnectOptions, Database};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::repositories::{InMemoryStore, Stores};
use crate::services::{CompanyService, ProjectService, TeamService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub companies: CompanyService,
    pub teams: TeamService,
    pub projects: ProjectService,
}

impl AppState {
    /// Create a new AppState by connecting to PostgreSQL and running migrations
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database_url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;
        pg_pool.close().await;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.db_max_connections)
            .min_connections(1)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        Ok(Self::with_stores(config, Stores::postgres(db)))
    }

    /// Create AppState backed by an in-memory store (for testing)
    pub fn in_memory(config: Config, store: InMemoryStore) -> Self {
        Self::with_stores(config, Stores::in_memory(store))
    }

    /// Wire services onto the given stores
    pub fn with_stores(config: Config, stores: Stores) -> Self {
        let companies = CompanyService::new(stores.users.clone(), stores.companies.clone());
        let teams = TeamService::new(
            stores.users.clone(),
            stores.companies.clone(),
            stores.teams.clone(),
        );
        let projects = ProjectService::new(
            stores.users.clone(),
            stores.teams.clone(),
            stores.projects.clone(),
        );

        Self {
            config,
            stores,
            companies,
            teams,
            projects,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
