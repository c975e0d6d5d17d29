use std::sync::atomic::{AtomicU64, Ordering};

use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use teamboard::entity::user;
use teamboard::models::{Company, CreateCompany, CreateTeam, CreateUser, Team, User};
use teamboard::state::AppState;

use super::app::test_config;

static NEXT_ROW: AtomicU64 = AtomicU64::new(1);

/// Application state over a real PostgreSQL database
#[allow(dead_code)]
pub struct PgTestApp {
    pub state: AppState,
    /// Direct connection, for seeding columns the API never writes
    pub db: DatabaseConnection,
}

#[allow(dead_code)]
impl PgTestApp {
    /// Connect to DATABASE_URL (read from the environment or `.env`) and run
    /// migrations. Returns `None` when no database is configured.
    pub async fn connect() -> Option<Self> {
        dotenvy::dotenv().ok();
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL is not set, skipping PostgreSQL test");
            return None;
        };

        let mut config = test_config();
        config.database_url = database_url;
        config.db_max_connections = 10;

        let db = Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to test database");
        let state = AppState::new(config)
            .await
            .expect("Failed to create test app state");

        Some(Self { state, db })
    }

    /// Names must be unique across runs against the same database
    fn unique(prefix: &str) -> String {
        let n = NEXT_ROW.fetch_add(1, Ordering::Relaxed);
        let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("{}-{}-{}-{}", prefix, std::process::id(), nanos, n)
    }

    pub async fn user(&self, admin: bool) -> User {
        let input = CreateUser {
            email: format!("{}@example.com", Self::unique("pg")),
            password: "unused".to_string(),
            first_name: "Pg".to_string(),
            last_name: "User".to_string(),
        };
        let user = self.state.stores.users.create(&input, "hash").await.unwrap();

        if admin {
            user::ActiveModel {
                id: Set(user.id),
                admin: Set(true),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .unwrap();
        }

        self.state.stores.users.find_by_id(user.id).await.unwrap().unwrap()
    }

    pub async fn company(&self) -> Company {
        let input = CreateCompany {
            name: Self::unique("company"),
            description: None,
        };
        self.state.stores.companies.create(&input).await.unwrap()
    }

    pub async fn team(&self, company_id: i64, author_id: i64, teammate_ids: Vec<i64>) -> Team {
        let input = CreateTeam {
            name: Self::unique("team"),
            description: None,
            teammate_ids,
        };
        self.state
            .stores
            .teams
            .create(company_id, author_id, &input)
            .await
            .unwrap()
    }
}
