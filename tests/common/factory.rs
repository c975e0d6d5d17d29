use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use teamboard::models::{Company, CreateCompany, CreateTeam, CreateUser, Team};
use teamboard::services::AuthService;

use super::TestApp;

static NEXT_USER: AtomicU64 = AtomicU64::new(1);
static PASSWORD_HASH: OnceLock<String> = OnceLock::new();

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: i64,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    app: &'a TestApp,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(app: &'a TestApp) -> Self {
        Self { app }
    }

    /// Create a test user and return auth info
    pub async fn create_user(&self, admin: bool) -> TestAuth {
        let n = NEXT_USER.fetch_add(1, Ordering::Relaxed);
        let email = format!("test-{}@example.com", n);

        let input = CreateUser {
            email: email.clone(),
            password: TEST_PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        };

        // Argon2 is slow in debug builds; every test user shares one hash
        let password_hash =
            PASSWORD_HASH.get_or_init(|| AuthService::hash_password(TEST_PASSWORD).unwrap());
        let user = self
            .app
            .state
            .stores
            .users
            .create(&input, password_hash)
            .await
            .unwrap();
        self.app.store.set_admin(user.id, admin).await.unwrap();

        let token = AuthService::generate_token(user.id, &email, &self.app.state.config).unwrap();

        TestAuth {
            user_id: user.id,
            email,
            token,
        }
    }

    /// Create a test company
    pub async fn create_company(&self, name: &str) -> Company {
        let input = CreateCompany {
            name: name.to_string(),
            description: None,
        };

        self.app.state.stores.companies.create(&input).await.unwrap()
    }

    /// Create a test team in a company
    pub async fn create_team(&self, company_id: i64, author_id: i64, name: &str) -> Team {
        let input = CreateTeam {
            name: name.to_string(),
            description: None,
            teammate_ids: Vec::new(),
        };

        self.app
            .state
            .stores
            .teams
            .create(company_id, author_id, &input)
            .await
            .unwrap()
    }

    /// Create an admin, a company and a team authored by that admin
    pub async fn create_hierarchy(&self) -> TestHierarchy {
        let admin = self.create_user(true).await;
        let company = self.create_company("Acme").await;
        let team = self.create_team(company.id, admin.user_id, "Core").await;

        TestHierarchy {
            admin,
            company,
            team,
        }
    }
}

/// Complete test data hierarchy
#[allow(dead_code)]
pub struct TestHierarchy {
    pub admin: TestAuth,
    pub company: Company,
    pub team: Team,
}
