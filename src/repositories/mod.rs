pub mod company;
pub mod memory;
pub mod project;
pub mod team;
pub mod user;

pub use company::CompanyRepository;
pub use memory::InMemoryStore;
pub use project::ProjectRepository;
pub use team::TeamRepository;
pub use user::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::models::{
    Company, CreateCompany, CreateProject, CreateTeam, CreateUser, Project, Team, TeamFilter, User,
};

/// Persistence for users
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict` when the email is taken
    async fn create(&self, input: &CreateUser, password_hash: &str) -> AppResult<User>;
}

/// Persistence for companies
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Company>>;

    async fn find_all(&self) -> AppResult<Vec<Company>>;

    async fn create(&self, input: &CreateCompany) -> AppResult<Company>;
}

/// Persistence for teams, their memberships and their project collections
#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Team>>;

    /// Teams matching the filter, ascending by id
    async fn find_all(&self, filter: &TeamFilter) -> AppResult<Vec<Team>>;

    /// Inserts the team and its memberships as one unit
    async fn create(&self, company_id: i64, author_id: i64, input: &CreateTeam) -> AppResult<Team>;

    /// Removes the team and soft-deletes every live project it owns, as one unit.
    /// Returns the team as it was before removal, or `None` if it did not exist.
    async fn delete(&self, id: i64) -> AppResult<Option<Team>>;
}

/// Persistence for projects
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Project>>;

    /// Every project row, deleted ones included, ascending by id
    async fn find_all(&self) -> AppResult<Vec<Project>>;

    /// Inserts the project into the team's collection as one unit.
    /// Fails with `NotFound` if the team vanished in the meantime.
    async fn create_in_team(&self, input: &CreateProject) -> AppResult<Project>;

    /// Marks the project deleted and inactive and detaches it from its team, as one unit.
    /// Fails with `NotFound` if no such row exists.
    async fn soft_delete(&self, id: i64) -> AppResult<()>;

    /// Fails with `NotFound` if no such row exists. Deleted rows are updated too.
    async fn set_active(&self, id: i64, active: bool) -> AppResult<Project>;
}

/// The set of store handles injected into services
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub teams: Arc<dyn TeamStore>,
    pub projects: Arc<dyn ProjectStore>,
}

impl Stores {
    /// SeaORM-backed stores sharing one connection pool
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserRepository::new(db.clone())),
            companies: Arc::new(CompanyRepository::new(db.clone())),
            teams: Arc::new(TeamRepository::new(db.clone())),
            projects: Arc::new(ProjectRepository::new(db)),
        }
    }

    /// All four stores served by one in-memory store
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            companies: Arc::new(store.clone()),
            teams: Arc::new(store.clone()),
            projects: Arc::new(store),
        }
    }
}

pub(crate) fn team_not_found(id: i64) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("No team exists with this id: {}", id))
}

pub(crate) fn project_not_found(id: i64) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("No project exists with this id: {}", id))
}
