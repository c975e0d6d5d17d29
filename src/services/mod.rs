pub mod auth;
pub mod company;
pub mod project;
pub mod team;

pub use auth::{AuthService, Claims};
pub use company::CompanyService;
pub use project::ProjectService;
pub use team::TeamService;
