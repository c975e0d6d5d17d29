pub mod auth;
pub mod company;
pub mod project;
pub mod team;

pub use auth::{login, me, register, AuthResponse, LoginRequest, RegisterRequest};
pub use company::{
    create_company, get_company, list_companies, list_company_teams, CompanyResponse,
    CreateCompanyRequest,
};
pub use project::{
    create_project, delete_project, get_project, list_projects, update_project_active,
    ProjectResponse,
};
pub use team::{create_team, delete_team, get_team, list_teams, CreateTeamRequest, TeamResponse};
