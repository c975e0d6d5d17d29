use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::team::TeamResponse;
use crate::middlewares::AuthUser;
use crate::models::{Company, CreateCompany, TeamFilter};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at,
        }
    }
}

// ============ Handlers ============

/// List all companies
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "List of companies", body = Vec<CompanyResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Companies"
)]
pub async fn list_companies(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompanyResponse>>> {
    let companies = state.companies.list_companies().await?;
    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

/// Create a company (administrators only)
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 200, description = "Company created successfully", body = CompanyResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Companies"
)]
pub async fn create_company(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> AppResult<Json<CompanyResponse>> {
    let input = CreateCompany {
        name: payload.name,
        description: payload.description,
    };

    let company = state.companies.create_company(user.id, input).await?;
    Ok(Json(company.into()))
}

/// Get a company by ID
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company details", body = CompanyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Company not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Companies"
)]
pub async fn get_company(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CompanyResponse>> {
    let company = state.companies.get_company(id).await?;
    Ok(Json(company.into()))
}

/// List the teams of a company
#[utoipa::path(
    get,
    path = "/api/companies/{id}/teams",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Teams of the company", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Companies"
)]
pub async fn list_company_teams(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<TeamResponse>>> {
    let teams = state.teams.get_teams(&TeamFilter::company(id)).await?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}
