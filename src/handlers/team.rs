use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;
use crate::models::{CreateTeam, Team, TeamFilter, UserRef, UserResponse};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub teammates: Vec<UserRef>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TeamQuery {
    /// Only teams of this company
    pub company_id: Option<i64>,
    /// Only teams this user authored or belongs to
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub company_id: i64,
    pub author_id: i64,
    pub teammates: Vec<UserResponse>,
    /// Ids of the team's live projects
    pub projects: Vec<i64>,
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl From<Team> for TeamResponse {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            company_id: t.company_id,
            author_id: t.author_id,
            teammates: t.teammates.into_iter().map(Into::into).collect(),
            projects: t.project_ids,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

// ============ Handlers ============

/// List teams, optionally narrowed by company and/or user
#[utoipa::path(
    get,
    path = "/api/teams",
    params(TeamQuery),
    responses(
        (status = 200, description = "List of teams", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teams"
)]
pub async fn list_teams(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TeamQuery>,
) -> AppResult<Json<Vec<TeamResponse>>> {
    let filter = TeamFilter {
        company_id: params.company_id,
        user_id: params.user_id,
    };

    let teams = state.teams.get_teams(&filter).await?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}

/// Create a team in a company, authored by the caller
#[utoipa::path(
    post,
    path = "/api/companies/{id}/teams",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created successfully", body = TeamResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Author, company or teammate not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teams"
)]
pub async fn create_team(
    user: AuthUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Json(payload): Json<CreateTeamRequest>,
) -> AppResult<Json<TeamResponse>> {
    let teammate_ids = payload
        .teammates
        .iter()
        .map(|mate| mate.id)
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| AppError::BadRequest("Every teammate needs an id".to_string()))?;

    let input = CreateTeam {
        name: payload.name,
        description: payload.description,
        teammate_ids,
    };

    let team = state.teams.create_team(user.id, company_id, input).await?;
    Ok(Json(team.into()))
}

/// Get a team by ID
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(
        ("id" = i64, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team details", body = TeamResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teams"
)]
pub async fn get_team(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TeamResponse>> {
    let team = state.teams.get_team_by_team_id(id).await?;
    Ok(Json(team.into()))
}

/// Delete a team; its projects are soft-deleted. Returns the team as it was.
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    params(
        ("id" = i64, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team deleted", body = TeamResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teams"
)]
pub async fn delete_team(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TeamResponse>> {
    let team = state.teams.delete_team(id).await?;
    Ok(Json(team.into()))
}
