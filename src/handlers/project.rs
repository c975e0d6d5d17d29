use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::middlewares::AuthUser;
use crate::models::{CreateProjectRequest, Project, TeamRef, UpdateActiveRequest};
use crate::state::AppState;

// ============ Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub deleted: bool,
    /// Absent once the project is deleted
    pub team: Option<TeamRef>,
    pub author_id: Option<i64>,
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            active: p.active,
            deleted: p.deleted,
            team: p.team_id.map(|id| TeamRef { id: Some(id) }),
            author_id: p.author_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ============ Handlers ============

/// List every project that has not been deleted
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = state.projects.get_all_projects().await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Create a project in an existing team. The user in the payload must be an administrator.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created successfully", body = ProjectResponse),
        (status = 400, description = "User, project or team reference missing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User is not an administrator"),
        (status = 404, description = "User or team not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.projects.create_project(payload).await?;
    Ok(Json(project.into()))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found or deleted")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn get_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.projects.get_project_by_project_id(id).await?;
    Ok(Json(project.into()))
}

/// Set a project's active flag
#[utoipa::path(
    patch,
    path = "/api/projects/{id}/active",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body = UpdateActiveRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn update_project_active(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateActiveRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.projects.update_active_project(id, payload).await?;
    Ok(Json(project.into()))
}

/// Soft-delete a project and detach it from its team
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.projects.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
