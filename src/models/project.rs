use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub deleted: bool,
    pub team_id: Option<i64>,
    pub author_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fully validated project creation input
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub team_id: i64,
    pub author_id: i64,
}

/// Reference to an existing user by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: Option<i64>,
}

/// Reference to an existing team by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TeamRef {
    pub id: Option<i64>,
}

/// Project fields supplied by the caller
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProjectSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub team: Option<TeamRef>,
}

/// Project creation payload: the acting user and the project to create.
/// Absent parts are reported as bad requests by the project service.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub user: Option<UserRef>,
    pub project: Option<ProjectSpec>,
}

/// Only `active` is read; other project fields in the body are ignored
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateActiveRequest {
    pub active: bool,
}
