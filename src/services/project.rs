use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CreateProject, CreateProjectRequest, Project, UpdateActiveRequest};
use crate::repositories::{project_not_found, team_not_found, ProjectStore, TeamStore, UserStore};

/// Project lifecycle rules: admin-only creation against an existing team,
/// soft deletion, and the active flag.
#[derive(Clone)]
pub struct ProjectService {
    users: Arc<dyn UserStore>,
    teams: Arc<dyn TeamStore>,
    projects: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(
        users: Arc<dyn UserStore>,
        teams: Arc<dyn TeamStore>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            users,
            teams,
            projects,
        }
    }

    /// Every project that has not been deleted, one entry per id
    pub async fn get_all_projects(&self) -> AppResult<Vec<Project>> {
        let live: BTreeMap<i64, Project> = self
            .projects
            .find_all()
            .await?
            .into_iter()
            .filter(|p| !p.deleted)
            .map(|p| (p.id, p))
            .collect();

        Ok(live.into_values().collect())
    }

    pub async fn create_project(&self, payload: CreateProjectRequest) -> AppResult<Project> {
        let (Some(user_id), Some(spec)) = (payload.user.and_then(|u| u.id), payload.project) else {
            return Err(AppError::BadRequest(
                "Project & User cannot be null".to_string(),
            ));
        };

        let Some(team_id) = spec.team.as_ref().and_then(|t| t.id) else {
            return Err(AppError::BadRequest(
                "The given team must not be null".to_string(),
            ));
        };

        let name = match spec.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(AppError::BadRequest(
                    "Project name cannot be blank".to_string(),
                ))
            }
        };

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user exists with this id: {}", user_id)))?;

        if !user.admin {
            tracing::warn!(user_id, team_id, "Non-admin user attempted to create a project");
            return Err(AppError::NotAuthorized(
                "You are not authorized to do this action.".to_string(),
            ));
        }

        if self.teams.find_by_id(team_id).await?.is_none() {
            return Err(team_not_found(team_id));
        }

        let project = self
            .projects
            .create_in_team(&CreateProject {
                name,
                description: spec.description,
                team_id,
                author_id: user.id,
            })
            .await?;

        tracing::info!(project_id = project.id, team_id, user_id, "Project created");
        Ok(project)
    }

    pub async fn delete_project(&self, project_id: i64) -> AppResult<()> {
        self.projects.soft_delete(project_id).await?;
        tracing::info!(project_id, "Project deleted");
        Ok(())
    }

    /// Deleted projects read as missing
    pub async fn get_project_by_project_id(&self, project_id: i64) -> AppResult<Project> {
        match self.projects.find_by_id(project_id).await? {
            Some(project) if !project.deleted => Ok(project),
            _ => Err(project_not_found(project_id)),
        }
    }

    /// Unlike reads, this also reaches deleted projects
    pub async fn update_active_project(
        &self,
        project_id: i64,
        input: UpdateActiveRequest,
    ) -> AppResult<Project> {
        let project = self.projects.set_active(project_id, input.active).await?;
        tracing::info!(project_id, active = input.active, "Project active flag updated");
        Ok(project)
    }
}
