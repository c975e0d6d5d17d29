use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTeam, Team, TeamFilter};
use crate::repositories::{team_not_found, CompanyStore, TeamStore, UserStore};

/// Team lifecycle rules
#[derive(Clone)]
pub struct TeamService {
    users: Arc<dyn UserStore>,
    companies: Arc<dyn CompanyStore>,
    teams: Arc<dyn TeamStore>,
}

impl TeamService {
    pub fn new(
        users: Arc<dyn UserStore>,
        companies: Arc<dyn CompanyStore>,
        teams: Arc<dyn TeamStore>,
    ) -> Self {
        Self {
            users,
            companies,
            teams,
        }
    }

    /// Teams matching the filter, one entry per id. Unknown filter ids yield nothing.
    pub async fn get_teams(&self, filter: &TeamFilter) -> AppResult<Vec<Team>> {
        let teams: BTreeMap<i64, Team> = self
            .teams
            .find_all(filter)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(teams.into_values().collect())
    }

    pub async fn create_team(
        &self,
        author_id: i64,
        company_id: i64,
        input: CreateTeam,
    ) -> AppResult<Team> {
        if input.name.trim().is_empty() {
            return Err(AppError::BadRequest("Team name is required".to_string()));
        }

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "No user exists with this id: {}",
                author_id
            )));
        }

        if self.companies.find_by_id(company_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "No company exists with this id: {}",
                company_id
            )));
        }

        for teammate_id in &input.teammate_ids {
            if self.users.find_by_id(*teammate_id).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "No user exists with this id: {}",
                    teammate_id
                )));
            }
        }

        let team = self.teams.create(company_id, author_id, &input).await?;
        tracing::info!(team_id = team.id, company_id, author_id, "Team created");
        Ok(team)
    }

    /// Removes the team, soft-deleting the projects it owned.
    /// Returns the team as it was before removal.
    pub async fn delete_team(&self, id: i64) -> AppResult<Team> {
        let team = self.teams.delete(id).await?.ok_or_else(|| team_not_found(id))?;
        tracing::info!(
            team_id = id,
            projects = team.project_ids.len(),
            "Team deleted, owned projects soft-deleted"
        );
        Ok(team)
    }

    pub async fn get_team_by_team_id(&self, id: i64) -> AppResult<Team> {
        self.teams.find_by_id(id).await?.ok_or_else(|| team_not_found(id))
    }
}
