use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::User;

/// A team together with its teammates and the ids of its live projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub company_id: i64,
    pub author_id: i64,
    pub teammates: Vec<User>,
    /// Non-deleted projects whose team reference points here, ascending
    pub project_ids: Vec<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
    pub teammate_ids: Vec<i64>,
}

/// Narrowing predicate for team listings. Empty filter matches every team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamFilter {
    pub company_id: Option<i64>,
    /// Matches teams the user authored or belongs to
    pub user_id: Option<i64>,
}

impl TeamFilter {
    pub fn company(company_id: i64) -> Self {
        Self {
            company_id: Some(company_id),
            user_id: None,
        }
    }

    pub fn matches(&self, team: &Team) -> bool {
        if let Some(company_id) = self.company_id {
            if team.company_id != company_id {
                return false;
            }
        }
        if let Some(user_id) = self.user_id {
            if team.author_id != user_id && !team.teammates.iter().any(|u| u.id == user_id) {
                return false;
            }
        }
        true
    }
}
