use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{
    Company, CreateCompany, CreateProject, CreateTeam, CreateUser, Project, Team, TeamFilter, User,
};
use crate::repositories::{
    project_not_found, team_not_found, CompanyStore, ProjectStore, TeamStore, UserStore,
};

/// In-memory store backing all four store traits, for tests and local runs.
/// Every operation holds the single lock for its whole duration, so
/// multi-row updates are atomic.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    companies: BTreeMap<i64, Company>,
    teams: BTreeMap<i64, TeamRow>,
    /// (team_id, user_id)
    members: BTreeSet<(i64, i64)>,
    projects: BTreeMap<i64, Project>,
    sequences: Sequences,
}

/// One id sequence per table, like BIGSERIAL
#[derive(Default)]
struct Sequences {
    users: i64,
    companies: i64,
    teams: i64,
    projects: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

struct TeamRow {
    id: i64,
    name: String,
    description: Option<String>,
    company_id: i64,
    author_id: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Tables {
    fn team(&self, row: &TeamRow) -> Team {
        let teammates = self
            .members
            .range((row.id, i64::MIN)..=(row.id, i64::MAX))
            .filter_map(|(_, user_id)| self.users.get(user_id).cloned())
            .collect();

        let project_ids = self
            .projects
            .values()
            .filter(|p| !p.deleted && p.team_id == Some(row.id))
            .map(|p| p.id)
            .collect();

        Team {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            company_id: row.company_id,
            author_id: row.author_id,
            teammates,
            project_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a user's administrator flag. Administration happens outside the API.
    pub async fn set_admin(&self, user_id: i64, admin: bool) -> AppResult<User> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("No user exists with this id: {}", user_id)))?;
        user.admin = admin;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, input: &CreateUser, password_hash: &str) -> AppResult<User> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|u| u.email == input.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: next(&mut inner.sequences.users),
            email: input.email.clone(),
            password_hash: password_hash.to_string(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            admin: false,
            active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Company>> {
        Ok(self.inner.lock().await.companies.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Company>> {
        Ok(self.inner.lock().await.companies.values().cloned().collect())
    }

    async fn create(&self, input: &CreateCompany) -> AppResult<Company> {
        let mut inner = self.inner.lock().await;
        let now = OffsetDateTime::now_utc();
        let company = Company {
            id: next(&mut inner.sequences.companies),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.companies.insert(company.id, company.clone());
        Ok(company)
    }
}

#[async_trait]
impl TeamStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Team>> {
        let inner = self.inner.lock().await;
        Ok(inner.teams.get(&id).map(|row| inner.team(row)))
    }

    async fn find_all(&self, filter: &TeamFilter) -> AppResult<Vec<Team>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .teams
            .values()
            .map(|row| inner.team(row))
            .filter(|team| filter.matches(team))
            .collect())
    }

    async fn create(&self, company_id: i64, author_id: i64, input: &CreateTeam) -> AppResult<Team> {
        let mut inner = self.inner.lock().await;
        let now = OffsetDateTime::now_utc();
        let row = TeamRow {
            id: next(&mut inner.sequences.teams),
            name: input.name.clone(),
            description: input.description.clone(),
            company_id,
            author_id,
            created_at: now,
            updated_at: now,
        };
        let id = row.id;

        for user_id in &input.teammate_ids {
            inner.members.insert((id, *user_id));
        }
        inner.teams.insert(id, row);

        Ok(inner.team(&inner.teams[&id]))
    }

    async fn delete(&self, id: i64) -> AppResult<Option<Team>> {
        let mut inner = self.inner.lock().await;
        let Some(row) = inner.teams.remove(&id) else {
            return Ok(None);
        };
        let prior = inner.team(&row);

        let now = OffsetDateTime::now_utc();
        for project in inner.projects.values_mut() {
            if project.team_id == Some(id) {
                project.deleted = true;
                project.active = false;
                project.team_id = None;
                project.updated_at = now;
            }
        }
        inner.members.retain(|(team_id, _)| *team_id != id);

        Ok(Some(prior))
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Project>> {
        Ok(self.inner.lock().await.projects.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Project>> {
        Ok(self.inner.lock().await.projects.values().cloned().collect())
    }

    async fn create_in_team(&self, input: &CreateProject) -> AppResult<Project> {
        let mut inner = self.inner.lock().await;
        let now = OffsetDateTime::now_utc();

        inner
            .teams
            .get_mut(&input.team_id)
            .ok_or_else(|| team_not_found(input.team_id))?
            .updated_at = now;

        let project = Project {
            id: next(&mut inner.sequences.projects),
            name: input.name.clone(),
            description: input.description.clone(),
            active: true,
            deleted: false,
            team_id: Some(input.team_id),
            author_id: Some(input.author_id),
            created_at: now,
            updated_at: now,
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        let now = OffsetDateTime::now_utc();

        let project = inner.projects.get_mut(&id).ok_or_else(|| project_not_found(id))?;
        let former_team = project.team_id.take();
        project.deleted = true;
        project.active = false;
        project.updated_at = now;

        if let Some(team) = former_team.and_then(|team_id| inner.teams.get_mut(&team_id)) {
            team.updated_at = now;
        }
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<Project> {
        let mut inner = self.inner.lock().await;
        let project = inner.projects.get_mut(&id).ok_or_else(|| project_not_found(id))?;
        project.active = active;
        project.updated_at = OffsetDateTime::now_utc();
        Ok(project.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &InMemoryStore) -> (User, Company, Team) {
        let user = UserStore::create(
            store,
            &CreateUser {
                email: "ada@example.com".to_string(),
                password: "unused".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
            "hash",
        )
        .await
        .unwrap();
        let company = CompanyStore::create(
            store,
            &CreateCompany {
                name: "Acme".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let team = TeamStore::create(
            store,
            company.id,
            user.id,
            &CreateTeam {
                name: "Core".to_string(),
                description: None,
                teammate_ids: vec![user.id],
            },
        )
        .await
        .unwrap();
        (user, company, team)
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        seed(&store).await;

        let result = UserStore::create(
            &store,
            &CreateUser {
                email: "ada@example.com".to_string(),
                password: "unused".to_string(),
                first_name: "Other".to_string(),
                last_name: "Person".to_string(),
            },
            "hash",
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_team_collection_follows_project_team_reference() {
        let store = InMemoryStore::new();
        let (user, _, team) = seed(&store).await;

        let project = store
            .create_in_team(&CreateProject {
                name: "P".to_string(),
                description: None,
                team_id: team.id,
                author_id: user.id,
            })
            .await
            .unwrap();

        let team_after = TeamStore::find_by_id(&store, team.id).await.unwrap().unwrap();
        assert_eq!(team_after.project_ids, vec![project.id]);

        store.soft_delete(project.id).await.unwrap();

        let team_after = TeamStore::find_by_id(&store, team.id).await.unwrap().unwrap();
        assert!(team_after.project_ids.is_empty());
    }

    #[tokio::test]
    async fn test_create_in_missing_team_is_not_found() {
        let store = InMemoryStore::new();

        let result = store
            .create_in_team(&CreateProject {
                name: "P".to_string(),
                description: None,
                team_id: 99,
                author_id: 1,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(ProjectStore::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_user_matches_author_and_teammates() {
        let store = InMemoryStore::new();
        let (user, company, _) = seed(&store).await;

        let other = UserStore::create(
            &store,
            &CreateUser {
                email: "grace@example.com".to_string(),
                password: "unused".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
            "hash",
        )
        .await
        .unwrap();
        TeamStore::create(
            &store,
            company.id,
            user.id,
            &CreateTeam {
                name: "Research".to_string(),
                description: None,
                teammate_ids: vec![other.id],
            },
        )
        .await
        .unwrap();

        let for_author = TeamStore::find_all(
            &store,
            &TeamFilter {
                company_id: None,
                user_id: Some(user.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(for_author.len(), 2);

        let for_other = TeamStore::find_all(
            &store,
            &TeamFilter {
                company_id: None,
                user_id: Some(other.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(for_other.len(), 1);
        assert_eq!(for_other[0].name, "Research");
    }
}
