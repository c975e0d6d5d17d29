use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entity::project::{self, ActiveModel, Column, Entity as ProjectEntity};
use crate::entity::team::{self, Entity as TeamEntity};
use crate::error::AppResult;
use crate::models::{CreateProject, Project};
use crate::repositories::{project_not_found, team_not_found, ProjectStore};

/// Project repository for database operations
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Project>> {
        let model = ProjectEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn create_in_team(&self, input: &CreateProject) -> AppResult<Project> {
        let txn = self.db.begin().await?;
        let now = time::OffsetDateTime::now_utc();

        // Lock the team row so concurrent attach/detach on it serialize
        let team = TeamEntity::find_by_id(input.team_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| team_not_found(input.team_id))?;

        let model = ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            active: Set(true),
            deleted: Set(false),
            team_id: Set(Some(team.id)),
            author_id: Set(Some(input.author_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut team: team::ActiveModel = team.into();
        team.updated_at = Set(now);
        team.update(&txn).await?;

        txn.commit().await?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        // Lock order is team row, then project row, the same order
        // TeamRepository::delete uses when it detaches a team's projects.
        loop {
            let txn = self.db.begin().await?;
            let now = time::OffsetDateTime::now_utc();

            let seen = ProjectEntity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| project_not_found(id))?;

            let team = match seen.team_id {
                Some(team_id) => TeamEntity::find_by_id(team_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?,
                None => None,
            };

            let model = ProjectEntity::find_by_id(id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| project_not_found(id))?;

            // Moved or detached while we waited for the team lock
            if model.team_id != seen.team_id {
                txn.rollback().await?;
                continue;
            }

            if let Some(team) = team {
                let mut team: team::ActiveModel = team.into();
                team.updated_at = Set(now);
                team.update(&txn).await?;
            }

            let mut active: ActiveModel = model.into();
            active.deleted = Set(true);
            active.active = Set(false);
            active.team_id = Set(None);
            active.updated_at = Set(now);
            active.update(&txn).await?;

            txn.commit().await?;
            return Ok(());
        }
    }

    async fn set_active(&self, id: i64, active_flag: bool) -> AppResult<Project> {
        let model = ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        let mut active: ActiveModel = model.into();
        active.active = Set(active_flag);
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(&self.db).await?;
        Ok(result.into())
    }
}

// Conversion from SeaORM model to our domain model
impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            active: m.active,
            deleted: m.deleted,
            team_id: m.team_id,
            author_id: m.author_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
