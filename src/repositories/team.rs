use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Value,
};

use crate::entity::project::{self, Entity as ProjectEntity};
use crate::entity::team::{self, ActiveModel, Column, Entity as TeamEntity};
use crate::entity::team_member::{self, Entity as TeamMemberEntity};
use crate::entity::user::Entity as UserEntity;
use crate::error::AppResult;
use crate::models::{CreateTeam, Team, TeamFilter, User};
use crate::repositories::TeamStore;

/// Team repository for database operations
pub struct TeamRepository {
    db: DatabaseConnection,
}

impl TeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach teammates and live project ids to raw team rows
    async fn assemble<C: ConnectionTrait>(conn: &C, models: Vec<team::Model>) -> AppResult<Vec<Team>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let members = TeamMemberEntity::find()
            .filter(team_member::Column::TeamId.is_in(ids.clone()))
            .order_by_asc(team_member::Column::UserId)
            .find_also_related(UserEntity)
            .all(conn)
            .await?;

        let mut teammates: HashMap<i64, Vec<User>> = HashMap::new();
        for (member, user) in members {
            if let Some(user) = user {
                teammates.entry(member.team_id).or_default().push(user.into());
            }
        }

        let projects = ProjectEntity::find()
            .filter(project::Column::TeamId.is_in(ids))
            .filter(project::Column::Deleted.eq(false))
            .order_by_asc(project::Column::Id)
            .all(conn)
            .await?;

        let mut project_ids: HashMap<i64, Vec<i64>> = HashMap::new();
        for p in projects {
            if let Some(team_id) = p.team_id {
                project_ids.entry(team_id).or_default().push(p.id);
            }
        }

        Ok(models
            .into_iter()
            .map(|m| Team {
                teammates: teammates.remove(&m.id).unwrap_or_default(),
                project_ids: project_ids.remove(&m.id).unwrap_or_default(),
                id: m.id,
                name: m.name,
                description: m.description,
                company_id: m.company_id,
                author_id: m.author_id,
                created_at: m.created_at,
                updated_at: m.updated_at,
            })
            .collect())
    }

    async fn assemble_one<C: ConnectionTrait>(conn: &C, model: team::Model) -> AppResult<Team> {
        let mut teams = Self::assemble(conn, vec![model]).await?;
        // assemble returns one team per input row
        Ok(teams.remove(0))
    }
}

#[async_trait]
impl TeamStore for TeamRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Team>> {
        match TeamEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(Self::assemble_one(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, filter: &TeamFilter) -> AppResult<Vec<Team>> {
        let mut query = TeamEntity::find();

        if let Some(company_id) = filter.company_id {
            query = query.filter(Column::CompanyId.eq(company_id));
        }
        if let Some(user_id) = filter.user_id {
            let memberships = Query::select()
                .column(team_member::Column::TeamId)
                .from(TeamMemberEntity)
                .and_where(team_member::Column::UserId.eq(user_id))
                .to_owned();
            query = query.filter(
                Condition::any()
                    .add(Column::AuthorId.eq(user_id))
                    .add(Column::Id.in_subquery(memberships)),
            );
        }

        let models = query.order_by_asc(Column::Id).all(&self.db).await?;
        Self::assemble(&self.db, models).await
    }

    async fn create(&self, company_id: i64, author_id: i64, input: &CreateTeam) -> AppResult<Team> {
        let txn = self.db.begin().await?;
        let now = time::OffsetDateTime::now_utc();

        let model = ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            company_id: Set(company_id),
            author_id: Set(author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let teammate_ids: BTreeSet<i64> = input.teammate_ids.iter().copied().collect();
        if !teammate_ids.is_empty() {
            let members = teammate_ids.into_iter().map(|user_id| team_member::ActiveModel {
                team_id: Set(model.id),
                user_id: Set(user_id),
            });
            TeamMemberEntity::insert_many(members).exec(&txn).await?;
        }

        let team = Self::assemble_one(&txn, model).await?;
        txn.commit().await?;

        Ok(team)
    }

    async fn delete(&self, id: i64) -> AppResult<Option<Team>> {
        let txn = self.db.begin().await?;

        let Some(model) = TeamEntity::find_by_id(id).lock_exclusive().one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let prior = Self::assemble_one(&txn, model).await?;

        ProjectEntity::update_many()
            .col_expr(project::Column::Deleted, Expr::value(true))
            .col_expr(project::Column::Active, Expr::value(false))
            .col_expr(project::Column::TeamId, Expr::value(Value::BigInt(None)))
            .col_expr(
                project::Column::UpdatedAt,
                Expr::value(time::OffsetDateTime::now_utc()),
            )
            .filter(project::Column::TeamId.eq(id))
            .exec(&txn)
            .await?;

        TeamMemberEntity::delete_many()
            .filter(team_member::Column::TeamId.eq(id))
            .exec(&txn)
            .await?;

        TeamEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(prior))
    }
}
