use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entity::company::{self, ActiveModel, Column, Entity as CompanyEntity};
use crate::error::AppResult;
use crate::models::{Company, CreateCompany};
use crate::repositories::CompanyStore;

/// Company repository for database operations
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Company>> {
        let model = CompanyEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<Company>> {
        let models = CompanyEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, input: &CreateCompany) -> AppResult<Company> {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into())
    }
}

impl From<company::Model> for Company {
    fn from(m: company::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
