use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Company, CreateCompany};
use crate::repositories::{CompanyStore, UserStore};

#[derive(Clone)]
pub struct CompanyService {
    users: Arc<dyn UserStore>,
    companies: Arc<dyn CompanyStore>,
}

impl CompanyService {
    pub fn new(users: Arc<dyn UserStore>, companies: Arc<dyn CompanyStore>) -> Self {
        Self { users, companies }
    }

    pub async fn list_companies(&self) -> AppResult<Vec<Company>> {
        self.companies.find_all().await
    }

    pub async fn get_company(&self, id: i64) -> AppResult<Company> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No company exists with this id: {}", id)))
    }

    /// Only administrators may register companies
    pub async fn create_company(&self, actor_id: i64, input: CreateCompany) -> AppResult<Company> {
        if input.name.trim().is_empty() {
            return Err(AppError::BadRequest("Company name is required".to_string()));
        }

        let actor = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user exists with this id: {}", actor_id)))?;

        if !actor.admin {
            tracing::warn!(user_id = actor_id, "Non-admin user attempted to create a company");
            return Err(AppError::NotAuthorized(
                "You are not authorized to do this action.".to_string(),
            ));
        }

        let company = self.companies.create(&input).await?;
        tracing::info!(company_id = company.id, "Company created");
        Ok(company)
    }
}
