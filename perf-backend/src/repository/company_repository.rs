// src/repository/company_repository.rs

use crate::domain::company_model::{self, Entity as CompanyEntity, Model as CompanyModel};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct CompanyRepository {
    db: Arc<DbConn>,
}

impl CompanyRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    /// 会社コードで検索（ログイン時のテナント特定に使用）
    pub async fn find_by_code(&self, code: &str) -> Result<Option<CompanyModel>, DbErr> {
        CompanyEntity::find()
            .filter(company_model::Column::Code.eq(code))
            .one(&*self.db)
            .await
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<CompanyModel>, DbErr> {
        CompanyEntity::find_by_id(id)
            .filter(company_model::Column::IsActive.eq(true))
            .one(&*self.db)
            .await
    }
}

impl Clone for CompanyRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
