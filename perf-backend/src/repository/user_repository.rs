// src/repository/user_repository.rs

use crate::domain::user_model::{
    self, ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, Condition, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct UserRepository {
    db: Arc<DbConn>,
}

impl UserRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: UserActiveModel) -> Result<UserModel, DbErr> {
        user.insert(&*self.db).await
    }

    /// テナントスコープ付きの検索
    ///
    /// 会社の異なるIDは存在しないものとして扱われる（存在漏洩の防止）。
    pub async fn find_by_id_in_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<UserModel>, DbErr> {
        UserEntity::find_by_id(id)
            .filter(user_model::Column::CompanyId.eq(company_id))
            .one(&*self.db)
            .await
    }

    /// メールアドレスまたはユーザー名で検索（サインイン用）
    pub async fn find_by_identifier(
        &self,
        identifier: &str,
        company_id: Option<Uuid>,
    ) -> Result<Option<UserModel>, DbErr> {
        let mut query = UserEntity::find().filter(
            Condition::any()
                .add(user_model::Column::Email.eq(identifier))
                .add(user_model::Column::Username.eq(identifier)),
        );

        if let Some(company_id) = company_id {
            query = query.filter(user_model::Column::CompanyId.eq(company_id));
        }

        query.one(&*self.db).await
    }

    pub async fn find_all_by_company(&self, company_id: Uuid) -> Result<Vec<UserModel>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::CompanyId.eq(company_id))
            .order_by_asc(user_model::Column::Name)
            .all(&*self.db)
            .await
    }

    /// マネージャーの直属部下を取得
    pub async fn find_direct_reports(
        &self,
        manager_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<UserModel>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::ManagerId.eq(manager_id))
            .filter(user_model::Column::CompanyId.eq(company_id))
            .order_by_asc(user_model::Column::Name)
            .all(&*self.db)
            .await
    }

    pub async fn update(&self, user: UserActiveModel) -> Result<UserModel, DbErr> {
        user.update(&*self.db).await
    }

    /// サインイン成功時に最終ログイン日時を更新
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        UserEntity::update_many()
            .col_expr(user_model::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user_model::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// ソフト無効化/再有効化（物理削除は通常フローでは行わない）
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<u64, DbErr> {
        let result = UserEntity::update_many()
            .col_expr(user_model::Column::IsActive, Expr::value(is_active))
            .col_expr(user_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_model::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

impl Clone for UserRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
