// src/repository/evaluation_repository.rs

use crate::domain::evaluation_model::{
    self, ActiveModel as EvaluationActiveModel, Entity as EvaluationEntity,
    Model as EvaluationModel,
};
use crate::domain::evaluation_status::EvaluationStatus;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct EvaluationRepository {
    db: Arc<DbConn>,
}

impl EvaluationRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    pub async fn create(&self, evaluation: EvaluationActiveModel) -> Result<EvaluationModel, DbErr> {
        evaluation.insert(&*self.db).await
    }

    pub async fn find_by_id_in_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<EvaluationModel>, DbErr> {
        EvaluationEntity::find_by_id(id)
            .filter(evaluation_model::Column::CompanyId.eq(company_id))
            .one(&*self.db)
            .await
    }

    /// (cycle, employee) の組での検索（重複作成の事前チェック用）
    pub async fn find_by_cycle_and_employee(
        &self,
        cycle_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<EvaluationModel>, DbErr> {
        EvaluationEntity::find()
            .filter(evaluation_model::Column::CycleId.eq(cycle_id))
            .filter(evaluation_model::Column::EmployeeId.eq(employee_id))
            .one(&*self.db)
            .await
    }

    pub async fn find_all_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<EvaluationModel>, DbErr> {
        EvaluationEntity::find()
            .filter(evaluation_model::Column::CompanyId.eq(company_id))
            .order_by_desc(evaluation_model::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    pub async fn find_by_manager(
        &self,
        manager_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<EvaluationModel>, DbErr> {
        EvaluationEntity::find()
            .filter(evaluation_model::Column::ManagerId.eq(manager_id))
            .filter(evaluation_model::Column::CompanyId.eq(company_id))
            .order_by_desc(evaluation_model::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    pub async fn find_by_employee(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<EvaluationModel>, DbErr> {
        EvaluationEntity::find()
            .filter(evaluation_model::Column::EmployeeId.eq(employee_id))
            .filter(evaluation_model::Column::CompanyId.eq(company_id))
            .order_by_desc(evaluation_model::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    pub async fn count_by_cycle(&self, cycle_id: Uuid) -> Result<u64, DbErr> {
        EvaluationEntity::find()
            .filter(evaluation_model::Column::CycleId.eq(cycle_id))
            .count(&*self.db)
            .await
    }

    /// ドラフト中の評価内容の更新（status = draft の行のみ）
    pub async fn update_items_if_draft(
        &self,
        id: Uuid,
        items_data: serde_json::Value,
    ) -> Result<u64, DbErr> {
        let result = EvaluationEntity::update_many()
            .col_expr(
                evaluation_model::Column::EvaluationItemsData,
                Expr::value(items_data),
            )
            .col_expr(evaluation_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(evaluation_model::Column::Id.eq(id))
            .filter(evaluation_model::Column::Status.eq(EvaluationStatus::Draft.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// draft → submitted の条件付き更新
    ///
    /// WHERE id = ? AND status = 'draft' で更新して影響行数を返す。
    /// 同時に submit された場合でも成功するのは1件のみ（残りは0行）。
    pub async fn submit(
        &self,
        id: Uuid,
        overall_rating: Option<f64>,
        submitted_at: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = EvaluationEntity::update_many()
            .col_expr(
                evaluation_model::Column::Status,
                Expr::value(EvaluationStatus::Submitted.as_str()),
            )
            .col_expr(
                evaluation_model::Column::OverallRating,
                Expr::value(overall_rating),
            )
            .col_expr(
                evaluation_model::Column::SubmittedAt,
                Expr::value(Some(submitted_at)),
            )
            .col_expr(evaluation_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(evaluation_model::Column::Id.eq(id))
            .filter(evaluation_model::Column::Status.eq(EvaluationStatus::Draft.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// submitted → draft（差し戻し）の条件付き更新
    pub async fn recall(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = EvaluationEntity::update_many()
            .col_expr(
                evaluation_model::Column::Status,
                Expr::value(EvaluationStatus::Draft.as_str()),
            )
            .col_expr(
                evaluation_model::Column::SubmittedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(evaluation_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(evaluation_model::Column::Id.eq(id))
            .filter(evaluation_model::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// submitted → approved（従業員承認）の条件付き更新
    pub async fn approve(&self, id: Uuid, approved_at: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = EvaluationEntity::update_many()
            .col_expr(
                evaluation_model::Column::Status,
                Expr::value(EvaluationStatus::Approved.as_str()),
            )
            .col_expr(
                evaluation_model::Column::ApprovedAt,
                Expr::value(Some(approved_at)),
            )
            .col_expr(evaluation_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(evaluation_model::Column::Id.eq(id))
            .filter(evaluation_model::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// approved → completed（HR確定）の条件付き更新
    pub async fn complete(&self, id: Uuid, completed_at: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = EvaluationEntity::update_many()
            .col_expr(
                evaluation_model::Column::Status,
                Expr::value(EvaluationStatus::Completed.as_str()),
            )
            .col_expr(
                evaluation_model::Column::CompletedAt,
                Expr::value(Some(completed_at)),
            )
            .col_expr(evaluation_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(evaluation_model::Column::Id.eq(id))
            .filter(evaluation_model::Column::Status.eq(EvaluationStatus::Approved.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

impl Clone for EvaluationRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
