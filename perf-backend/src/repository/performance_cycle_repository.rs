// src/repository/performance_cycle_repository.rs

use crate::domain::cycle_status::CycleStatus;
use crate::domain::performance_cycle_model::{
    self, ActiveModel as CycleActiveModel, Entity as CycleEntity, Model as CycleModel,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct PerformanceCycleRepository {
    db: Arc<DbConn>,
}

impl PerformanceCycleRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    pub async fn create(&self, cycle: CycleActiveModel) -> Result<CycleModel, DbErr> {
        cycle.insert(&*self.db).await
    }

    pub async fn find_by_id_in_company(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<CycleModel>, DbErr> {
        CycleEntity::find_by_id(id)
            .filter(performance_cycle_model::Column::CompanyId.eq(company_id))
            .one(&*self.db)
            .await
    }

    /// 会社内で名前の完全一致検索（大文字小文字を区別）
    pub async fn find_by_name_in_company(
        &self,
        name: &str,
        company_id: Uuid,
    ) -> Result<Option<CycleModel>, DbErr> {
        CycleEntity::find()
            .filter(performance_cycle_model::Column::CompanyId.eq(company_id))
            .filter(performance_cycle_model::Column::Name.eq(name))
            .one(&*self.db)
            .await
    }

    pub async fn find_all_by_company(&self, company_id: Uuid) -> Result<Vec<CycleModel>, DbErr> {
        CycleEntity::find()
            .filter(performance_cycle_model::Column::CompanyId.eq(company_id))
            .order_by_desc(performance_cycle_model::Column::StartDate)
            .all(&*self.db)
            .await
    }

    /// active → closed の条件付き更新
    ///
    /// WHERE id = ? AND status = 'active' で更新し、影響行数を返す。
    /// 0行なら呼び出し側は InvalidState として扱う（同時実行でも安全）。
    pub async fn close(
        &self,
        id: Uuid,
        closed_by: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = CycleEntity::update_many()
            .col_expr(
                performance_cycle_model::Column::Status,
                Expr::value(CycleStatus::Closed.as_str()),
            )
            .col_expr(
                performance_cycle_model::Column::ClosedBy,
                Expr::value(Some(closed_by)),
            )
            .col_expr(
                performance_cycle_model::Column::ClosedAt,
                Expr::value(Some(closed_at)),
            )
            .col_expr(
                performance_cycle_model::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(performance_cycle_model::Column::Id.eq(id))
            .filter(performance_cycle_model::Column::Status.eq(CycleStatus::Active.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// closed → active（再オープン）の条件付き更新。closed_by/closed_at をクリアする。
    pub async fn reopen(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = CycleEntity::update_many()
            .col_expr(
                performance_cycle_model::Column::Status,
                Expr::value(CycleStatus::Active.as_str()),
            )
            .col_expr(
                performance_cycle_model::Column::ClosedBy,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                performance_cycle_model::Column::ClosedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(
                performance_cycle_model::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(performance_cycle_model::Column::Id.eq(id))
            .filter(performance_cycle_model::Column::Status.eq(CycleStatus::Closed.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// closed → archived の条件付き更新。archived は終端。
    pub async fn archive(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = CycleEntity::update_many()
            .col_expr(
                performance_cycle_model::Column::Status,
                Expr::value(CycleStatus::Archived.as_str()),
            )
            .col_expr(
                performance_cycle_model::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(performance_cycle_model::Column::Id.eq(id))
            .filter(performance_cycle_model::Column::Status.eq(CycleStatus::Closed.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = CycleEntity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }
}

impl Clone for PerformanceCycleRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
