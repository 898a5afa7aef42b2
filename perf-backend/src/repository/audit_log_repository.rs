// src/repository/audit_log_repository.rs

use crate::domain::audit_log_model::{
    self, ActiveModel as AuditLogActiveModel, Entity as AuditLogEntity, Model as AuditLogModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use std::sync::Arc;
use uuid::Uuid;

pub struct AuditLogRepository {
    db: Arc<DbConn>,
}

impl AuditLogRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    // 監査ログの作成（追記のみ、更新・削除APIは提供しない）
    pub async fn create(&self, audit_log: AuditLogActiveModel) -> Result<AuditLogModel, DbErr> {
        audit_log.insert(&*self.db).await
    }

    /// 会社スコープの監査ログを取得（ページネーション付き）
    pub async fn find_by_company(
        &self,
        company_id: Uuid,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<AuditLogModel>, DbErr> {
        let mut query =
            AuditLogEntity::find().filter(audit_log_model::Column::CompanyId.eq(company_id));

        if let Some(entity_type) = entity_type {
            query = query.filter(audit_log_model::Column::EntityType.eq(entity_type));
        }
        if let Some(entity_id) = entity_id {
            query = query.filter(audit_log_model::Column::EntityId.eq(entity_id));
        }

        query
            .order_by_desc(audit_log_model::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await
    }

    /// 総件数を取得（ページネーション用）
    ///
    /// 一覧と同じ絞り込みを適用しないと total がページ内容と食い違う。
    pub async fn count_by_company(
        &self,
        company_id: Uuid,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
    ) -> Result<u64, DbErr> {
        let mut query =
            AuditLogEntity::find().filter(audit_log_model::Column::CompanyId.eq(company_id));

        if let Some(entity_type) = entity_type {
            query = query.filter(audit_log_model::Column::EntityType.eq(entity_type));
        }
        if let Some(entity_id) = entity_id {
            query = query.filter(audit_log_model::Column::EntityId.eq(entity_id));
        }

        query.count(&*self.db).await
    }
}

impl Clone for AuditLogRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
