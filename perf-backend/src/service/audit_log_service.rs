// src/service/audit_log_service.rs

use crate::domain::audit_log_model::{ActiveModel as AuditLogActiveModel, AuditAction, AuditEntityType, Model as AuditLogModel};
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::audit_log_repository::AuditLogRepository;
use sea_orm::Set;
use std::sync::Arc;
use uuid::Uuid;

// 監査ログ記録のためのパラメータ構造体
pub struct RecordActionParams {
    pub actor_id: Uuid,
    pub actor_role: UserRole,
    pub company_id: Uuid,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: Uuid,
    /// 変更前スナップショット（アクションに関係するフィールドのみ、浅いキー/値）
    pub old_data: Option<serde_json::Value>,
    /// 変更後スナップショット
    pub new_data: Option<serde_json::Value>,
}

pub struct AuditLogService {
    audit_log_repo: Arc<AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(audit_log_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_log_repo }
    }

    /// 監査ログを記録
    ///
    /// 状態変更をクライアントに応答する前に完了しなければならない。
    /// 失敗はエラーとして呼び出し元に返す（監査証跡の消失を黙殺しない）。
    pub async fn record(&self, params: RecordActionParams) -> AppResult<AuditLogModel> {
        let log = AuditLogActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(chrono::Utc::now()),
            user_id: Set(params.actor_id),
            user_role: Set(params.actor_role.as_str().to_string()),
            company_id: Set(params.company_id),
            action: Set(params.action.as_str().to_string()),
            entity_type: Set(params.entity_type.as_str().to_string()),
            entity_id: Set(params.entity_id),
            old_data: Set(params.old_data),
            new_data: Set(params.new_data),
            ..Default::default()
        };

        let model = self.audit_log_repo.create(log).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to write audit log");
            AppError::InternalServerError("Failed to record audit log".to_string())
        })?;

        tracing::info!(
            audit_id = %model.id,
            action = %model.action,
            entity_type = %model.entity_type,
            entity_id = %model.entity_id,
            user_id = %model.user_id,
            "Audit log recorded"
        );

        Ok(model)
    }

    /// 会社スコープの監査ログ一覧（レポーティングUI向け）
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<AuditLogModel>, u64)> {
        let logs = self
            .audit_log_repo
            .find_by_company(company_id, entity_type, entity_id, limit, offset)
            .await?;
        let total = self
            .audit_log_repo
            .count_by_company(company_id, entity_type, entity_id)
            .await?;
        Ok((logs, total))
    }
}
