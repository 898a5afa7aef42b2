// src/service/cycle_service.rs

use crate::domain::audit_log_model::{AuditAction, AuditEntityType};
use crate::domain::cycle_status::CycleStatus;
use crate::domain::performance_cycle_model::{
    ActiveModel as CycleActiveModel, Model as CycleModel,
};
use crate::domain::user_model::UserClaims;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::evaluation_repository::EvaluationRepository;
use crate::repository::performance_cycle_repository::PerformanceCycleRepository;
use crate::service::audit_log_service::{AuditLogService, RecordActionParams};
use crate::utils::permission;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CreateCycleInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct CycleService {
    cycle_repo: Arc<PerformanceCycleRepository>,
    evaluation_repo: Arc<EvaluationRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl CycleService {
    pub fn new(
        cycle_repo: Arc<PerformanceCycleRepository>,
        evaluation_repo: Arc<EvaluationRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            cycle_repo,
            evaluation_repo,
            audit_log_service,
        }
    }

    /// サイクルの作成（HRのみ）
    ///
    /// name は会社内で一意（大文字小文字を区別する完全一致）。重複は Conflict。
    pub async fn create_cycle(
        &self,
        claims: &UserClaims,
        input: CreateCycleInput,
    ) -> AppResult<CycleModel> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("name: Name cannot be empty".to_string()));
        }
        if input.end_date < input.start_date {
            return Err(AppError::ValidationError(
                "end_date: End date must not be before start date".to_string(),
            ));
        }

        if self
            .cycle_repo
            .find_by_name_in_company(&name, claims.company_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "A cycle named '{}' already exists",
                name
            )));
        }

        let cycle = CycleActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(claims.company_id),
            name: Set(name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(CycleStatus::Active.as_str().to_string()),
            closed_by: Set(None),
            closed_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };
        let created = self.cycle_repo.create(cycle).await.map_err(|e| {
            // (company_id, name) の一意インデックスとの競合もConflictとして返す
            if e.to_string().contains("duplicate key") {
                AppError::Conflict("A cycle with this name already exists".to_string())
            } else {
                AppError::DbErr(e)
            }
        })?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::CycleCreated,
                entity_type: AuditEntityType::Cycle,
                entity_id: created.id,
                old_data: None,
                new_data: Some(json!({
                    "name": created.name,
                    "status": created.status,
                    "start_date": created.start_date,
                    "end_date": created.end_date,
                })),
            })
            .await?;

        info!(cycle_id = %created.id, name = %created.name, "Performance cycle created");
        Ok(created)
    }

    /// サイクルの状態変更（HRのみ、自社スコープ）
    ///
    /// 許可される遷移は active→closed / closed→active（再オープン）/ closed→archived。
    /// 条件付き更新（WHERE id AND status = 遷移元）で行い、0行なら InvalidState。
    pub async fn set_cycle_status(
        &self,
        claims: &UserClaims,
        cycle_id: Uuid,
        target: CycleStatus,
    ) -> AppResult<CycleModel> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let cycle = self
            .cycle_repo
            .find_by_id_in_company(cycle_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))?;

        let current = cycle
            .status()
            .ok_or_else(|| AppError::InternalServerError("Cycle has an invalid status".to_string()))?;

        if !current.can_transition_to(target) {
            return Err(AppError::InvalidState(format!(
                "Cannot transition cycle from {} to {}",
                current, target
            )));
        }

        let now = Utc::now();
        let (rows, action) = match target {
            CycleStatus::Closed => (
                self.cycle_repo.close(cycle.id, claims.user_id, now).await?,
                AuditAction::CycleClosed,
            ),
            CycleStatus::Active => (
                self.cycle_repo.reopen(cycle.id).await?,
                AuditAction::CycleReopened,
            ),
            CycleStatus::Archived => (
                self.cycle_repo.archive(cycle.id).await?,
                AuditAction::CycleArchived,
            ),
        };

        // 同時更新で先を越された場合は0行になる。黙って上書きせず InvalidState を返す。
        if rows == 0 {
            return Err(AppError::InvalidState(
                "Cycle status has changed, please refresh and retry".to_string(),
            ));
        }

        let updated = self
            .cycle_repo
            .find_by_id_in_company(cycle.id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action,
                entity_type: AuditEntityType::Cycle,
                entity_id: cycle.id,
                old_data: Some(json!({ "status": cycle.status })),
                new_data: Some(json!({
                    "status": updated.status,
                    "closed_by": updated.closed_by,
                    "closed_at": updated.closed_at,
                })),
            })
            .await?;

        info!(
            cycle_id = %cycle.id,
            from = %current,
            to = %target,
            user_id = %claims.user_id,
            "Cycle status changed"
        );
        Ok(updated)
    }

    /// サイクルの削除（HRのみ）
    ///
    /// 依存する評価が1件でも存在する場合は削除不可。
    pub async fn delete_cycle(&self, claims: &UserClaims, cycle_id: Uuid) -> AppResult<()> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let cycle = self
            .cycle_repo
            .find_by_id_in_company(cycle_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))?;

        let dependents = self.evaluation_repo.count_by_cycle(cycle.id).await?;
        if dependents > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete cycle with {} dependent evaluations",
                dependents
            )));
        }

        self.cycle_repo.delete_by_id(cycle.id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::CycleDeleted,
                entity_type: AuditEntityType::Cycle,
                entity_id: cycle.id,
                old_data: Some(json!({ "name": cycle.name, "status": cycle.status })),
                new_data: None,
            })
            .await?;

        Ok(())
    }

    pub async fn get_cycle(&self, claims: &UserClaims, cycle_id: Uuid) -> AppResult<CycleModel> {
        self.cycle_repo
            .find_by_id_in_company(cycle_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))
    }

    pub async fn list_cycles(&self, claims: &UserClaims) -> AppResult<Vec<CycleModel>> {
        Ok(self
            .cycle_repo
            .find_all_by_company(claims.company_id)
            .await?)
    }
}
