// src/service/evaluation_service.rs

use crate::domain::audit_log_model::{AuditAction, AuditEntityType};
use crate::domain::evaluation_model::{
    ActiveModel as EvaluationActiveModel, EvaluationItemEntry, Model as EvaluationModel,
};
use crate::domain::evaluation_status::EvaluationStatus;
use crate::domain::partial_assessment_model::{
    ActiveModel as PartialAssessmentActiveModel, Model as PartialAssessmentModel,
};
use crate::domain::performance_cycle_model::Model as CycleModel;
use crate::domain::period_type::PeriodType;
use crate::domain::user_model::UserClaims;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::evaluation_repository::EvaluationRepository;
use crate::repository::partial_assessment_repository::PartialAssessmentRepository;
use crate::repository::performance_cycle_repository::PerformanceCycleRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordActionParams};
use crate::utils::permission;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CreateEvaluationInput {
    pub cycle_id: Uuid,
    pub employee_id: Uuid,
    pub period_type: PeriodType,
    pub period_date: NaiveDate,
    pub items: Vec<EvaluationItemEntry>,
}

pub struct RecordPartialAssessmentInput {
    pub evaluation_id: Uuid,
    pub note: String,
    pub rating: Option<f64>,
}

pub struct EvaluationService {
    evaluation_repo: Arc<EvaluationRepository>,
    cycle_repo: Arc<PerformanceCycleRepository>,
    user_repo: Arc<UserRepository>,
    partial_assessment_repo: Arc<PartialAssessmentRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl EvaluationService {
    pub fn new(
        evaluation_repo: Arc<EvaluationRepository>,
        cycle_repo: Arc<PerformanceCycleRepository>,
        user_repo: Arc<UserRepository>,
        partial_assessment_repo: Arc<PartialAssessmentRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            evaluation_repo,
            cycle_repo,
            user_repo,
            partial_assessment_repo,
            audit_log_service,
        }
    }

    // --- 内部ヘルパー ---

    /// テナントスコープで評価を取得（他社のIDは NotFound として扱われる）
    async fn fetch_evaluation(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        self.evaluation_repo
            .find_by_id_in_company(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Evaluation not found".to_string()))
    }

    /// 所属サイクルを取得し、評価の変更が許可される状態かチェック
    ///
    /// closed / archived のサイクル内の評価はHRの部分評価以外すべて変更不可。
    async fn fetch_cycle_for_mutation(
        &self,
        cycle_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<CycleModel> {
        let cycle = self
            .cycle_repo
            .find_by_id_in_company(cycle_id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))?;
        let status = cycle.status().ok_or_else(|| {
            AppError::InternalServerError("Cycle has an invalid status".to_string())
        })?;
        if !status.allows_evaluation_mutation() {
            return Err(AppError::CycleClosed(format!(
                "Cycle is {}, evaluations cannot be modified",
                status
            )));
        }
        Ok(cycle)
    }

    /// 評価の所有マネージャー本人かチェック
    fn require_owner_manager(claims: &UserClaims, evaluation: &EvaluationModel) -> AppResult<()> {
        permission::require_role(claims, &[UserRole::Manager])?;
        if evaluation.manager_id != claims.user_id {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(())
    }

    fn validate_item_entries(items: &[EvaluationItemEntry]) -> AppResult<()> {
        for entry in items {
            if let Some(rating) = entry.rating {
                if !(0.0..=5.0).contains(&rating) {
                    return Err(AppError::ValidationError(
                        "rating: Rating must be between 0 and 5".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    // --- ライフサイクル操作 ---

    /// 評価の新規作成（マネージャーのみ、対象はアクティブなサイクル内の直属部下）
    pub async fn create_evaluation(
        &self,
        claims: &UserClaims,
        input: CreateEvaluationInput,
    ) -> AppResult<EvaluationModel> {
        permission::require_role(claims, &[UserRole::Manager])?;

        let cycle = self
            .fetch_cycle_for_mutation(input.cycle_id, claims.company_id)
            .await?;

        let employee = self
            .user_repo
            .find_by_id_in_company(input.employee_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if employee.id == claims.user_id {
            return Err(AppError::ValidationError(
                "employee_id: Managers cannot evaluate themselves".to_string(),
            ));
        }
        if employee.manager_id != Some(claims.user_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Self::validate_item_entries(&input.items)?;

        if self
            .evaluation_repo
            .find_by_cycle_and_employee(cycle.id, employee.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An evaluation already exists for this employee in this cycle".to_string(),
            ));
        }

        let evaluation = EvaluationActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(claims.company_id),
            cycle_id: Set(cycle.id),
            employee_id: Set(employee.id),
            manager_id: Set(claims.user_id),
            period_type: Set(input.period_type.as_str().to_string()),
            period_date: Set(input.period_date),
            status: Set(EvaluationStatus::Draft.as_str().to_string()),
            overall_rating: Set(None),
            evaluation_items_data: Set(serde_json::to_value(&input.items)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?),
            submitted_at: Set(None),
            approved_at: Set(None),
            completed_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };
        let created = self.evaluation_repo.create(evaluation).await.map_err(|e| {
            if e.to_string().contains("duplicate key") {
                AppError::Conflict(
                    "An evaluation already exists for this employee in this cycle".to_string(),
                )
            } else {
                AppError::DbErr(e)
            }
        })?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationCreated,
                entity_type: AuditEntityType::Evaluation,
                entity_id: created.id,
                old_data: None,
                new_data: Some(json!({
                    "status": created.status,
                    "cycle_id": created.cycle_id,
                    "employee_id": created.employee_id,
                })),
            })
            .await?;

        info!(
            evaluation_id = %created.id,
            employee_id = %created.employee_id,
            cycle_id = %created.cycle_id,
            "Evaluation created"
        );
        Ok(created)
    }

    /// ドラフト中の評価内容の更新（所有マネージャーのみ）
    pub async fn update_draft(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
        items: Vec<EvaluationItemEntry>,
    ) -> AppResult<EvaluationModel> {
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        Self::require_owner_manager(claims, &evaluation)?;
        self.fetch_cycle_for_mutation(evaluation.cycle_id, claims.company_id)
            .await?;
        Self::validate_item_entries(&items)?;

        let items_json = serde_json::to_value(&items)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        // draft 以外の状態に進んでいたら0行（黙って上書きしない）
        let rows = self
            .evaluation_repo
            .update_items_if_draft(evaluation.id, items_json)
            .await?;
        if rows == 0 {
            return Err(AppError::InvalidState(
                "Evaluation is no longer a draft".to_string(),
            ));
        }

        let updated = self.fetch_evaluation(evaluation.id, claims.company_id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationUpdated,
                entity_type: AuditEntityType::Evaluation,
                entity_id: evaluation.id,
                old_data: Some(json!({ "status": evaluation.status })),
                new_data: Some(json!({ "status": updated.status })),
            })
            .await?;

        Ok(updated)
    }

    /// draft → submitted（所有マネージャーのみ）
    ///
    /// 評点が1つ以上入っていることが条件。overall_rating は評点の平均から導出。
    pub async fn submit(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        Self::require_owner_manager(claims, &evaluation)?;
        self.fetch_cycle_for_mutation(evaluation.cycle_id, claims.company_id)
            .await?;

        let items = evaluation.items();
        if !EvaluationItemEntry::has_any_rating(&items) {
            return Err(AppError::ValidationError(
                "items: At least one item must have a rating before submission".to_string(),
            ));
        }
        let overall_rating = EvaluationItemEntry::mean_rating(&items);

        let rows = self
            .evaluation_repo
            .submit(evaluation.id, overall_rating, Utc::now())
            .await?;
        if rows == 0 {
            // 並行する submit に先を越されたか、draft 以外から呼ばれた
            return Err(AppError::InvalidState(
                "Evaluation is not in draft state".to_string(),
            ));
        }

        let updated = self.fetch_evaluation(evaluation.id, claims.company_id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationSubmitted,
                entity_type: AuditEntityType::Evaluation,
                entity_id: evaluation.id,
                old_data: Some(json!({ "status": EvaluationStatus::Draft.as_str() })),
                new_data: Some(json!({
                    "status": updated.status,
                    "overall_rating": updated.overall_rating,
                })),
            })
            .await?;

        info!(evaluation_id = %evaluation.id, user_id = %claims.user_id, "Evaluation submitted");
        Ok(updated)
    }

    /// submitted → draft（差し戻し、所有マネージャーのみ、サイクルがアクティブな間のみ）
    pub async fn recall(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        Self::require_owner_manager(claims, &evaluation)?;
        self.fetch_cycle_for_mutation(evaluation.cycle_id, claims.company_id)
            .await?;

        let rows = self.evaluation_repo.recall(evaluation.id).await?;
        if rows == 0 {
            return Err(AppError::InvalidState(
                "Evaluation is not in submitted state".to_string(),
            ));
        }

        let updated = self.fetch_evaluation(evaluation.id, claims.company_id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationRecalled,
                entity_type: AuditEntityType::Evaluation,
                entity_id: evaluation.id,
                old_data: Some(json!({ "status": EvaluationStatus::Submitted.as_str() })),
                new_data: Some(json!({ "status": updated.status })),
            })
            .await?;

        info!(evaluation_id = %evaluation.id, user_id = %claims.user_id, "Evaluation recalled");
        Ok(updated)
    }

    /// submitted → approved（被評価者本人のみ）
    pub async fn approve(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        // ロールではなく本人性で判定する（被評価者がマネージャーの場合もある）
        if evaluation.employee_id != claims.user_id {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        self.fetch_cycle_for_mutation(evaluation.cycle_id, claims.company_id)
            .await?;

        let rows = self.evaluation_repo.approve(evaluation.id, Utc::now()).await?;
        if rows == 0 {
            return Err(AppError::InvalidState(
                "Evaluation is not in submitted state".to_string(),
            ));
        }

        let updated = self.fetch_evaluation(evaluation.id, claims.company_id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationApproved,
                entity_type: AuditEntityType::Evaluation,
                entity_id: evaluation.id,
                old_data: Some(json!({ "status": EvaluationStatus::Submitted.as_str() })),
                new_data: Some(json!({ "status": updated.status })),
            })
            .await?;

        info!(evaluation_id = %evaluation.id, user_id = %claims.user_id, "Evaluation approved");
        Ok(updated)
    }

    /// approved → completed（HRによる最終確定）
    pub async fn complete(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        permission::require_role(claims, &[UserRole::Hr])?;
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        self.fetch_cycle_for_mutation(evaluation.cycle_id, claims.company_id)
            .await?;

        let rows = self
            .evaluation_repo
            .complete(evaluation.id, Utc::now())
            .await?;
        if rows == 0 {
            return Err(AppError::InvalidState(
                "Evaluation is not in approved state".to_string(),
            ));
        }

        let updated = self.fetch_evaluation(evaluation.id, claims.company_id).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::EvaluationCompleted,
                entity_type: AuditEntityType::Evaluation,
                entity_id: evaluation.id,
                old_data: Some(json!({ "status": EvaluationStatus::Approved.as_str() })),
                new_data: Some(json!({ "status": updated.status })),
            })
            .await?;

        info!(evaluation_id = %evaluation.id, user_id = %claims.user_id, "Evaluation completed");
        Ok(updated)
    }

    // --- 部分評価（HR専用サイドチャネル） ---

    /// HRによる部分評価の記録
    ///
    /// サイクルがクローズされていても書き込める唯一の操作。アーカイブ後は不可。
    pub async fn record_partial_assessment(
        &self,
        claims: &UserClaims,
        input: RecordPartialAssessmentInput,
    ) -> AppResult<PartialAssessmentModel> {
        permission::require_role(claims, &[UserRole::Hr])?;

        if input.note.trim().is_empty() {
            return Err(AppError::ValidationError(
                "note: Note cannot be empty".to_string(),
            ));
        }
        if let Some(rating) = input.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(AppError::ValidationError(
                    "rating: Rating must be between 0 and 5".to_string(),
                ));
            }
        }

        let evaluation = self
            .fetch_evaluation(input.evaluation_id, claims.company_id)
            .await?;

        let cycle = self
            .cycle_repo
            .find_by_id_in_company(evaluation.cycle_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cycle not found".to_string()))?;
        let cycle_status = cycle.status().ok_or_else(|| {
            AppError::InternalServerError("Cycle has an invalid status".to_string())
        })?;
        if !cycle_status.allows_partial_assessment() {
            return Err(AppError::CycleClosed(
                "Cycle is archived, partial assessments are no longer accepted".to_string(),
            ));
        }

        let assessment = PartialAssessmentActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(claims.company_id),
            evaluation_id: Set(evaluation.id),
            cycle_id: Set(evaluation.cycle_id),
            author_id: Set(claims.user_id),
            note: Set(input.note),
            rating: Set(input.rating),
            created_at: Set(Utc::now()),
        };
        let created = self.partial_assessment_repo.create(assessment).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::PartialAssessmentRecorded,
                entity_type: AuditEntityType::PartialAssessment,
                entity_id: created.id,
                old_data: None,
                new_data: Some(json!({
                    "evaluation_id": created.evaluation_id,
                    "rating": created.rating,
                })),
            })
            .await?;

        Ok(created)
    }

    pub async fn list_partial_assessments(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<Vec<PartialAssessmentModel>> {
        permission::require_role(claims, &[UserRole::Hr])?;
        // 評価自体の存在をテナントスコープで確認
        self.fetch_evaluation(evaluation_id, claims.company_id).await?;
        Ok(self
            .partial_assessment_repo
            .find_by_evaluation(evaluation_id, claims.company_id)
            .await?)
    }

    // --- 参照系 ---

    /// ロールに応じたスコープで評価を一覧
    ///
    /// HR: 自社すべて / マネージャー: 自分が所有する評価 / 従業員: 自分が対象の評価
    pub async fn list_evaluations(&self, claims: &UserClaims) -> AppResult<Vec<EvaluationModel>> {
        let evaluations = match claims.role {
            UserRole::Hr => {
                self.evaluation_repo
                    .find_all_by_company(claims.company_id)
                    .await?
            }
            UserRole::Manager => {
                self.evaluation_repo
                    .find_by_manager(claims.user_id, claims.company_id)
                    .await?
            }
            UserRole::Employee => {
                self.evaluation_repo
                    .find_by_employee(claims.user_id, claims.company_id)
                    .await?
            }
        };
        Ok(evaluations)
    }

    /// 単一の評価の取得
    ///
    /// 閲覧権限のないIDは NotFound として扱う（Forbidden と区別させない）。
    pub async fn get_evaluation(
        &self,
        claims: &UserClaims,
        evaluation_id: Uuid,
    ) -> AppResult<EvaluationModel> {
        let evaluation = self.fetch_evaluation(evaluation_id, claims.company_id).await?;

        let can_view = match claims.role {
            UserRole::Hr => true,
            UserRole::Manager => evaluation.manager_id == claims.user_id,
            UserRole::Employee => evaluation.employee_id == claims.user_id,
        } || evaluation.employee_id == claims.user_id;

        if !can_view {
            return Err(AppError::NotFound("Evaluation not found".to_string()));
        }
        Ok(evaluation)
    }
}
