// src/service/evaluation_item_service.rs

use crate::domain::audit_log_model::{AuditAction, AuditEntityType};
use crate::domain::evaluation_item_assignment_model::{
    ActiveModel as AssignmentActiveModel, Model as AssignmentModel,
};
use crate::domain::evaluation_item_model::{
    ActiveModel as ItemActiveModel, ItemLevel, ItemType, Model as ItemModel,
};
use crate::domain::user_model::UserClaims;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::evaluation_item_repository::EvaluationItemRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordActionParams};
use crate::utils::permission;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CreateItemInput {
    pub title: String,
    pub description: Option<String>,
    pub item_type: ItemType,
    pub level: ItemLevel,
    pub sort_order: i32,
}

#[derive(Default)]
pub struct UpdateItemInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

pub struct EvaluationItemService {
    item_repo: Arc<EvaluationItemRepository>,
    user_repo: Arc<UserRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl EvaluationItemService {
    pub fn new(
        item_repo: Arc<EvaluationItemRepository>,
        user_repo: Arc<UserRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            item_repo,
            user_repo,
            audit_log_service,
        }
    }

    /// 評価項目の作成（HRのみ）
    pub async fn create_item(
        &self,
        claims: &UserClaims,
        input: CreateItemInput,
    ) -> AppResult<ItemModel> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "title: Title cannot be empty".to_string(),
            ));
        }

        let item = ItemActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(claims.company_id),
            title: Set(title),
            description: Set(input.description),
            item_type: Set(input.item_type.as_str().to_string()),
            level: Set(input.level.as_str().to_string()),
            sort_order: Set(input.sort_order),
            is_active: Set(true),
            creator_id: Set(claims.user_id),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };
        let created = self.item_repo.create(item).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::ItemCreated,
                entity_type: AuditEntityType::EvaluationItem,
                entity_id: created.id,
                old_data: None,
                new_data: Some(json!({
                    "title": created.title,
                    "item_type": created.item_type,
                    "level": created.level,
                })),
            })
            .await?;

        info!(item_id = %created.id, title = %created.title, "Evaluation item created");
        Ok(created)
    }

    /// 評価項目の更新（HRのみ、種別・レベルは作成後変更不可）
    pub async fn update_item(
        &self,
        claims: &UserClaims,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<ItemModel> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let existing = self
            .item_repo
            .find_by_id_in_company(item_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Evaluation item not found".to_string()))?;

        let old_snapshot = json!({
            "title": existing.title,
            "description": existing.description,
            "sort_order": existing.sort_order,
        });

        let mut active: ItemActiveModel = existing.into();
        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::ValidationError(
                    "title: Title cannot be empty".to_string(),
                ));
            }
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        let updated = self.item_repo.update(active).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::ItemUpdated,
                entity_type: AuditEntityType::EvaluationItem,
                entity_id: updated.id,
                old_data: Some(old_snapshot),
                new_data: Some(json!({
                    "title": updated.title,
                    "description": updated.description,
                    "sort_order": updated.sort_order,
                })),
            })
            .await?;

        Ok(updated)
    }

    /// 評価項目の無効化（HRのみ、既存評価からの参照を壊さないため削除はしない）
    pub async fn deactivate_item(&self, claims: &UserClaims, item_id: Uuid) -> AppResult<()> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let existing = self
            .item_repo
            .find_by_id_in_company(item_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Evaluation item not found".to_string()))?;

        let rows = self.item_repo.set_active(existing.id, false).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Evaluation item not found".to_string()));
        }

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::ItemDeactivated,
                entity_type: AuditEntityType::EvaluationItem,
                entity_id: existing.id,
                old_data: Some(json!({ "is_active": true })),
                new_data: Some(json!({ "is_active": false })),
            })
            .await?;

        Ok(())
    }

    /// 評価項目を従業員に割り当て（HRまたはマネージャー）
    ///
    /// マネージャーは直属部下にのみ割り当てられる。
    pub async fn assign_item(
        &self,
        claims: &UserClaims,
        item_id: Uuid,
        employee_id: Uuid,
    ) -> AppResult<AssignmentModel> {
        permission::require_role(claims, &[UserRole::Hr, UserRole::Manager])?;

        let item = self
            .item_repo
            .find_by_id_in_company(item_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Evaluation item not found".to_string()))?;
        if !item.is_active {
            return Err(AppError::ValidationError(
                "item_id: Inactive items cannot be assigned".to_string(),
            ));
        }

        let employee = self
            .user_repo
            .find_by_id_in_company(employee_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if claims.role == UserRole::Manager && employee.manager_id != Some(claims.user_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        if self
            .item_repo
            .find_assignment(item.id, employee.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This item is already assigned to the employee".to_string(),
            ));
        }

        let assignment = AssignmentActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(claims.company_id),
            item_id: Set(item.id),
            employee_id: Set(employee.id),
            assigned_by: Set(claims.user_id),
            created_at: Set(Utc::now()),
        };
        let created = self
            .item_repo
            .create_assignment(assignment)
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    AppError::Conflict(
                        "This item is already assigned to the employee".to_string(),
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
                action: AuditAction::ItemAssigned,
                entity_type: AuditEntityType::EvaluationItem,
                entity_id: item.id,
                old_data: None,
                new_data: Some(json!({ "employee_id": employee.id })),
            })
            .await?;

        Ok(created)
    }

    pub async fn list_items(
        &self,
        claims: &UserClaims,
        only_active: bool,
    ) -> AppResult<Vec<ItemModel>> {
        Ok(self
            .item_repo
            .find_all_by_company(claims.company_id, only_active)
            .await?)
    }

    pub async fn get_item(&self, claims: &UserClaims, item_id: Uuid) -> AppResult<ItemModel> {
        self.item_repo
            .find_by_id_in_company(item_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Evaluation item not found".to_string()))
    }

    /// 従業員に割り当てられた項目の一覧（本人・直属マネージャー・HRのみ）
    pub async fn list_assignments_for_employee(
        &self,
        claims: &UserClaims,
        employee_id: Uuid,
    ) -> AppResult<Vec<AssignmentModel>> {
        if claims.user_id != employee_id && !claims.is_hr() {
            let employee = self
                .user_repo
                .find_by_id_in_company(employee_id, claims.company_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
            if employee.manager_id != Some(claims.user_id) {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }
        }
        Ok(self
            .item_repo
            .find_assignments_by_employee(employee_id, claims.company_id)
            .await?)
    }
}
