// src/service/user_service.rs

use crate::domain::audit_log_model::{AuditAction, AuditEntityType};
use crate::domain::user_model::{ActiveModel as UserActiveModel, SafeUser, UserClaims};
use crate::domain::user_role::{UserRole, UserType};
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordActionParams};
use crate::utils::password::PasswordManager;
use crate::utils::permission;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct CreateUserInput {
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
    pub role: UserRole,
    pub user_type: UserType,
    pub manager_id: Option<Uuid>,
    pub department: Option<String>,
}

#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub department: Option<Option<String>>,
    pub manager_id: Option<Option<Uuid>>,
    pub role: Option<UserRole>,
}

pub struct UserService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    audit_log_service: Arc<AuditLogService>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_manager: Arc<PasswordManager>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            user_repo,
            password_manager,
            audit_log_service,
        }
    }

    /// マネージャー指定が自社の有効なマネージャーを指しているかチェック
    async fn validate_manager(
        &self,
        manager_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<()> {
        let manager = self
            .user_repo
            .find_by_id_in_company(manager_id, company_id)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("manager_id: Manager not found".to_string())
            })?;
        match manager.role() {
            Some(UserRole::Manager) | Some(UserRole::Hr) => Ok(()),
            _ => Err(AppError::ValidationError(
                "manager_id: Assigned manager must have the manager role".to_string(),
            )),
        }
    }

    /// ユーザーの作成（HRのみ、自社内）
    pub async fn create_user(
        &self,
        claims: &UserClaims,
        input: CreateUserInput,
    ) -> AppResult<SafeUser> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("name: Name cannot be empty".to_string()));
        }
        if input.email.is_none() && input.username.is_none() {
            return Err(AppError::ValidationError(
                "email: Either email or username is required".to_string(),
            ));
        }
        if let Some(manager_id) = input.manager_id {
            self.validate_manager(manager_id, claims.company_id).await?;
        }

        let password_hash = self
            .password_manager
            .hash_password(&input.password)
            .map_err(|e| AppError::ValidationError(format!("password: {}", e)))?;

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(input.email.map(|e| e.trim().to_lowercase())),
            username: Set(input.username),
            password_hash: Set(password_hash),
            role: Set(input.role.as_str().to_string()),
            company_id: Set(claims.company_id),
            manager_id: Set(input.manager_id),
            department: Set(input.department),
            user_type: Set(input.user_type.as_str().to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };
        let created = self.user_repo.create(user).await.map_err(|e| {
            if e.to_string().contains("duplicate key") {
                AppError::Conflict("A user with this email already exists".to_string())
            } else {
                AppError::DbErr(e)
            }
        })?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::UserCreated,
                entity_type: AuditEntityType::User,
                entity_id: created.id,
                old_data: None,
                new_data: Some(json!({
                    "name": created.name,
                    "role": created.role,
                    "manager_id": created.manager_id,
                })),
            })
            .await?;

        info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created.to_safe_user())
    }

    /// ユーザー情報の更新（HRのみ、自社内）
    pub async fn update_user(
        &self,
        claims: &UserClaims,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> AppResult<SafeUser> {
        permission::require_role(claims, &[UserRole::Hr])?;

        let existing = self
            .user_repo
            .find_by_id_in_company(user_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(Some(manager_id)) = input.manager_id {
            if manager_id == user_id {
                return Err(AppError::ValidationError(
                    "manager_id: Users cannot be their own manager".to_string(),
                ));
            }
            self.validate_manager(manager_id, claims.company_id).await?;
        }

        let old_snapshot = json!({
            "name": existing.name,
            "role": existing.role,
            "manager_id": existing.manager_id,
            "department": existing.department,
        });

        let mut active: UserActiveModel = existing.into();
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError("name: Name cannot be empty".to_string()));
            }
            active.name = Set(name);
        }
        if let Some(department) = input.department {
            active.department = Set(department);
        }
        if let Some(manager_id) = input.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(role) = input.role {
            active.role = Set(role.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let updated = self.user_repo.update(active).await?;

        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action: AuditAction::UserUpdated,
                entity_type: AuditEntityType::User,
                entity_id: updated.id,
                old_data: Some(old_snapshot),
                new_data: Some(json!({
                    "name": updated.name,
                    "role": updated.role,
                    "manager_id": updated.manager_id,
                    "department": updated.department,
                })),
            })
            .await?;

        Ok(updated.to_safe_user())
    }

    /// ユーザーの無効化/再有効化（HRのみ、物理削除は行わない）
    pub async fn set_user_active(
        &self,
        claims: &UserClaims,
        user_id: Uuid,
        is_active: bool,
    ) -> AppResult<SafeUser> {
        permission::require_role(claims, &[UserRole::Hr])?;

        if user_id == claims.user_id && !is_active {
            return Err(AppError::ValidationError(
                "user_id: You cannot deactivate your own account".to_string(),
            ));
        }

        let existing = self
            .user_repo
            .find_by_id_in_company(user_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let rows = self.user_repo.set_active(existing.id, is_active).await?;
        if rows == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let updated = self
            .user_repo
            .find_by_id_in_company(existing.id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let action = if is_active {
            AuditAction::UserReactivated
        } else {
            AuditAction::UserDeactivated
        };
        self.audit_log_service
            .record(RecordActionParams {
                actor_id: claims.user_id,
                actor_role: claims.role,
                company_id: claims.company_id,
                action,
                entity_type: AuditEntityType::User,
                entity_id: updated.id,
                old_data: Some(json!({ "is_active": existing.is_active })),
                new_data: Some(json!({ "is_active": updated.is_active })),
            })
            .await?;

        info!(user_id = %updated.id, is_active, "User active flag changed");
        Ok(updated.to_safe_user())
    }

    /// 自社ユーザーの一覧（HRは全員、マネージャーは直属部下のみ）
    pub async fn list_users(&self, claims: &UserClaims) -> AppResult<Vec<SafeUser>> {
        let users = match claims.role {
            UserRole::Hr => self.user_repo.find_all_by_company(claims.company_id).await?,
            UserRole::Manager => {
                self.user_repo
                    .find_direct_reports(claims.user_id, claims.company_id)
                    .await?
            }
            UserRole::Employee => {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }
        };
        Ok(users.into_iter().map(SafeUser::from).collect())
    }

    pub async fn get_user(&self, claims: &UserClaims, user_id: Uuid) -> AppResult<SafeUser> {
        let user = self
            .user_repo
            .find_by_id_in_company(user_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let can_view = claims.is_hr()
            || user.id == claims.user_id
            || user.manager_id == Some(claims.user_id);
        if !can_view {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(user.to_safe_user())
    }
}
