// src/domain/audit_log_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// 監査ログエンティティ（追記専用）
///
/// 状態を変更する操作1件につき必ず1行。通常運用では更新・削除しない。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// 操作を実行したユーザー
    pub user_id: Uuid,

    pub user_role: String,

    pub company_id: Uuid,

    pub action: String,

    pub entity_type: String,

    pub entity_id: Uuid,

    /// 変更前のスナップショット（アクションに関係するフィールドのみ）
    #[sea_orm(nullable)]
    pub old_data: Option<Json>,

    /// 変更後のスナップショット
    #[sea_orm(nullable)]
    pub new_data: Option<Json>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::UserId",
        to = "crate::domain::user_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "crate::domain::company_model::Entity",
        from = "Column::CompanyId",
        to = "crate::domain::company_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

// 監査アクションの定義
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AuditAction {
    // 評価ライフサイクル
    EvaluationCreated,
    EvaluationUpdated,
    EvaluationSubmitted,
    EvaluationRecalled,
    EvaluationApproved,
    EvaluationCompleted,

    // サイクルライフサイクル
    CycleCreated,
    CycleClosed,
    CycleReopened,
    CycleArchived,
    CycleDeleted,

    // 部分評価
    PartialAssessmentRecorded,

    // 評価項目
    ItemCreated,
    ItemUpdated,
    ItemDeactivated,
    ItemAssigned,

    // ユーザー管理
    UserCreated,
    UserUpdated,
    UserDeactivated,
    UserReactivated,

    // その他
    Custom(String),
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::EvaluationCreated => "evaluation_created",
            AuditAction::EvaluationUpdated => "evaluation_updated",
            AuditAction::EvaluationSubmitted => "evaluation_submitted",
            AuditAction::EvaluationRecalled => "evaluation_recalled",
            AuditAction::EvaluationApproved => "evaluation_approved",
            AuditAction::EvaluationCompleted => "evaluation_completed",
            AuditAction::CycleCreated => "cycle_created",
            AuditAction::CycleClosed => "cycle_closed",
            AuditAction::CycleReopened => "cycle_reopened",
            AuditAction::CycleArchived => "cycle_archived",
            AuditAction::CycleDeleted => "cycle_deleted",
            AuditAction::PartialAssessmentRecorded => "partial_assessment_recorded",
            AuditAction::ItemCreated => "item_created",
            AuditAction::ItemUpdated => "item_updated",
            AuditAction::ItemDeactivated => "item_deactivated",
            AuditAction::ItemAssigned => "item_assigned",
            AuditAction::UserCreated => "user_created",
            AuditAction::UserUpdated => "user_updated",
            AuditAction::UserDeactivated => "user_deactivated",
            AuditAction::UserReactivated => "user_reactivated",
            AuditAction::Custom(action) => action,
        }
    }
}

/// 監査対象のエンティティ種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    Evaluation,
    Cycle,
    EvaluationItem,
    User,
    PartialAssessment,
}

impl AuditEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntityType::Evaluation => "evaluation",
            AuditEntityType::Cycle => "cycle",
            AuditEntityType::EvaluationItem => "evaluation_item",
            AuditEntityType::User => "user",
            AuditEntityType::PartialAssessment => "partial_assessment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_strings() {
        assert_eq!(AuditAction::EvaluationSubmitted.as_str(), "evaluation_submitted");
        assert_eq!(AuditAction::CycleReopened.as_str(), "cycle_reopened");
        assert_eq!(
            AuditAction::Custom("export_started".to_string()).as_str(),
            "export_started"
        );
    }

    #[test]
    fn test_entity_type_strings() {
        assert_eq!(AuditEntityType::Cycle.as_str(), "cycle");
        assert_eq!(AuditEntityType::Evaluation.as_str(), "evaluation");
    }
}
