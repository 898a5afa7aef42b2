// src/domain/partial_assessment_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// HRによる部分評価（partial assessment）
///
/// マネージャー/従業員のライフサイクルとは独立したHR専用の注記で、
/// サイクルがクローズされた後も書き込める（アーカイブ後は不可）。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partial_assessments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub company_id: Uuid,

    pub evaluation_id: Uuid,

    pub cycle_id: Uuid,

    /// 記入したHRユーザー
    pub author_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub note: String,

    #[sea_orm(nullable)]
    pub rating: Option<f64>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::evaluation_model::Entity",
        from = "Column::EvaluationId",
        to = "crate::domain::evaluation_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Evaluation,
}

impl Related<crate::domain::evaluation_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
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
