// src/domain/company_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// 会社（テナント）エンティティ
///
/// すべてのエンティティは company_id を持ち、テナント境界を越えたアクセスは禁止。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// ログイン時のテナント指定に使う会社コード（グローバルに一意）
    #[sea_orm(unique)]
    pub code: String,

    pub is_active: bool,

    // AI機能のトグル
    pub ai_analysis_enabled: bool,
    pub ai_suggestions_enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::user_model::Entity")]
    Users,
    #[sea_orm(has_many = "crate::domain::performance_cycle_model::Entity")]
    PerformanceCycles,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<crate::domain::performance_cycle_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceCycles.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}
