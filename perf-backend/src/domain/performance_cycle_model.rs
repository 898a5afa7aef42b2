// src/domain/performance_cycle_model.rs

use super::cycle_status::CycleStatus;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// 評価サイクルエンティティ
///
/// name は会社ごとに一意（大文字小文字を区別する完全一致）。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "performance_cycles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub company_id: Uuid,

    pub name: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// active | closed | archived
    pub status: String,

    #[sea_orm(nullable)]
    pub closed_by: Option<Uuid>,

    #[sea_orm(nullable)]
    pub closed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::company_model::Entity",
        from = "Column::CompanyId",
        to = "crate::domain::company_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(has_many = "crate::domain::evaluation_model::Entity")]
    Evaluations,
}

impl Related<crate::domain::company_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<crate::domain::evaluation_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
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

impl Model {
    pub fn status(&self) -> Option<CycleStatus> {
        CycleStatus::from_str(&self.status)
    }
}
