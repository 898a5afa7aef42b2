// src/domain/evaluation_model.rs

use super::evaluation_status::EvaluationStatus;
use super::period_type::PeriodType;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// 評価エンティティ（ワークフローの中心）
///
/// company_id は従業員・マネージャー双方の会社と一致しなければならない。
/// (cycle_id, employee_id) はDB側の一意制約で重複作成を防ぐ。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub company_id: Uuid,

    pub cycle_id: Uuid,

    pub employee_id: Uuid,

    pub manager_id: Uuid,

    /// monthly | quarterly | half_year | annual
    pub period_type: String,

    pub period_date: NaiveDate,

    /// draft | submitted | approved | completed
    pub status: String,

    /// 提出時に評価項目の平均から導出される
    #[sea_orm(nullable)]
    pub overall_rating: Option<f64>,

    /// {item_id, rating, comment} のリスト（JSON）
    pub evaluation_items_data: Json,

    #[sea_orm(nullable)]
    pub submitted_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::performance_cycle_model::Entity",
        from = "Column::CycleId",
        to = "crate::domain::performance_cycle_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Cycle,
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::EmployeeId",
        to = "crate::domain::user_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(has_many = "crate::domain::partial_assessment_model::Entity")]
    PartialAssessments,
}

impl Related<crate::domain::performance_cycle_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cycle.def()
    }
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
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
    pub fn status(&self) -> Option<EvaluationStatus> {
        EvaluationStatus::from_str(&self.status)
    }

    pub fn period_type(&self) -> Option<PeriodType> {
        PeriodType::from_str(&self.period_type)
    }

    pub fn items(&self) -> Vec<EvaluationItemEntry> {
        serde_json::from_value(self.evaluation_items_data.clone()).unwrap_or_default()
    }
}

/// evaluation_items_data の1要素
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationItemEntry {
    pub item_id: Uuid,
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl EvaluationItemEntry {
    /// 提出に必要な「評点が1つ以上入っている」条件のチェック
    pub fn has_any_rating(entries: &[Self]) -> bool {
        entries.iter().any(|e| e.rating.is_some())
    }

    /// 評点の平均（overall_rating の導出に使用、評点なしなら None）
    pub fn mean_rating(entries: &[Self]) -> Option<f64> {
        let ratings: Vec<f64> = entries.iter().filter_map(|e| e.rating).collect();
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rating: Option<f64>) -> EvaluationItemEntry {
        EvaluationItemEntry {
            item_id: Uuid::new_v4(),
            rating,
            comment: None,
        }
    }

    #[test]
    fn test_has_any_rating() {
        assert!(!EvaluationItemEntry::has_any_rating(&[]));
        assert!(!EvaluationItemEntry::has_any_rating(&[entry(None)]));
        assert!(EvaluationItemEntry::has_any_rating(&[
            entry(None),
            entry(Some(3.0))
        ]));
    }

    #[test]
    fn test_mean_rating() {
        assert_eq!(EvaluationItemEntry::mean_rating(&[]), None);
        assert_eq!(EvaluationItemEntry::mean_rating(&[entry(None)]), None);
        let mean =
            EvaluationItemEntry::mean_rating(&[entry(Some(2.0)), entry(Some(4.0)), entry(None)]);
        assert_eq!(mean, Some(3.0));
    }
}
