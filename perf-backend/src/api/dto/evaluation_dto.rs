// src/api/dto/evaluation_dto.rs

use crate::domain::evaluation_model::{EvaluationItemEntry, Model as EvaluationModel};
use crate::domain::partial_assessment_model::Model as PartialAssessmentModel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 評価項目入力の1行
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvaluationItemInput {
    pub item_id: Uuid,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

impl From<EvaluationItemInput> for EvaluationItemEntry {
    fn from(input: EvaluationItemInput) -> Self {
        Self {
            item_id: input.item_id,
            rating: input.rating,
            comment: input.comment,
        }
    }
}

/// 評価作成リクエスト（ドラフトとして作成される）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvaluationRequest {
    pub cycle_id: Uuid,

    pub employee_id: Uuid,

    /// monthly | quarterly | half_year | annual
    #[validate(length(min = 1, message = "Period type is required"))]
    pub period_type: String,

    pub period_date: NaiveDate,

    #[validate(nested)]
    pub items: Vec<EvaluationItemInput>,
}

/// ドラフト更新リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvaluationRequest {
    #[validate(nested)]
    pub items: Vec<EvaluationItemInput>,
}

/// 部分評価の記録リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPartialAssessmentRequest {
    #[validate(length(min = 1, max = 4000, message = "Note must be between 1 and 4000 characters"))]
    pub note: String,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub cycle_id: Uuid,
    pub employee_id: Uuid,
    pub manager_id: Uuid,
    pub period_type: String,
    pub period_date: NaiveDate,
    pub status: String,
    pub overall_rating: Option<f64>,
    pub items: Vec<EvaluationItemEntry>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EvaluationModel> for EvaluationResponse {
    fn from(evaluation: EvaluationModel) -> Self {
        let items = evaluation.items();
        Self {
            id: evaluation.id,
            cycle_id: evaluation.cycle_id,
            employee_id: evaluation.employee_id,
            manager_id: evaluation.manager_id,
            period_type: evaluation.period_type,
            period_date: evaluation.period_date,
            status: evaluation.status,
            overall_rating: evaluation.overall_rating,
            items,
            submitted_at: evaluation.submitted_at,
            approved_at: evaluation.approved_at,
            completed_at: evaluation.completed_at,
            created_at: evaluation.created_at,
            updated_at: evaluation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartialAssessmentResponse {
    pub id: Uuid,
    pub evaluation_id: Uuid,
    pub cycle_id: Uuid,
    pub author_id: Uuid,
    pub note: String,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<PartialAssessmentModel> for PartialAssessmentResponse {
    fn from(assessment: PartialAssessmentModel) -> Self {
        Self {
            id: assessment.id,
            evaluation_id: assessment.evaluation_id,
            cycle_id: assessment.cycle_id,
            author_id: assessment.author_id,
            note: assessment.note,
            rating: assessment.rating,
            created_at: assessment.created_at,
        }
    }
}
