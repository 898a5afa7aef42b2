// src/api/dto/cycle_dto.rs

use crate::domain::performance_cycle_model::Model as CycleModel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// サイクル作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCycleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,
}

/// サイクル状態変更リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCycleStatusRequest {
    /// active | closed | archived
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize)]
pub struct CycleResponse {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CycleModel> for CycleResponse {
    fn from(cycle: CycleModel) -> Self {
        Self {
            id: cycle.id,
            name: cycle.name,
            start_date: cycle.start_date,
            end_date: cycle.end_date,
            status: cycle.status,
            closed_by: cycle.closed_by,
            closed_at: cycle.closed_at,
            created_at: cycle.created_at,
            updated_at: cycle.updated_at,
        }
    }
}
