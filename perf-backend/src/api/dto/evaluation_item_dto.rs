// src/api/dto/evaluation_item_dto.rs

use crate::domain::evaluation_item_assignment_model::Model as AssignmentModel;
use crate::domain::evaluation_item_model::Model as ItemModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 評価項目作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvaluationItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    /// okr | competency
    #[validate(length(min = 1, message = "Item type is required"))]
    pub item_type: String,

    /// company | department | manager
    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,

    #[serde(default)]
    pub sort_order: i32,
}

/// 評価項目更新リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvaluationItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    pub sort_order: Option<i32>,
}

/// 評価項目の割り当てリクエスト
#[derive(Debug, Clone, Deserialize)]
pub struct AssignItemRequest {
    pub employee_id: Uuid,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub item_type: String,
    pub level: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemModel> for EvaluationItemResponse {
    fn from(item: ItemModel) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            item_type: item.item_type,
            level: item.level,
            sort_order: item.sort_order,
            is_active: item.is_active,
            creator_id: item.creator_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub employee_id: Uuid,
    pub assigned_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<AssignmentModel> for AssignmentResponse {
    fn from(assignment: AssignmentModel) -> Self {
        Self {
            id: assignment.id,
            item_id: assignment.item_id,
            employee_id: assignment.employee_id,
            assigned_by: assignment.assigned_by,
            created_at: assignment.created_at,
        }
    }
}
