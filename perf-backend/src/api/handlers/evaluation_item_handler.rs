// src/api/handlers/evaluation_item_handler.rs

use crate::api::dto::evaluation_item_dto::*;
use crate::api::AppState;
use crate::domain::evaluation_item_model::{ItemLevel, ItemType};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::service::evaluation_item_service::{CreateItemInput, UpdateItemInput};
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// 無効化済み項目も含めるか（既定は有効なもののみ）
    #[serde(default)]
    pub include_inactive: bool,
}

/// 評価項目の作成
pub async fn create_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEvaluationItemRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_item_handler::create"))?;

    let item_type = ItemType::from_str(&payload.item_type).ok_or_else(|| {
        AppError::ValidationError(format!(
            "item_type: Unknown item type '{}'",
            payload.item_type
        ))
    })?;
    let level = ItemLevel::from_str(&payload.level).ok_or_else(|| {
        AppError::ValidationError(format!("level: Unknown level '{}'", payload.level))
    })?;

    let item = state
        .evaluation_item_service
        .create_item(
            &user.claims,
            CreateItemInput {
                title: payload.title,
                description: payload.description,
                item_type,
                level,
                sort_order: payload.sort_order,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(EvaluationItemResponse::from(item))),
    ))
}

/// 評価項目の一覧
pub async fn list_items_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListItemsQuery>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .evaluation_item_service
        .list_items(&user.claims, !query.include_inactive)
        .await?;
    let response: Vec<EvaluationItemResponse> = items
        .into_iter()
        .map(EvaluationItemResponse::from)
        .collect();
    Ok(Json(ApiResponse::success(response)))
}

/// 評価項目の取得
pub async fn get_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let item = state
        .evaluation_item_service
        .get_item(&user.claims, item_id)
        .await?;
    Ok(Json(ApiResponse::success(EvaluationItemResponse::from(
        item,
    ))))
}

/// 評価項目の更新
pub async fn update_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateEvaluationItemRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_item_handler::update"))?;

    let item = state
        .evaluation_item_service
        .update_item(
            &user.claims,
            item_id,
            UpdateItemInput {
                title: payload.title,
                description: payload.description.map(Some),
                sort_order: payload.sort_order,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(EvaluationItemResponse::from(
        item,
    ))))
}

/// 評価項目の無効化
pub async fn deactivate_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state
        .evaluation_item_service
        .deactivate_item(&user.claims, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 評価項目の割り当て
pub async fn assign_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<AssignItemRequest>,
) -> AppResult<impl IntoResponse> {
    let assignment = state
        .evaluation_item_service
        .assign_item(&user.claims, item_id, payload.employee_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AssignmentResponse::from(assignment))),
    ))
}

/// 従業員への割り当て一覧
pub async fn list_assignments_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let assignments = state
        .evaluation_item_service
        .list_assignments_for_employee(&user.claims, employee_id)
        .await?;
    let response: Vec<AssignmentResponse> = assignments
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();
    Ok(Json(ApiResponse::success(response)))
}

pub fn evaluation_item_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluation-items", post(create_item_handler))
        .route("/evaluation-items", get(list_items_handler))
        .route("/evaluation-items/{id}", get(get_item_handler))
        .route("/evaluation-items/{id}", patch(update_item_handler))
        .route("/evaluation-items/{id}", delete(deactivate_item_handler))
        .route(
            "/evaluation-items/{id}/assignments",
            post(assign_item_handler),
        )
        .route(
            "/users/{id}/evaluation-items",
            get(list_assignments_handler),
        )
        .with_state(state)
}
