// src/api/handlers/cycle_handler.rs

use crate::api::dto::cycle_dto::*;
use crate::api::AppState;
use crate::domain::cycle_status::CycleStatus;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::service::cycle_service::CreateCycleInput;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use uuid::Uuid;
use validator::Validate;

/// サイクル作成
pub async fn create_cycle_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCycleRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "cycle_handler::create"))?;

    let cycle = state
        .cycle_service
        .create_cycle(
            &user.claims,
            CreateCycleInput {
                name: payload.name,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CycleResponse::from(cycle))),
    ))
}

/// サイクル一覧
pub async fn list_cycles_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let cycles = state.cycle_service.list_cycles(&user.claims).await?;
    let response: Vec<CycleResponse> = cycles.into_iter().map(CycleResponse::from).collect();
    Ok(Json(ApiResponse::success(response)))
}

/// サイクル取得
pub async fn get_cycle_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(cycle_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let cycle = state.cycle_service.get_cycle(&user.claims, cycle_id).await?;
    Ok(Json(ApiResponse::success(CycleResponse::from(cycle))))
}

/// サイクル状態変更（close / reopen / archive）
pub async fn update_cycle_status_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(cycle_id): Path<Uuid>,
    Json(payload): Json<UpdateCycleStatusRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "cycle_handler::update_status"))?;

    let target = CycleStatus::from_str(&payload.status).ok_or_else(|| {
        AppError::ValidationError(format!("status: Unknown cycle status '{}'", payload.status))
    })?;

    let cycle = state
        .cycle_service
        .set_cycle_status(&user.claims, cycle_id, target)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        CycleResponse::from(cycle),
        "Cycle status updated",
    )))
}

/// サイクル削除（依存する評価がない場合のみ）
pub async fn delete_cycle_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(cycle_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.cycle_service.delete_cycle(&user.claims, cycle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn cycle_router(state: AppState) -> Router {
    Router::new()
        .route("/cycles", post(create_cycle_handler))
        .route("/cycles", get(list_cycles_handler))
        .route("/cycles/{id}", get(get_cycle_handler))
        .route("/cycles/{id}/status", patch(update_cycle_status_handler))
        .route("/cycles/{id}", delete(delete_cycle_handler))
        .with_state(state)
}
