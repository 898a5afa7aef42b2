// src/api/handlers/evaluation_handler.rs

use crate::api::dto::evaluation_dto::*;
use crate::api::AppState;
use crate::domain::period_type::PeriodType;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::service::evaluation_service::{CreateEvaluationInput, RecordPartialAssessmentInput};
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;
use validator::Validate;

/// 評価の作成（ドラフト）
pub async fn create_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEvaluationRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_handler::create"))?;

    let period_type = PeriodType::from_str(&payload.period_type).ok_or_else(|| {
        AppError::ValidationError(format!(
            "period_type: Unknown period type '{}'",
            payload.period_type
        ))
    })?;

    let evaluation = state
        .evaluation_service
        .create_evaluation(
            &user.claims,
            CreateEvaluationInput {
                cycle_id: payload.cycle_id,
                employee_id: payload.employee_id,
                period_type,
                period_date: payload.period_date,
                items: payload.items.into_iter().map(Into::into).collect(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(EvaluationResponse::from(evaluation))),
    ))
}

/// 評価一覧（ロールに応じたスコープ）
pub async fn list_evaluations_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let evaluations = state.evaluation_service.list_evaluations(&user.claims).await?;
    let response: Vec<EvaluationResponse> = evaluations
        .into_iter()
        .map(EvaluationResponse::from)
        .collect();
    Ok(Json(ApiResponse::success(response)))
}

/// 評価の取得
pub async fn get_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let evaluation = state
        .evaluation_service
        .get_evaluation(&user.claims, evaluation_id)
        .await?;
    Ok(Json(ApiResponse::success(EvaluationResponse::from(
        evaluation,
    ))))
}

/// ドラフトの更新
pub async fn update_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
    Json(payload): Json<UpdateEvaluationRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_handler::update"))?;

    let evaluation = state
        .evaluation_service
        .update_draft(
            &user.claims,
            evaluation_id,
            payload.items.into_iter().map(Into::into).collect(),
        )
        .await?;

    Ok(Json(ApiResponse::success(EvaluationResponse::from(
        evaluation,
    ))))
}

/// draft → submitted
pub async fn submit_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let evaluation = state
        .evaluation_service
        .submit(&user.claims, evaluation_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        EvaluationResponse::from(evaluation),
        "Evaluation submitted",
    )))
}

/// submitted → draft（差し戻し）
pub async fn recall_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let evaluation = state
        .evaluation_service
        .recall(&user.claims, evaluation_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        EvaluationResponse::from(evaluation),
        "Evaluation recalled to draft",
    )))
}

/// submitted → approved（被評価者による承認）
pub async fn approve_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let evaluation = state
        .evaluation_service
        .approve(&user.claims, evaluation_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        EvaluationResponse::from(evaluation),
        "Evaluation approved",
    )))
}

/// approved → completed（HRによる最終確定）
pub async fn complete_evaluation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let evaluation = state
        .evaluation_service
        .complete(&user.claims, evaluation_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        EvaluationResponse::from(evaluation),
        "Evaluation completed",
    )))
}

/// 部分評価の記録（HR専用）
pub async fn record_partial_assessment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
    Json(payload): Json<RecordPartialAssessmentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_handler::record_partial_assessment"))?;

    let assessment = state
        .evaluation_service
        .record_partial_assessment(
            &user.claims,
            RecordPartialAssessmentInput {
                evaluation_id,
                note: payload.note,
                rating: payload.rating,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PartialAssessmentResponse::from(
            assessment,
        ))),
    ))
}

/// 部分評価の一覧（HR専用）
pub async fn list_partial_assessments_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(evaluation_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let assessments = state
        .evaluation_service
        .list_partial_assessments(&user.claims, evaluation_id)
        .await?;
    let response: Vec<PartialAssessmentResponse> = assessments
        .into_iter()
        .map(PartialAssessmentResponse::from)
        .collect();
    Ok(Json(ApiResponse::success(response)))
}

pub fn evaluation_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluations", post(create_evaluation_handler))
        .route("/evaluations", get(list_evaluations_handler))
        .route("/evaluations/{id}", get(get_evaluation_handler))
        .route("/evaluations/{id}", patch(update_evaluation_handler))
        .route("/evaluations/{id}/submit", post(submit_evaluation_handler))
        .route("/evaluations/{id}/recall", post(recall_evaluation_handler))
        .route("/evaluations/{id}/approve", post(approve_evaluation_handler))
        .route(
            "/evaluations/{id}/complete",
            post(complete_evaluation_handler),
        )
        .route(
            "/evaluations/{id}/partial-assessments",
            post(record_partial_assessment_handler),
        )
        .route(
            "/evaluations/{id}/partial-assessments",
            get(list_partial_assessments_handler),
        )
        .with_state(state)
}
