// src/api/handlers/audit_log_handler.rs

use crate::api::dto::audit_log_dto::*;
use crate::api::AppState;
use crate::domain::user_role::UserRole;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::permission;
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// 監査ログ一覧（HRのみ、自社スコープ）
pub async fn list_audit_logs_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<impl IntoResponse> {
    permission::require_role(&user.claims, &[UserRole::Hr])?;

    let (logs, total) = state
        .audit_log_service
        .list_by_company(
            user.company_id(),
            query.entity_type.as_deref(),
            query.entity_id,
            query.per_page(),
            query.offset(),
        )
        .await?;

    let response = AuditLogListResponse {
        logs: logs.into_iter().map(AuditLogResponse::from).collect(),
        total,
        page: query.page(),
        per_page: query.per_page(),
    };
    Ok(Json(ApiResponse::success(response)))
}

pub fn audit_log_router(state: AppState) -> Router {
    Router::new()
        .route("/audit-logs", get(list_audit_logs_handler))
        .with_state(state)
}
