// src/api/handlers/user_handler.rs

use crate::api::dto::user_dto::*;
use crate::api::AppState;
use crate::domain::user_role::{UserRole, UserType};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::service::user_service::{CreateUserInput, UpdateUserInput};
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

/// ユーザー作成（HRによるプロビジョニング）
pub async fn create_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "user_handler::create"))?;

    let role = UserRole::from_str(&payload.role).ok_or_else(|| {
        AppError::ValidationError(format!("role: Unknown role '{}'", payload.role))
    })?;
    let user_type = UserType::from_str(&payload.user_type).ok_or_else(|| {
        AppError::ValidationError(format!(
            "user_type: Unknown user type '{}'",
            payload.user_type
        ))
    })?;

    let created = state
        .user_service
        .create_user(
            &user.claims,
            CreateUserInput {
                name: payload.name,
                email: payload.email,
                username: payload.username,
                password: payload.password,
                role,
                user_type,
                manager_id: payload.manager_id,
                department: payload.department,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created)),
    ))
}

/// ユーザー一覧（HR: 全員 / マネージャー: 直属部下）
pub async fn list_users_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let users = state.user_service.list_users(&user.claims).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// ユーザー取得
pub async fn get_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let found = state.user_service.get_user(&user.claims, user_id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// ユーザー更新
pub async fn update_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "user_handler::update"))?;

    let role = match payload.role {
        Some(raw) => Some(UserRole::from_str(&raw).ok_or_else(|| {
            AppError::ValidationError(format!("role: Unknown role '{}'", raw))
        })?),
        None => None,
    };

    let updated = state
        .user_service
        .update_user(
            &user.claims,
            user_id,
            UpdateUserInput {
                name: payload.name,
                department: payload.department.map(Some),
                manager_id: payload.manager_id.map(Some),
                role,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// ユーザー無効化
pub async fn deactivate_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let updated = state
        .user_service
        .set_user_active(&user.claims, user_id, false)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        updated,
        "User deactivated",
    )))
}

/// ユーザー再有効化
pub async fn reactivate_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let updated = state
        .user_service
        .set_user_active(&user.claims, user_id, true)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        updated,
        "User reactivated",
    )))
}

pub fn user_router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user_handler))
        .route("/users", get(list_users_handler))
        .route("/users/{id}", get(get_user_handler))
        .route("/users/{id}", patch(update_user_handler))
        .route("/users/{id}/deactivate", post(deactivate_user_handler))
        .route("/users/{id}/reactivate", post(reactivate_user_handler))
        .with_state(state)
}
