// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Failed to parse UUID: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // ライフサイクル遷移が現在の状態から許可されていない（楽観的更新の競合も含む）
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // サイクルがクローズ/アーカイブされているため変更不可
    #[error("Cycle closed: {0}")]
    CycleClosed(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn simple(status: StatusCode, error_type: &str, message: String) -> (StatusCode, ErrorResponse) {
        (
            status,
            ErrorResponse {
                success: false,
                error: message.clone(),
                message,
                validation_errors: None,
                errors: None,
                error_type: error_type.to_string(),
            },
        )
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出すが、クライアントには内部情報を返さない
                tracing::error!(error = ?db_err, "Database error");

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match &db_err {
                    DbErr::RecordNotFound(_) => "The requested resource was not found".to_string(),
                    _ => "A database error occurred".to_string(),
                };
                AppError::simple(status, "database_error", message)
            }
            AppError::NotFound(message) => {
                AppError::simple(StatusCode::NOT_FOUND, "not_found", message)
            }
            AppError::ValidationError(message) => {
                AppError::simple(StatusCode::BAD_REQUEST, "validation_error", message)
            }
            AppError::ValidationErrors(errors) => {
                let mut field_errors = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_insert_with(Vec::new)
                            .push(message.to_string());
                    }
                }
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        validation_errors: Some(field_errors),
                        errors: Some(errors),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::UuidError(err) => AppError::simple(
                StatusCode::BAD_REQUEST,
                "invalid_uuid",
                format!("Invalid UUID: {}", err),
            ),
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                let errors_flat: Vec<String> = field_errors
                    .iter()
                    .flat_map(|(field, messages)| {
                        messages.iter().map(move |msg| format!("{}: {}", field, msg))
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        validation_errors: Some(field_errors),
                        errors: Some(errors_flat),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::BadRequest(message) => {
                AppError::simple(StatusCode::BAD_REQUEST, "bad_request", message)
            }
            AppError::Unauthorized(message) => {
                AppError::simple(StatusCode::UNAUTHORIZED, "unauthorized", message)
            }
            AppError::Forbidden(message) => {
                AppError::simple(StatusCode::FORBIDDEN, "forbidden", message)
            }
            AppError::Conflict(message) => {
                AppError::simple(StatusCode::CONFLICT, "conflict", message)
            }
            AppError::InvalidState(message) => {
                AppError::simple(StatusCode::CONFLICT, "invalid_state", message)
            }
            AppError::CycleClosed(message) => {
                AppError::simple(StatusCode::CONFLICT, "cycle_closed", message)
            }
            AppError::TooManyRequests(message) => {
                AppError::simple(StatusCode::TOO_MANY_REQUESTS, "too_many_requests", message)
            }
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                AppError::simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_server_error",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub error_type: String,
}
