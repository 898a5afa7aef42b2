// src/utils/error_helper.rs

//! エラーハンドリングの統一化ヘルパー

use crate::error::AppError;
use tracing::{error, warn};
use validator::ValidationErrors;

/// validatorのValidationErrorsをAppErrorに変換する統一処理
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    warn!(
        context = %context,
        error_count = validation_errors.field_errors().len(),
        "Validation failed"
    );

    let errors: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| "Invalid value".to_string(), |cow| cow.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();

    AppError::ValidationErrors(errors)
}

/// 単一のバリデーションエラーメッセージを生成
pub fn validation_error(field: &str, message: &str) -> AppError {
    AppError::ValidationError(format!("{}: {}", field, message))
}

/// 予期しない内部エラー（詳細はサーバーログのみに残す）
pub fn internal_server_error(
    err: impl std::fmt::Display,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(context = %context, error = %err, "Internal server error");
    AppError::InternalServerError(user_message.to_string())
}
