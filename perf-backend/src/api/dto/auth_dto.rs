// src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// ログインリクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SigninRequest {
    /// メールアドレスまたはユーザー名
    #[validate(length(min = 1, message = "Email or username is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// 会社コード（同じメールが複数テナントに存在する場合の絞り込み用）
    pub company_code: Option<String>,
}

// --- レスポンスDTO ---

/// ログインレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct SigninResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in_hours: i64,
    pub user: SafeUser,
}

/// ログアウトレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct SignoutResponse {
    pub message: String,
}
