// src/api/handlers/auth_handler.rs

use crate::api::dto::auth_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{extract_client_ip, AuthenticatedUser};
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Cookie;
use tracing::info;
use validator::Validate;

/// ログイン
pub async fn signin_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SigninRequest>,
) -> AppResult<Response> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "auth_handler::signin"))?;

    info!(identifier = %payload.identifier, "User signin attempt");

    let output = state
        .auth_service
        .signin(crate::service::auth_service::SigninInput {
            identifier: payload.identifier,
            password: payload.password,
            company_code: payload.company_code,
        })
        .await?;

    // 成功したら同一IPの失敗カウントをクリアする
    if let Some(client_ip) = extract_client_ip(&headers) {
        state
            .rate_limit
            .store
            .reset(&format!("signin:{}", client_ip))
            .await;
    }

    let body = SigninResponse {
        access_token: output.access_token.clone(),
        token_type: "Bearer".to_string(),
        expires_in_hours: output.expires_in_hours,
        user: output.user,
    };

    // ブラウザクライアント向けにHttpOnly Cookieでも返す
    let cookie = Cookie::build(("access_token", output.access_token))
        .path("/")
        .http_only(true)
        .build();

    let mut response = Json(ApiResponse::success(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// ログアウト
///
/// JWTはステートレスなのでサーバー側の失効はなく、Cookieの破棄のみ行う。
pub async fn signout_handler(user: AuthenticatedUser) -> AppResult<Response> {
    info!(user_id = %user.user_id(), "User signed out");

    let expired = Cookie::build(("access_token", ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .build();

    let body = SignoutResponse {
        message: "Successfully signed out".to_string(),
    };
    let mut response = Json(ApiResponse::success(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&expired.to_string()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// 認証済みユーザー自身の情報
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let safe_user = state.auth_service.current_user(&user.claims).await?;
    Ok(Json(ApiResponse::success(safe_user)))
}

/// ヘルスチェック
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

// signin はレート制限を挟むため create_app 側で登録される
pub fn auth_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/signout", post(signout_handler))
        .route("/auth/me", get(me_handler))
        .with_state(state)
}
