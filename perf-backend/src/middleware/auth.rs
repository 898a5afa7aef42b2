// src/middleware/auth.rs

use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use crate::utils::jwt::JwtManager;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, warn};

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub access_token_cookie_name: String,
    pub skip_auth_paths: Vec<String>,
}

impl AuthMiddlewareConfig {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            access_token_cookie_name: "access_token".to_string(),
            skip_auth_paths: vec!["/auth/signin".to_string(), "/health".to_string()],
        }
    }
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
    pub access_token: String,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims, access_token: String) -> Self {
        Self {
            claims,
            access_token,
        }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.user_id
    }

    pub fn company_id(&self) -> uuid::Uuid {
        self.claims.company_id
    }

    pub fn is_hr(&self) -> bool {
        self.claims.is_hr()
    }
}

/// JWT認証ミドルウェア
///
/// Authorization: Bearer ヘッダー優先、Cookieはフォールバック。
/// 検証済みクレームは AuthenticatedUser としてリクエストに載せる。
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if should_skip_auth(&path, &config.skip_auth_paths) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(&headers, &cookie_jar, &config.access_token_cookie_name)
        .ok_or_else(|| {
            warn!(path = %path, "Missing authentication token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

    let access_claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_claims = access_claims.user.clone();

    // is_active=false のクレームを持つトークンを弾く。クレームは発行時点の
    // スナップショットであり、発行後の無効化はトークン失効まで検知されない。
    if !user_claims.is_active {
        warn!(
            user_id = %user_claims.user_id,
            path = %path,
            "Access attempt with inactive account"
        );
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    let remaining_minutes = config
        .jwt_manager
        .get_access_token_remaining_minutes(&access_claims);
    if remaining_minutes <= 0 {
        warn!(
            user_id = %user_claims.user_id,
            path = %path,
            "Access attempt with expired token"
        );
        return Err(AppError::Unauthorized("Token has expired".to_string()));
    }

    info!(
        user_id = %user_claims.user_id,
        company_id = %user_claims.company_id,
        role = %user_claims.role,
        path = %path,
        "Authenticated request"
    );

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_claims, token));

    Ok(next.run(request).await)
}

// --- ヘルパー関数 ---

/// リクエストからトークンを抽出
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer ").map(|s| s.to_string()));

    let cookie_token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string());

    auth_header.or(cookie_token)
}

/// 認証をスキップするパスかチェック
fn should_skip_auth(path: &str, skip_paths: &[String]) -> bool {
    skip_paths
        .iter()
        .any(|skip_path| path.starts_with(skip_path) || path == skip_path)
}

/// クライアントIPを抽出（プロキシ経由を考慮）
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded_for) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            return forwarded_str
                .split(',')
                .next()
                .map(|ip| ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_skip_auth() {
        let skip = vec!["/auth/signin".to_string(), "/health".to_string()];
        assert!(should_skip_auth("/auth/signin", &skip));
        assert!(should_skip_auth("/health", &skip));
        assert!(!should_skip_auth("/evaluations", &skip));
    }

    #[test]
    fn test_extract_client_ip_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(
            extract_client_ip(&headers),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_extract_client_ip_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers), None);
    }
}
