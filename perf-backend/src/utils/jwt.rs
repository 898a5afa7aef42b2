// src/utils/jwt.rs

use crate::domain::user_model::UserClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode JWT: {0}")]
    DecodingError(String),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Missing JWT secret key")]
    MissingSecretKey,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// アクセストークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Not before
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID
    pub jti: String,
    /// User information
    pub user: UserClaims,
}

/// JWT設定
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT秘密鍵
    pub secret_key: String,
    /// アクセストークンの有効期限（時間）
    pub access_token_expiry_hours: i64,
    /// 発行者
    pub issuer: String,
    /// 対象者
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: "your-secret-key".to_string(), // 本番では絶対に変更すること
            access_token_expiry_hours: 24,
            issuer: "perf-backend".to_string(),
            audience: "perf-backend-users".to_string(),
        }
    }
}

impl JwtConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET_KEY"))
            .map_err(|_| JwtError::MissingSecretKey)?;

        let access_token_expiry_hours = env::var("JWT_ACCESS_TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| JwtError::ConfigurationError("Invalid access token expiry".to_string()))?;

        Ok(Self {
            secret_key,
            access_token_expiry_hours,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "perf-backend".to_string()),
            audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "perf-backend-users".to_string()),
        })
    }

    /// シークレットを指定してその他はデフォルト
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }
}

/// JWTの発行と検証を担うマネージャー
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self::new(JwtConfig::from_env()?))
    }

    /// アクセストークンを生成（TTLは設定値、既定24時間）
    pub fn generate_access_token(&self, user: UserClaims) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.config.access_token_expiry_hours);

        let claims = AccessTokenClaims {
            sub: user.user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            user,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// アクセストークンを検証
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.leeway = 0;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// トークンの残り有効時間（分）を取得
    pub fn get_access_token_remaining_minutes(&self, claims: &AccessTokenClaims) -> i64 {
        let now = Utc::now().timestamp();
        (claims.exp - now) / 60
    }

    /// 設定上のアクセストークン有効期間（時間）
    pub fn access_token_expiry_hours(&self) -> i64 {
        self.config.access_token_expiry_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user_role::{UserRole, UserType};

    fn sample_claims() -> UserClaims {
        UserClaims {
            user_id: Uuid::new_v4(),
            name: "Hanako Sato".to_string(),
            role: UserRole::Hr,
            company_id: Uuid::new_v4(),
            user_type: UserType::Office,
            department: Some("HR".to_string()),
            is_active: true,
        }
    }

    fn test_manager(expiry_hours: i64) -> JwtManager {
        JwtManager::new(JwtConfig {
            secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
            access_token_expiry_hours: expiry_hours,
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_generate_and_verify_round_trip() {
        let manager = test_manager(24);
        let claims = sample_claims();

        let token = manager.generate_access_token(claims.clone()).unwrap();
        let decoded = manager.verify_access_token(&token).unwrap();

        assert_eq!(decoded.user, claims);
        assert_eq!(decoded.sub, claims.user_id.to_string());
        // 残り時間はほぼ24時間
        let remaining = manager.get_access_token_remaining_minutes(&decoded);
        assert!(remaining > 23 * 60 && remaining <= 24 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = test_manager(-1);
        let token = manager.generate_access_token(sample_claims()).unwrap();

        match manager.verify_access_token(&token) {
            Err(JwtError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reported_expiry_matches_config() {
        // サインイン応答で返す有効期間は設定値と一致しなければならない
        let manager = test_manager(12);
        assert_eq!(manager.access_token_expiry_hours(), 12);

        let token = manager.generate_access_token(sample_claims()).unwrap();
        let decoded = manager.verify_access_token(&token).unwrap();
        let remaining = manager.get_access_token_remaining_minutes(&decoded);
        assert!(remaining > 11 * 60 && remaining <= 12 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = test_manager(24);
        let token = manager.generate_access_token(sample_claims()).unwrap();

        let other = JwtManager::new(JwtConfig::with_secret("another-secret-key-32-chars-long!!"));
        assert!(other.verify_access_token(&token).is_err());
    }
}
