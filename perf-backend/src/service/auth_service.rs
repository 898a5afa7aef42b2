// src/service/auth_service.rs

use crate::domain::user_model::{SafeUser, UserClaims};
use crate::error::{AppError, AppResult};
use crate::repository::company_repository::CompanyRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SigninInput {
    /// メールアドレスまたはユーザー名
    pub identifier: String,
    pub password: String,
    /// 複数テナントに同じメールが存在しうるため、会社コードで絞り込める
    pub company_code: Option<String>,
}

pub struct SigninOutput {
    pub access_token: String,
    pub user: SafeUser,
    pub expires_in_hours: i64,
}

pub struct AuthService {
    user_repo: Arc<UserRepository>,
    company_repo: Arc<CompanyRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        company_repo: Arc<CompanyRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            user_repo,
            company_repo,
            password_manager,
            jwt_manager,
        }
    }

    /// サインイン
    ///
    /// 失敗理由（ユーザー不在・パスワード不一致・無効化済み・会社無効）は
    /// すべて同一の Unauthorized として返す。存在の有無を漏らさないため。
    pub async fn signin(&self, input: SigninInput) -> AppResult<SigninOutput> {
        let identifier = input.identifier.trim();
        if identifier.is_empty() || input.password.is_empty() {
            return Err(Self::invalid_credentials());
        }

        // 会社コード指定があればテナントを先に解決
        let company_id = match &input.company_code {
            Some(code) => {
                let company = self
                    .company_repo
                    .find_by_code(code.trim())
                    .await?
                    .filter(|c| c.is_active);
                match company {
                    Some(c) => Some(c.id),
                    None => {
                        warn!(identifier = %identifier, "Signin with unknown or inactive company code");
                        return Err(Self::invalid_credentials());
                    }
                }
            }
            None => None,
        };

        let user = match self
            .user_repo
            .find_by_identifier(identifier, company_id)
            .await?
        {
            Some(user) => user,
            None => {
                // タイミング差での存在推測を防ぐためダミー検証を行う
                let _ = self.password_manager.verify_password(
                    &input.password,
                    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$dummyhashdummyhashdummyhashdummyhash",
                );
                return Err(Self::invalid_credentials());
            }
        };

        if self
            .password_manager
            .verify_password(&input.password, &user.password_hash)
            .is_err()
        {
            warn!(user_id = %user.id, "Signin failed: password mismatch");
            return Err(Self::invalid_credentials());
        }

        if !user.can_authenticate() {
            warn!(user_id = %user.id, "Signin rejected: user is deactivated");
            return Err(Self::invalid_credentials());
        }

        // 所属会社も有効でなければならない
        if self
            .company_repo
            .find_active_by_id(user.company_id)
            .await?
            .is_none()
        {
            warn!(user_id = %user.id, company_id = %user.company_id, "Signin rejected: company inactive");
            return Err(Self::invalid_credentials());
        }

        let claims = user
            .to_claims()
            .ok_or_else(|| AppError::InternalServerError("User has an invalid role".to_string()))?;

        let access_token = self
            .jwt_manager
            .generate_access_token(claims)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to issue access token");
                AppError::InternalServerError("Failed to issue access token".to_string())
            })?;

        self.user_repo.update_last_login(user.id).await?;

        info!(user_id = %user.id, company_id = %user.company_id, "User signed in");

        Ok(SigninOutput {
            access_token,
            user: user.to_safe_user(),
            expires_in_hours: self.jwt_manager.access_token_expiry_hours(),
        })
    }

    /// 認証済みユーザー自身の情報を取得
    pub async fn current_user(&self, claims: &UserClaims) -> AppResult<SafeUser> {
        let user = self
            .user_repo
            .find_by_id_in_company(claims.user_id, claims.company_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
        if !user.can_authenticate() {
            return Err(AppError::Unauthorized("User is deactivated".to_string()));
        }
        Ok(user.to_safe_user())
    }

    fn invalid_credentials() -> AppError {
        AppError::Unauthorized("Invalid credentials".to_string())
    }
}
