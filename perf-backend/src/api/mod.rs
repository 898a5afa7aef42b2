// src/api/mod.rs

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::logging;
use crate::middleware::auth::{jwt_auth_middleware, AuthMiddlewareConfig};
use crate::middleware::rate_limit::{
    signin_rate_limit_middleware, RateLimitConfig, RateLimitState,
};
use crate::repository::{
    audit_log_repository::AuditLogRepository, company_repository::CompanyRepository,
    evaluation_item_repository::EvaluationItemRepository,
    evaluation_repository::EvaluationRepository,
    partial_assessment_repository::PartialAssessmentRepository,
    performance_cycle_repository::PerformanceCycleRepository, user_repository::UserRepository,
};
use crate::service::{
    audit_log_service::AuditLogService, auth_service::AuthService, cycle_service::CycleService,
    evaluation_item_service::EvaluationItemService, evaluation_service::EvaluationService,
    user_service::UserService,
};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub cycle_service: Arc<CycleService>,
    pub evaluation_service: Arc<EvaluationService>,
    pub evaluation_item_service: Arc<EvaluationItemService>,
    pub audit_log_service: Arc<AuditLogService>,
    pub jwt_manager: Arc<JwtManager>,
    pub rate_limit: RateLimitState,
    pub server_addr: String,
}

impl AppState {
    /// リポジトリとサービスを組み立てて状態を構築
    pub fn new(db_pool: DbPool, jwt_manager: Arc<JwtManager>, config: &AppConfig) -> Self {
        let db_pool = Arc::new(db_pool);
        let company_repo = Arc::new(CompanyRepository::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let cycle_repo = Arc::new(PerformanceCycleRepository::new(db_pool.clone()));
        let evaluation_repo = Arc::new(EvaluationRepository::new(db_pool.clone()));
        let item_repo = Arc::new(EvaluationItemRepository::new(db_pool.clone()));
        let partial_assessment_repo = Arc::new(PartialAssessmentRepository::new(db_pool.clone()));
        let audit_log_repo = Arc::new(AuditLogRepository::new(db_pool));

        let password_manager = Arc::new(PasswordManager::default());
        let audit_log_service = Arc::new(AuditLogService::new(audit_log_repo));

        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            company_repo,
            password_manager.clone(),
            jwt_manager.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            password_manager,
            audit_log_service.clone(),
        ));
        let cycle_service = Arc::new(CycleService::new(
            cycle_repo.clone(),
            evaluation_repo.clone(),
            audit_log_service.clone(),
        ));
        let evaluation_service = Arc::new(EvaluationService::new(
            evaluation_repo,
            cycle_repo,
            user_repo.clone(),
            partial_assessment_repo,
            audit_log_service.clone(),
        ));
        let evaluation_item_service = Arc::new(EvaluationItemService::new(
            item_repo,
            user_repo,
            audit_log_service.clone(),
        ));

        Self {
            auth_service,
            user_service,
            cycle_service,
            evaluation_service,
            evaluation_item_service,
            audit_log_service,
            jwt_manager,
            rate_limit: RateLimitState::new(RateLimitConfig::default()),
            server_addr: config.server_addr(),
        }
    }
}

/// アプリケーション全体のルーターを構築
pub fn create_app(state: AppState) -> Router {
    let auth_config = AuthMiddlewareConfig::new(state.jwt_manager.clone());

    // サインインのみレート制限付き
    let signin_router: Router<AppState> = Router::new()
        .route(
            "/auth/signin",
            axum::routing::post(handlers::auth_handler::signin_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            signin_rate_limit_middleware,
        ));

    Router::new()
        .merge(signin_router.with_state(state.clone()))
        .merge(handlers::auth_handler::auth_router(state.clone()))
        .merge(handlers::cycle_handler::cycle_router(state.clone()))
        .merge(handlers::evaluation_handler::evaluation_router(state.clone()))
        .merge(handlers::evaluation_item_handler::evaluation_item_router(
            state.clone(),
        ))
        .merge(handlers::user_handler::user_router(state.clone()))
        .merge(handlers::audit_log_handler::audit_log_router(state))
        .route("/health", get(handlers::auth_handler::health_handler))
        .layer(middleware::from_fn_with_state(
            auth_config,
            jwt_auth_middleware,
        ))
        .layer(middleware::from_fn(logging::logging_middleware))
        .layer(middleware::from_fn(logging::inject_request_context))
        .layer(cors_layer())
}

/// CORS設定（許可オリジンは環境変数から）
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    let allowed_origin = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    let mut layer = tower_http::cors::CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    if let Ok(origin) = allowed_origin.parse::<axum::http::HeaderValue>() {
        layer = layer.allow_origin(origin);
    }
    layer
}
