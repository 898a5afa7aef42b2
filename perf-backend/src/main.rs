// src/main.rs

use perf_backend::api::{create_app, AppState};
use perf_backend::config::Config;
use perf_backend::db::create_db_pool;
use perf_backend::utils::jwt::{JwtConfig, JwtManager};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env があれば読み込む（なくてもよい）
    dotenvy::dotenv().ok();

    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perf_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting performance evaluation backend...");

    let app_config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;
    tracing::info!(
        environment = %app_config.environment,
        addr = %app_config.server_addr(),
        "Configuration loaded"
    );

    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created");

    // RUN_MIGRATIONS=true で起動時にマイグレーションを適用
    if std::env::var("RUN_MIGRATIONS").map(|v| v == "true").unwrap_or(false) {
        use migration::MigratorTrait;
        migration::Migrator::up(&db_pool, None).await?;
        tracing::info!("Database migrations applied");
    }

    let jwt_manager = Arc::new(JwtManager::new(JwtConfig::with_secret(
        app_config.jwt_secret.clone(),
    )));

    let state = AppState::new(db_pool, jwt_manager, &app_config);
    let app = create_app(state);

    tracing::info!("Server listening on {}", app_config.server_addr());
    let listener = TcpListener::bind(app_config.server_addr()).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
