// src/middleware/rate_limit.rs

use crate::error::AppError;
use crate::middleware::auth::extract_client_ip;
use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

/// レート制限の設定
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub window_duration: Duration,
    pub max_attempts: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_duration: Duration::from_secs(60),
            max_attempts: 10,
        }
    }
}

/// レート制限カウンタの抽象
///
/// 実装を差し替えられるようにしてある（本番で共有ストアに載せ替える想定）。
#[async_trait::async_trait]
pub trait RateLimitStore: Send + Sync {
    /// キーのカウントを1増やし、現在のウィンドウ内カウントを返す
    async fn increment(&self, key: &str) -> usize;

    /// キーのカウントをリセット（サインイン成功時など）
    async fn reset(&self, key: &str);
}

struct WindowState {
    count: usize,
    window_start: Instant,
}

/// インメモリ実装（単一プロセス用）
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, WindowState>>,
    window_duration: Duration,
}

impl InMemoryRateLimitStore {
    pub fn new(window_duration: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window_duration,
        }
    }
}

#[async_trait::async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn increment(&self, key: &str) -> usize {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        // 期限切れウィンドウの掃除（放置するとIPごとに無限に溜まる）
        windows.retain(|_, state| now.duration_since(state.window_start) <= self.window_duration);

        let state = windows.entry(key.to_string()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        state.count += 1;
        state.count
    }

    async fn reset(&self, key: &str) {
        self.windows.lock().await.remove(key);
    }
}

/// サインインエンドポイント用のレート制限の状態
#[derive(Clone)]
pub struct RateLimitState {
    pub store: Arc<dyn RateLimitStore>,
    pub config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(InMemoryRateLimitStore::new(config.window_duration)),
            config,
        }
    }

    pub fn with_store(store: Arc<dyn RateLimitStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }
}

/// サインイン試行のレート制限ミドルウェア（クライアントIP単位）
pub async fn signin_rate_limit_middleware(
    State(state): State<RateLimitState>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = extract_client_ip(&headers).unwrap_or_else(|| "unknown".to_string());
    let key = format!("signin:{}", client_ip);

    let attempts = state.store.increment(&key).await;
    if attempts > state.config.max_attempts {
        warn!(
            client_ip = %client_ip,
            attempts,
            "Signin rate limit exceeded"
        );
        return Err(AppError::TooManyRequests(
            "Too many signin attempts. Please try again later.".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_counts_within_window() {
        let store = InMemoryRateLimitStore::new(Duration::from_secs(60));
        assert_eq!(store.increment("signin:1.2.3.4").await, 1);
        assert_eq!(store.increment("signin:1.2.3.4").await, 2);
        // 別キーは独立してカウントされる
        assert_eq!(store.increment("signin:5.6.7.8").await, 1);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let store = InMemoryRateLimitStore::new(Duration::from_millis(10));
        assert_eq!(store.increment("k").await, 1);
        assert_eq!(store.increment("k").await, 2);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.increment("k").await, 1);
    }

    #[tokio::test]
    async fn test_reset_clears_key() {
        let store = InMemoryRateLimitStore::new(Duration::from_secs(60));
        store.increment("k").await;
        store.increment("k").await;
        store.reset("k").await;
        assert_eq!(store.increment("k").await, 1);
    }
}
