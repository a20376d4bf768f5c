//! Fixed-window rate limiting keyed by client address.
//!
//! Process-wide and independent per deployment instance; counters are not
//! synchronized across instances. Window and cap come from the environment
//! and are resolved once at startup.

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;

use crate::routes::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window_ms: i64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    fn from_env() -> Self {
        Self {
            window_ms: std::env::var("RATE_LIMIT_WINDOW_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15 * 60 * 1000),
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
        }
    }
}

static CONFIG: Lazy<RateLimitConfig> = Lazy::new(RateLimitConfig::from_env);

static WINDOWS: Lazy<Arc<RwLock<HashMap<String, Window>>>> =
    Lazy::new(|| Arc::new(RwLock::new(HashMap::new())));

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: i64,
    count: u32,
}

/// Admit or reject one request for `ip` at `now_ms`.
///
/// Expired windows are evicted on every call so the map stays proportional
/// to the number of active addresses rather than every address seen since
/// startup.
fn check(
    windows: &mut HashMap<String, Window>,
    ip: &str,
    now_ms: i64,
    config: RateLimitConfig,
) -> bool {
    windows.retain(|_, w| now_ms - w.started_at < config.window_ms);

    let window = windows.entry(ip.to_string()).or_insert(Window {
        started_at: now_ms,
        count: 0,
    });
    if window.count >= config.max_requests {
        return false;
    }
    window.count += 1;
    true
}

/// Middleware applied to the /api routes.
pub async fn limit(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();
    let now_ms = Utc::now().timestamp_millis();

    let allowed = {
        let mut windows = WINDOWS.write().await;
        check(&mut windows, &ip, now_ms, *CONFIG)
    };

    if !allowed {
        tracing::warn!(%ip, "rate limit exceeded");
        return ApiError::TooManyRequests.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: RateLimitConfig = RateLimitConfig {
        window_ms: 1_000,
        max_requests: 3,
    };

    #[test]
    fn test_admits_exactly_cap_requests_per_window() {
        let mut windows = HashMap::new();
        for _ in 0..3 {
            assert!(check(&mut windows, "10.0.0.1", 0, TEST_CONFIG));
        }
        assert!(!check(&mut windows, "10.0.0.1", 500, TEST_CONFIG));
    }

    #[test]
    fn test_new_window_resets_the_counter() {
        let mut windows = HashMap::new();
        for _ in 0..3 {
            assert!(check(&mut windows, "10.0.0.1", 0, TEST_CONFIG));
        }
        assert!(!check(&mut windows, "10.0.0.1", 999, TEST_CONFIG));
        // Window expired; the address starts a fresh counter.
        assert!(check(&mut windows, "10.0.0.1", 1_000, TEST_CONFIG));
    }

    #[test]
    fn test_addresses_are_counted_independently() {
        let mut windows = HashMap::new();
        for _ in 0..3 {
            assert!(check(&mut windows, "10.0.0.1", 0, TEST_CONFIG));
        }
        assert!(check(&mut windows, "10.0.0.2", 0, TEST_CONFIG));
    }

    #[test]
    fn test_stale_windows_are_evicted() {
        let mut windows = HashMap::new();
        assert!(check(&mut windows, "10.0.0.1", 0, TEST_CONFIG));
        assert!(check(&mut windows, "10.0.0.2", 100, TEST_CONFIG));
        check(&mut windows, "10.0.0.3", 5_000, TEST_CONFIG);
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key("10.0.0.3"));
    }
}
