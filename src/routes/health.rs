/**
 * Health Routes
 * Welcome payload and liveness checks
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Liveness response for the API root health check.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Database round-trip check result.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET / - Welcome payload listing the available endpoint groups
pub async fn welcome() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "Portfolio API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "projects": "/api/projects",
            "blog": "/api/blog",
            "contact": "/api/contact",
            "auth": "/api/auth"
        }
    }))
}

/// GET /api/health - Liveness check
pub async fn api_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "Portfolio API is running".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /api/health/database - Database round-trip check
pub async fn health_database() -> impl IntoResponse {
    match crate::db::health_check().await {
        Ok(duration) => {
            let check = ServiceCheck {
                status: "healthy".to_string(),
                response_time: Some(duration.as_millis() as u64),
                error: None,
            };
            (StatusCode::OK, Json(check))
        }
        Err(e) => {
            let check = ServiceCheck {
                status: "unhealthy".to_string(),
                response_time: None,
                error: Some(e.to_string()),
            };
            (StatusCode::OK, Json(check))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/", get(welcome))
            .route("/api/health", get(api_health))
            .route("/api/health/database", get(health_database))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&body).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_welcome_lists_endpoints() {
        let (status, body) = get_json(test_router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["endpoints"]["projects"], "/api/projects");
    }

    #[tokio::test]
    async fn test_api_health_returns_success() {
        let (status, body) = get_json(test_router(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_health_database_unhealthy_without_pool() {
        let (status, body) = get_json(test_router(), "/api/health/database").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unhealthy");
    }
}
