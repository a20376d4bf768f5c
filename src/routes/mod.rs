/**
 * Routes Module
 * API route handlers plus the shared response envelope and error taxonomy
 */

pub mod auth;
pub mod blog;
pub mod contact;
pub mod health;
pub mod projects;
pub mod validate;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

// ============================================================================
// Success envelope
// ============================================================================

/// Envelope for a single resource: `{"status":"success","data":{..}}`.
#[derive(Debug, Serialize)]
pub struct Single<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> Single<T> {
    pub fn of(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data,
        }
    }
}

/// Envelope for a collection: `{"status":"success","results":n,"data":[..]}`.
#[derive(Debug, Serialize)]
pub struct Collection<T> {
    pub status: &'static str,
    pub results: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> Collection<T> {
    pub fn of(data: Vec<T>) -> Self {
        Self {
            status: "success",
            results: data.len(),
            data,
        }
    }
}

/// Envelope for mutations that return no resource body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub status: &'static str,
    pub message: String,
}

impl Message {
    pub fn of(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

// ============================================================================
// Error taxonomy
// ============================================================================

/// A single field violation reported by the request validators.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failure a handler can surface, mapped to the error envelope.
///
/// Validators and auth gates short-circuit with these before business logic
/// runs; everything else is caught at the handler boundary. Unclassified
/// store failures become `Internal` via the blanket `From<sqlx::Error>` and
/// never leak diagnostic detail to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input. 400.
    Validation(String),
    /// Per-field violations from the declarative validators. 400.
    Fields(Vec<FieldError>),
    /// Missing, invalid, or expired credential. 401.
    Unauthorized(&'static str),
    /// Valid identity, insufficient role. 403.
    Forbidden,
    /// No matching resource; the payload names the resource kind. 404.
    NotFound(&'static str),
    /// Uniqueness violation surfaced as a client error. 400.
    Duplicate(&'static str),
    /// Uniqueness violation on a secondary key (blog slug). 409.
    Conflict(&'static str),
    /// Fixed-window rate limit exceeded. 429.
    TooManyRequests,
    /// Database pool not configured. 503.
    Unavailable,
    /// Unexpected store or runtime failure. 500.
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Fields(_) | ApiError::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(m) => m.clone(),
            ApiError::Fields(_) => "Validation failed".to_string(),
            ApiError::Unauthorized(m) => (*m).to_string(),
            ApiError::Forbidden => "Access denied".to_string(),
            ApiError::NotFound(resource) => format!("{} not found", resource),
            ApiError::Duplicate(m) | ApiError::Conflict(m) => (*m).to_string(),
            ApiError::TooManyRequests => "Too many requests, please try again later.".to_string(),
            ApiError::Unavailable => "Database not available".to_string(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match &self {
            ApiError::Fields(errors) => serde_json::json!({
                "status": "error",
                "errors": errors,
            }),
            _ => serde_json::json!({
                "status": "error",
                "message": self.message(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "database error");
        ApiError::Internal
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("Not authorized").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Project").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Duplicate("User already exists").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("Slug already exists").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::TooManyRequests.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Unavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message_names_resource() {
        assert_eq!(ApiError::NotFound("Blog").message(), "Blog not found");
    }

    #[test]
    fn test_internal_error_does_not_leak_detail() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_fields_error_returns_bad_request() {
        let err = ApiError::Fields(vec![FieldError {
            field: "message",
            message: "Message is required".to_string(),
        }]);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_collection_envelope_counts_results() {
        let envelope = Collection::of(vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["results"], 3);
    }

    #[test]
    fn test_single_envelope_omits_absent_message() {
        let json = serde_json::to_value(Single::of(42)).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["data"], 42);
    }
}
