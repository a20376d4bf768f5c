/**
 * Contact Routes
 * Validated public submission plus admin triage
 */
use axum::{
    extract::{ConnectInfo, Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::db::{self, contact};
use crate::routes::{
    auth::{require_role, AuthUser, ROLE_ADMIN},
    validate::{self, ContactForm, CONTACT_STATUSES},
    ApiError, Collection, Message, Single,
};

/// Query parameters for GET /api/contact
#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    pub status: Option<String>,
}

/// Request body for PATCH /api/contact/:id/status
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Acknowledgement payload for a stored submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/contact - Public, validated submission. The declarative field
/// checks run first; on any violation nothing is persisted.
pub async fn submit(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    let mut submission = validate::validate_contact(&payload)?;
    submission.ip_address = Some(addr.ip().to_string());
    submission.user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let stored = contact::insert(pool.as_ref(), &submission).await?;

    tracing::info!(from = %stored.email, "contact submission received");
    Ok((
        StatusCode::CREATED,
        Json(Single::with_message(
            ContactReceipt {
                id: stored.id,
                name: stored.name,
                email: stored.email,
            },
            "Thank you for your message! I will get back to you soon.",
        )),
    ))
}

/// GET /api/contact - List submissions (admin)
pub async fn list_contacts(
    auth: AuthUser,
    Query(query): Query<ContactListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let items = contact::list(pool.as_ref(), query.status.as_deref()).await?;
    Ok(Json(Collection::of(items)))
}

/// PATCH /api/contact/:id/status - Triage a submission (admin)
pub async fn update_status(
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;
    let id = validate::parse_uuid(&id).ok_or(ApiError::NotFound("Contact"))?;

    if !CONTACT_STATUSES.contains(&payload.status.as_str()) {
        return Err(ApiError::Validation(format!(
            "Invalid status. Valid statuses: {:?}",
            CONTACT_STATUSES
        )));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let updated = contact::set_status(pool.as_ref(), id, &payload.status)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;

    Ok(Json(Single::of(updated)))
}

/// DELETE /api/contact/:id - Delete a submission (admin)
pub async fn delete_contact(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;
    let id = validate::parse_uuid(&id).ok_or(ApiError::NotFound("Contact"))?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    if !contact::delete(pool.as_ref(), id).await? {
        return Err(ApiError::NotFound("Contact"));
    }

    tracing::info!(%id, "contact submission deleted");
    Ok(Json(Message::of("Contact deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;

    fn contact_router() -> Router {
        Router::new()
            .route("/api/contact", post(submit).get(list_contacts))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 12345))))
    }

    async fn post_json(
        app: Router,
        uri: &str,
        json: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let req = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_submit_empty_message_lists_message_violation() {
        let (status, body) = post_json(
            contact_router(),
            "/api/contact",
            serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": ""
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["message"]);
    }

    #[tokio::test]
    async fn test_submit_invalid_email_returns_bad_request() {
        let (status, body) = post_json(
            contact_router(),
            "/api/contact",
            serde_json::json!({
                "name": "Ada",
                "email": "not-an-email",
                "message": "Hello there"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_list_without_token_returns_unauthorized() {
        let req = Request::get("/api/contact").body(Body::empty()).unwrap();
        let res = contact_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
