/**
 * Authentication Routes
 * JWT identity assertions, the bearer-credential gate, and the credential
 * operations (register, login, me, change password)
 */
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, models::User, users};
use crate::routes::{validate, ApiError, Message, Single};

// ============================================================================
// Configuration
// ============================================================================

lazy_static::lazy_static! {
    /// JWT secret key from environment. Production startup refuses to run
    /// with the insecure default (checked in `run()`).
    pub static ref JWT_SECRET: String = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "default-jwt-secret-change-in-production".to_string());
}

/// A token is valid for its full lifetime or not at all; there is no
/// refresh or rotation mechanism.
const TOKEN_EXPIRY_DAYS: i64 = 30;

const MIN_PASSWORD_CHARS: usize = 8;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

// ============================================================================
// Token issuer/verifier
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiry timestamp
}

/// Mint a signed identity assertion for the user.
pub fn issue_token(user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::days(TOKEN_EXPIRY_DAYS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
}

/// Verify signature and expiry. Pure computation; callers collapse both
/// failure kinds into the same 401 response while logging distinguishes
/// them.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract bearer token from Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

fn resolve_claims(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized("Not authorized"))?;
    let claims = verify_token(&token).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                tracing::debug!("rejected expired access token")
            }
            _ => tracing::debug!(error = %e, "rejected invalid access token"),
        }
        ApiError::Unauthorized("Not authorized")
    })?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Not authorized"))?;
    Ok(AuthUser { user_id })
}

// ============================================================================
// Auth middleware
// ============================================================================

/// The identity resolved from a verified bearer credential. Extraction is
/// pure computation; the stored profile is only loaded by the role gate or
/// by handlers that need it.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_claims(&parts.headers)
    }
}

/// The single capability gate: load the stored identity and check its role.
/// A vanished identity fails the credential check (401); a role mismatch is
/// 403 regardless of which check ran first.
pub async fn require_role(auth: &AuthUser, role: &str) -> Result<User, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let user = users::find_by_id(pool.as_ref(), auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized("Not authorized"))?;
    if user.role != role {
        tracing::warn!(user = %user.email, required = role, "role check failed");
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}

/// Run the full bearer-plus-role gate from raw headers. Used where the gate
/// is conditional (e.g. listing unpublished posts) rather than declared in
/// the handler signature.
pub async fn require_admin(headers: &HeaderMap) -> Result<User, ApiError> {
    let auth = resolve_claims(headers)?;
    require_role(&auth, ROLE_ADMIN).await
}

// ============================================================================
// Password hashing
// ============================================================================

/// bcrypt is intentionally CPU-intensive; run it outside the async executor
/// so it doesn't block other in-flight tasks.
async fn hash_password(password: String) -> Result<String, ApiError> {
    match tokio::task::spawn_blocking(move || hash(&password, DEFAULT_COST)).await {
        Ok(Ok(hashed)) => Ok(hashed),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "failed to hash password");
            Err(ApiError::Internal)
        }
        Err(e) => {
            tracing::error!(error = %e, "spawn_blocking panic during hash");
            Err(ApiError::Internal)
        }
    }
}

async fn password_matches(password: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&password, &password_hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Identity fields returned on register/login; never includes the password.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
}

impl AuthData {
    fn of(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

fn issue_for(user: &User) -> Result<String, ApiError> {
    issue_token(user.id).map_err(|e| {
        tracing::error!(error = %e, "failed to issue token");
        ApiError::Internal
    })
}

fn check_password_strength(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if !validate::is_valid_email(&email) {
        return Err(ApiError::Validation("Valid email is required".to_string()));
    }
    check_password_strength(&payload.password)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    // Fast path only; the unique index on LOWER(email) is the real arbiter
    // for two simultaneous registrations.
    if users::find_by_email(pool.as_ref(), &email).await?.is_some() {
        return Err(ApiError::Duplicate("User already exists"));
    }

    let password_hash = hash_password(payload.password).await?;

    let user = users::insert(pool.as_ref(), &name, &email, &password_hash)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::Duplicate("User already exists")
            } else {
                ApiError::from(e)
            }
        })?;

    let token = issue_for(&user)?;
    tracing::info!(user = %user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(Single::of(AuthData::of(user, token))),
    ))
}

/// POST /api/auth/login
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    // Unknown email and wrong password produce the same response shape; do
    // not reveal which check failed.
    let user = users::find_by_email(pool.as_ref(), &email)
        .await?
        .ok_or_else(|| {
            tracing::warn!(email = %email, "login attempt for unknown user");
            ApiError::Unauthorized("Invalid credentials")
        })?;

    if !password_matches(payload.password, user.password_hash.clone()).await {
        tracing::warn!(user = %user.email, "failed login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    users::touch_last_login(pool.as_ref(), user.id).await?;

    let token = issue_for(&user)?;
    tracing::info!(user = %user.email, "successful login");

    Ok((StatusCode::OK, Json(Single::of(AuthData::of(user, token)))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Result<impl IntoResponse, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let user = users::find_by_id(pool.as_ref(), auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(Single::of(user)))
}

/// PATCH /api/auth/password
pub async fn update_password(
    auth: AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_password_strength(&payload.new_password)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let user = users::find_by_id(pool.as_ref(), auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if !password_matches(payload.current_password, user.password_hash.clone()).await {
        return Err(ApiError::Unauthorized("Current password is incorrect"));
    }

    let password_hash = hash_password(payload.new_password).await?;
    users::set_password_hash(pool.as_ref(), user.id, &password_hash).await?;

    tracing::info!(user = %user.email, "password updated");
    Ok(Json(Message::of("Password updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, patch, post};
    use axum::Router;
    use tower::ServiceExt;

    fn auth_router() -> Router {
        Router::new()
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/auth/password", patch(update_password))
    }

    async fn post_json(
        app: Router,
        uri: &str,
        json: &impl serde::Serialize,
    ) -> (StatusCode, axum::body::Bytes) {
        let body = Body::from(serde_json::to_vec(json).unwrap());
        let req = Request::post(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        assert!(verify_token("invalid.jwt.token").is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::days(40)).timestamp(),
            exp: (now - Duration::days(10)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_missing_name() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/register",
            &RegisterRequest {
                name: "".to_string(),
                email: "dev@example.com".to_string(),
                password: "longenough".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/register",
            &RegisterRequest {
                name: "Dev".to_string(),
                email: "no-at-sign".to_string(),
                password: "longenough".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/register",
            &RegisterRequest {
                name: "Dev".to_string(),
                email: "dev@example.com".to_string(),
                password: "short".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_empty_fields_returns_bad_request() {
        let (status, _) = post_json(
            auth_router(),
            "/api/auth/login",
            &LoginRequest {
                email: "".to_string(),
                password: "".to_string(),
            },
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_without_token_returns_unauthorized() {
        let req = Request::get("/api/auth/me").body(Body::empty()).unwrap();
        let res = auth_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_garbage_token_returns_unauthorized() {
        let req = Request::get("/api/auth/me")
            .header("authorization", "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let res = auth_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_password_rejects_short_new_password() {
        let token = issue_token(Uuid::new_v4()).unwrap();
        let body = Body::from(
            serde_json::to_vec(&UpdatePasswordRequest {
                current_password: "oldpassword".to_string(),
                new_password: "short".to_string(),
            })
            .unwrap(),
        );
        let req = Request::patch("/api/auth/password")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = auth_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
