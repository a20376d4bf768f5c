/**
 * Blog Routes
 * Public listing/search with a view counter, admin-gated CRUD
 */
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::{
    self,
    blog::{self, BlogFilter},
    models::{NewBlogPost, UpdateBlogPost},
};
use crate::routes::{
    auth::{require_admin, require_role, AuthUser, ROLE_ADMIN},
    validate, ApiError, Collection, Message, Single,
};

/// Query parameters for GET /api/blog
#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub published: Option<bool>,
}

/// Response body for the view bump.
#[derive(Debug, Serialize)]
pub struct ViewCount {
    pub views: i64,
}

fn check_slug(slug: &str) -> Result<(), ApiError> {
    if !validate::is_valid_slug(slug) {
        return Err(ApiError::Validation(
            "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blog - List posts, published only by default. Requesting
/// unpublished posts is an admin override.
pub async fn list_posts(
    headers: HeaderMap,
    Query(query): Query<BlogListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let published = query.published.unwrap_or(true);
    if !published {
        require_admin(&headers).await?;
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let filter = BlogFilter {
        published,
        category: query.category,
        tag: query.tag,
        search: query.search,
    };
    let items = blog::list(pool.as_ref(), &filter).await?;
    Ok(Json(Collection::of(items)))
}

/// GET /api/blog/tag/:tag - Published posts carrying a tag
pub async fn posts_by_tag(Path(tag): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let items = blog::list_by_tag(pool.as_ref(), &tag).await?;
    Ok(Json(Collection::of(items)))
}

/// GET /api/blog/:slug - Single post by slug
pub async fn get_post(Path(slug): Path<String>) -> Result<impl IntoResponse, ApiError> {
    check_slug(&slug)?;
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let post = blog::find_by_slug(pool.as_ref(), &slug)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;
    Ok(Json(Single::of(post)))
}

/// PATCH /api/blog/:slug/view - Atomic view bump on a public path. Repeated
/// views from the same client all count; that is accepted behavior.
pub async fn increment_views(Path(slug): Path<String>) -> Result<impl IntoResponse, ApiError> {
    check_slug(&slug)?;
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let views = blog::increment_views(pool.as_ref(), &slug)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;
    Ok(Json(Single::of(ViewCount { views })))
}

/// POST /api/blog - Create post (admin)
pub async fn create_post(
    auth: AuthUser,
    Json(payload): Json<NewBlogPost>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;

    let slug = match &payload.slug {
        Some(slug) => slug.trim().to_lowercase(),
        None => validate::slugify(&payload.title),
    };
    validate::validate_blog_post(&slug, &payload)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let post = blog::insert(pool.as_ref(), &slug, &payload)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::Conflict("Slug already exists")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!(slug = %post.slug, "blog post created");
    Ok((StatusCode::CREATED, Json(Single::of(post))))
}

/// PUT /api/blog/:id - Update post (admin)
pub async fn update_post(
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBlogPost>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;
    let id = validate::parse_uuid(&id).ok_or(ApiError::NotFound("Blog"))?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let existing = blog::find_by_id(pool.as_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;

    let slug = payload
        .slug
        .map(|s| s.trim().to_lowercase())
        .unwrap_or(existing.slug);
    let merged = NewBlogPost {
        title: payload.title.unwrap_or(existing.title),
        slug: None,
        excerpt: payload.excerpt.unwrap_or(existing.excerpt),
        content: payload.content.unwrap_or(existing.content),
        author: payload.author.unwrap_or(existing.author),
        cover_image: payload.cover_image.unwrap_or(existing.cover_image),
        tags: payload.tags.unwrap_or(existing.tags),
        category: payload.category.unwrap_or(existing.category),
        published: payload.published.unwrap_or(existing.published),
        read_time: payload.read_time.unwrap_or(existing.read_time),
    };
    validate::validate_blog_post(&slug, &merged)?;

    let post = blog::update(pool.as_ref(), id, &slug, &merged)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::Conflict("Slug already exists")
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or(ApiError::NotFound("Blog"))?;

    Ok(Json(Single::of(post)))
}

/// DELETE /api/blog/:id - Delete post (admin)
pub async fn delete_post(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&auth, ROLE_ADMIN).await?;
    let id = validate::parse_uuid(&id).ok_or(ApiError::NotFound("Blog"))?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    if !blog::delete(pool.as_ref(), id).await? {
        return Err(ApiError::NotFound("Blog"));
    }

    tracing::info!(%id, "blog post deleted");
    Ok(Json(Message::of("Blog deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, patch};
    use axum::Router;
    use tower::ServiceExt;

    fn blog_router() -> Router {
        Router::new()
            .route("/api/blog", get(list_posts).post(create_post))
            .route("/api/blog/{slug}", get(get_post))
            .route("/api/blog/{slug}/view", patch(increment_views))
    }

    #[tokio::test]
    async fn test_get_post_invalid_slug_returns_bad_request() {
        let req = Request::get("/api/blog/Not%20A%20Slug")
            .body(Body::empty())
            .unwrap();
        let res = blog_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_increment_views_invalid_slug_returns_bad_request() {
        let req = Request::patch("/api/blog/UPPER/view")
            .body(Body::empty())
            .unwrap();
        let res = blog_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_without_token_returns_unauthorized() {
        let body = Body::from(serde_json::json!({"title": "X"}).to_string());
        let req = Request::post("/api/blog")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = blog_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_unpublished_without_token_returns_unauthorized() {
        let req = Request::get("/api/blog?published=false")
            .body(Body::empty())
            .unwrap();
        let res = blog_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_view_count_serializes_views_field() {
        let json = serde_json::to_value(ViewCount { views: 7 }).unwrap();
        assert_eq!(json["views"], 7);
    }
}
