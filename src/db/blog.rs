//! Blog repository - post queries and the atomic view counter.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{BlogPost, BlogSummary, NewBlogPost};
use super::escape_like;

/// Columns for list views; the full content is deliberately left out.
const SUMMARY_COLUMNS: &str = "id, title, slug, excerpt, author, cover_image, tags, category, \
     published, views, read_time, created_at, updated_at";

/// Filters for the blog listing. `published` has already been defaulted by
/// the handler.
#[derive(Debug, Clone)]
pub struct BlogFilter {
    pub published: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

/// List posts newest first. Search is a case-insensitive substring match
/// over title and excerpt.
pub async fn list(pool: &PgPool, filter: &BlogFilter) -> Result<Vec<BlogSummary>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {SUMMARY_COLUMNS} FROM blog_posts WHERE published = "
    ));
    qb.push_bind(filter.published);

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(tag) = &filter.tag {
        qb.push(" AND ").push_bind(tag.clone()).push(" = ANY(tags)");
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR excerpt ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<BlogSummary>().fetch_all(pool).await
}

/// Published posts carrying the given tag, newest first.
pub async fn list_by_tag(pool: &PgPool, tag: &str) -> Result<Vec<BlogSummary>, sqlx::Error> {
    sqlx::query_as::<_, BlogSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS} FROM blog_posts
        WHERE published = true AND $1 = ANY(tags)
        ORDER BY created_at DESC
        "#
    ))
    .bind(tag)
    .fetch_all(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogPost>, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Atomic counter bump keyed by slug; returns the new count, or None when
/// the slug is unmatched. Repeated views from the same client all count.
pub async fn increment_views(pool: &PgPool, slug: &str) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("UPDATE blog_posts SET views = views + 1 WHERE slug = $1 RETURNING views")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(views,)| views))
}

/// Insert a post; `slug` has already been derived and validated by the
/// handler. The unique slug index arbitrates concurrent creates.
pub async fn insert(pool: &PgPool, slug: &str, post: &NewBlogPost) -> Result<BlogPost, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>(
        r#"
        INSERT INTO blog_posts (
            title, slug, excerpt, content, author, cover_image, tags,
            category, published, read_time, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
        RETURNING *
        "#,
    )
    .bind(&post.title)
    .bind(slug)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.author)
    .bind(&post.cover_image)
    .bind(&post.tags)
    .bind(&post.category)
    .bind(post.published)
    .bind(post.read_time)
    .fetch_one(pool)
    .await
}

/// Full-row update with the merged field set.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    slug: &str,
    post: &NewBlogPost,
) -> Result<Option<BlogPost>, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>(
        r#"
        UPDATE blog_posts SET
            title = $1, slug = $2, excerpt = $3, content = $4, author = $5,
            cover_image = $6, tags = $7, category = $8, published = $9,
            read_time = $10, updated_at = now()
        WHERE id = $11
        RETURNING *
        "#,
    )
    .bind(&post.title)
    .bind(slug)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.author)
    .bind(&post.cover_image)
    .bind(&post.tags)
    .bind(&post.category)
    .bind(post.published)
    .bind(post.read_time)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
