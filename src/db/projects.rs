//! Project repository - portfolio project queries.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{NewProject, Project};
use super::escape_like;

/// Optional filters for the public project listing.
#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// List projects ordered by explicit display order, newest first within the
/// same order. Search is a case-insensitive substring match over title,
/// description, and the technology list.
pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM projects WHERE TRUE");

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(technologies) AS tech WHERE tech ILIKE ")
            .push_bind(pattern)
            .push("))");
    }

    qb.push(" ORDER BY display_order ASC, created_at DESC");

    qb.build_query_as::<Project>().fetch_all(pool).await
}

/// Top completed featured projects for the homepage. The cap is a
/// presentation convention, not a stored constraint.
pub async fn featured(pool: &PgPool, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT * FROM projects
        WHERE featured = true AND status = 'completed'
        ORDER BY display_order ASC, created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, project: &NewProject) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (
            title, description, detailed_description, technologies, category,
            image_url, live_url, github_url, features, challenges, solutions,
            display_order, featured, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now(), now())
        RETURNING *
        "#,
    )
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.detailed_description)
    .bind(&project.technologies)
    .bind(&project.category)
    .bind(&project.image_url)
    .bind(&project.live_url)
    .bind(&project.github_url)
    .bind(&project.features)
    .bind(&project.challenges)
    .bind(&project.solutions)
    .bind(project.display_order)
    .bind(project.featured)
    .bind(&project.status)
    .fetch_one(pool)
    .await
}

/// Full-row update with the merged field set. Returns None when the row was
/// deleted between the existence check and the write.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    project: &NewProject,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET
            title = $1, description = $2, detailed_description = $3,
            technologies = $4, category = $5, image_url = $6, live_url = $7,
            github_url = $8, features = $9, challenges = $10, solutions = $11,
            display_order = $12, featured = $13, status = $14, updated_at = now()
        WHERE id = $15
        RETURNING *
        "#,
    )
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.detailed_description)
    .bind(&project.technologies)
    .bind(&project.category)
    .bind(&project.image_url)
    .bind(&project.live_url)
    .bind(&project.github_url)
    .bind(&project.features)
    .bind(&project.challenges)
    .bind(&project.solutions)
    .bind(project.display_order)
    .bind(project.featured)
    .bind(&project.status)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
