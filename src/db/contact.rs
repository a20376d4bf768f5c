//! Contact repository - submission storage and admin triage.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{ContactMessage, NewContact};

pub async fn insert(pool: &PgPool, contact: &NewContact) -> Result<ContactMessage, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (
            name, email, subject, message, ip_address, user_agent, status, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, 'new', now())
        RETURNING *
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(&contact.ip_address)
    .bind(&contact.user_agent)
    .fetch_one(pool)
    .await
}

/// Submissions newest first, optionally filtered by triage status.
pub async fn list(
    pool: &PgPool,
    status: Option<&str>,
) -> Result<Vec<ContactMessage>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, ContactMessage>(
                "SELECT * FROM contact_messages WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ContactMessage>(
                "SELECT * FROM contact_messages ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
) -> Result<Option<ContactMessage>, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        "UPDATE contact_messages SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
