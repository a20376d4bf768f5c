//! User repository - credential store queries.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::User;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, last_login_at, created_at, updated_at";

/// Case-insensitive lookup; emails are stored lowercased but the index on
/// LOWER(email) is what enforces uniqueness.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, 'user', now(), now())
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = now(), updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_password_hash(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Used by the promote-admin binary. Returns the number of rows matched.
pub async fn set_role(pool: &PgPool, email: &str, role: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET role = $1, updated_at = now() WHERE LOWER(email) = LOWER($2)",
    )
    .bind(role)
    .bind(email)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
