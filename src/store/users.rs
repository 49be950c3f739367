/// Identity store adapter.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

type UserRow = (Uuid, String, String, String, DateTime<Utc>);

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.0,
        username: row.1,
        email: row.2,
        password_hash: row.3,
        created_at: row.4,
    }
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, created_at FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(user_from_row).collect())
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_row))
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_row))
}

/// Insert a new identity. Username uniqueness is enforced by the store; a
/// duplicate surfaces as a store error, not a validated rejection.
pub async fn insert(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Apply any subset of fields to an identity. Absent fields keep their
/// stored value. Returns the post-update record, or `None` if no identity
/// has this id.
pub async fn update_by_id(
    pool: &PgPool,
    user_id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash)
        WHERE id = $1
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_row))
}

/// Delete an identity, returning the deleted record. Owned job records are
/// left in place.
pub async fn delete_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        DELETE FROM users
        WHERE id = $1
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_row))
}
