use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::User;

pub async fn find_by_id(db: &PgPool, user_id: Uuid) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub async fn find_by_email(db: &PgPool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

/// Returns `Conflict` if the email is already registered.
pub async fn insert(
    db: &PgPool,
    email: &str,
    password_hash: &str,
    signup_date: NaiveDate,
) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, signup_date)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(signup_date)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::Conflict("Email already registered".into()))?;

    Ok(user)
}

pub async fn update_password(db: &PgPool, user_id: Uuid, password_hash: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE users SET password_hash = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(password_hash)
    .execute(db)
    .await?;
    Ok(())
}
