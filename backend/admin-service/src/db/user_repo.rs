use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Role, User};

/// Insert a new account. Emails are normalised to lowercase so the unique
/// index covers case variants.
pub async fn create_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, user_id, name, email, password_hash, role)
        VALUES ($1, $2, $3, LOWER($4), $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn find_by_user_id(pool: &PgPool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn user_id_exists(pool: &PgPool, user_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn admin_exists(pool: &PgPool) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn email_exists<'e>(executor: impl PgExecutor<'e>, email: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = LOWER($1)")
        .bind(email)
        .fetch_one(executor)
        .await?;

    Ok(count > 0)
}

/// Partial update keyed by login id. Absent fields keep their stored values
/// via COALESCE, so `None` and "empty" are never conflated.
pub async fn update_account<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    name: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
    role: Option<Role>,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE(LOWER($3), email),
            password_hash = COALESCE($4, password_hash),
            role = COALESCE($5, role),
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn delete_by_user_id<'e>(executor: impl PgExecutor<'e>, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
