use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;

/// Record a token digest as revoked until its expiry. Revoking an already
/// revoked token extends the record rather than failing.
pub async fn revoke(pool: &PgPool, token_hash: &str, expires_at: DateTime<Utc>) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO revoked_tokens (token_hash, expires_at)
        VALUES ($1, $2)
        ON CONFLICT (token_hash) DO UPDATE SET expires_at = EXCLUDED.expires_at
        "#,
    )
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Expired records no longer count: the token is dead on its own by then.
pub async fn is_revoked(pool: &PgPool, token_hash: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM revoked_tokens WHERE token_hash = $1 AND expires_at > NOW()",
    )
    .bind(token_hash)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Purge records past their expiry. Safe to run at any cadence.
pub async fn cleanup_expired(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
