use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Commission, Supervisor};

/// Record a commission entry and accumulate it onto the supervisor profile.
/// `commission` holds the most recent award, `earning_commission` the running
/// total.
pub async fn record_commission(
    pool: &PgPool,
    supervisor_user_id: &str,
    commission_amount: f64,
) -> Result<(Commission, Supervisor)> {
    let mut tx = pool.begin().await?;

    let supervisor = sqlx::query_as::<_, Supervisor>(
        "SELECT * FROM supervisors WHERE user_id = $1 FOR UPDATE",
    )
    .bind(supervisor_user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Supervisor not found".to_string()))?;

    let entry = sqlx::query_as::<_, Commission>(
        r#"
        INSERT INTO commissions (id, supervisor_id, commission_amount)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(supervisor.id)
    .bind(commission_amount)
    .fetch_one(&mut *tx)
    .await?;

    let updated = sqlx::query_as::<_, Supervisor>(
        r#"
        UPDATE supervisors
        SET commission = $2,
            earning_commission = earning_commission + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(supervisor.id)
    .bind(commission_amount)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((entry, updated))
}

pub async fn list_for_supervisor(pool: &PgPool, supervisor_id: Uuid) -> Result<Vec<Commission>> {
    let entries = sqlx::query_as::<_, Commission>(
        "SELECT * FROM commissions WHERE supervisor_id = $1 ORDER BY created_at DESC",
    )
    .bind(supervisor_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
