use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Supervisor, TransactionType, WalletTransaction};

/// Record a wallet credit or debit and fold it into the supervisor's running
/// aggregates in one transaction. The profile row is locked first so two
/// concurrent adjustments cannot both read the same starting balance.
pub async fn record_transaction(
    pool: &PgPool,
    supervisor_user_id: &str,
    transaction_type: TransactionType,
    amount: f64,
) -> Result<(WalletTransaction, Supervisor)> {
    let mut tx = pool.begin().await?;

    let supervisor = sqlx::query_as::<_, Supervisor>(
        "SELECT * FROM supervisors WHERE user_id = $1 FOR UPDATE",
    )
    .bind(supervisor_user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Supervisor not found".to_string()))?;

    if transaction_type == TransactionType::Debit && supervisor.balance < amount {
        return Err(AppError::InvalidState(
            "Insufficient wallet balance".to_string(),
        ));
    }

    let entry = sqlx::query_as::<_, WalletTransaction>(
        r#"
        INSERT INTO wallet_transactions (id, supervisor_id, transaction_type, amount)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(supervisor.id)
    .bind(transaction_type)
    .bind(amount)
    .fetch_one(&mut *tx)
    .await?;

    let updated = match transaction_type {
        TransactionType::Credit => {
            sqlx::query_as::<_, Supervisor>(
                r#"
                UPDATE supervisors
                SET wallet_cr = wallet_cr + $2,
                    balance = balance + $2,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(supervisor.id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?
        }
        TransactionType::Debit => {
            sqlx::query_as::<_, Supervisor>(
                r#"
                UPDATE supervisors
                SET wallet_dr = wallet_dr + $2,
                    balance = balance - $2,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(supervisor.id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;

    Ok((entry, updated))
}

pub async fn list_for_supervisor(
    pool: &PgPool,
    supervisor_id: Uuid,
) -> Result<Vec<WalletTransaction>> {
    let entries = sqlx::query_as::<_, WalletTransaction>(
        "SELECT * FROM wallet_transactions WHERE supervisor_id = $1 ORDER BY created_at DESC",
    )
    .bind(supervisor_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
