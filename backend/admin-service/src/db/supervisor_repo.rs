use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::db::page_window;
use crate::error::Result;
use crate::models::requests::{ListSupervisorsQuery, UpdateSupervisorRequest};
use crate::models::{Supervisor, SupervisorApplication};

/// Create a supervisor profile seeded from an approved application. The
/// joining date is the approval instant, not the submission date.
pub async fn create_from_application<'e>(
    executor: impl PgExecutor<'e>,
    application: &SupervisorApplication,
    register_id: &str,
) -> Result<Supervisor> {
    let supervisor = sqlx::query_as::<_, Supervisor>(
        r#"
        INSERT INTO supervisors (
            id, user_id, register_id, name, father_name, mother_name,
            state, city, mobile_number, email, registration_fee, photo,
            joining_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&application.user_id)
    .bind(register_id)
    .bind(&application.full_name)
    .bind(&application.father_name)
    .bind(&application.mother_name)
    .bind(&application.permanent_address.state)
    .bind(&application.permanent_address.district)
    .bind(&application.mobile_number)
    .bind(&application.email)
    .bind(application.registration_fee)
    .bind(&application.photo)
    .fetch_one(executor)
    .await?;

    Ok(supervisor)
}

pub async fn find_by_user_id(pool: &PgPool, user_id: &str) -> Result<Option<Supervisor>> {
    let supervisor = sqlx::query_as::<_, Supervisor>("SELECT * FROM supervisors WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(supervisor)
}

pub async fn register_id_exists(pool: &PgPool, register_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM supervisors WHERE register_id = $1")
        .bind(register_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn list(pool: &PgPool, query: &ListSupervisorsQuery) -> Result<(Vec<Supervisor>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);
    let search = query.search.as_ref().map(|s| format!("%{}%", s));

    let supervisors = sqlx::query_as::<_, Supervisor>(
        r#"
        SELECT * FROM supervisors
        WHERE ($1::text IS NULL
               OR name ILIKE $1
               OR email ILIKE $1
               OR register_id ILIKE $1
               OR mobile_number ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&search)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM supervisors
        WHERE ($1::text IS NULL
               OR name ILIKE $1
               OR email ILIKE $1
               OR register_id ILIKE $1
               OR mobile_number ILIKE $1)
        "#,
    )
    .bind(&search)
    .fetch_one(pool)
    .await?;

    Ok((supervisors, total))
}

/// Partial profile update keyed by login id. Wallet and counter columns are
/// deliberately absent; the ledger repos own those.
pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    req: &UpdateSupervisorRequest,
) -> Result<Option<Supervisor>> {
    let professional_info = req.professional_info.clone().map(Json);

    let supervisor = sqlx::query_as::<_, Supervisor>(
        r#"
        UPDATE supervisors
        SET name = COALESCE($2, name),
            father_name = COALESCE($3, father_name),
            mother_name = COALESCE($4, mother_name),
            state = COALESCE($5, state),
            city = COALESCE($6, city),
            mobile_number = COALESCE($7, mobile_number),
            email = COALESCE(LOWER($8), email),
            professional_info = COALESCE($9, professional_info),
            photo = COALESCE($10, photo),
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&req.name)
    .bind(&req.father_name)
    .bind(&req.mother_name)
    .bind(&req.state)
    .bind(&req.city)
    .bind(&req.mobile_number)
    .bind(&req.email)
    .bind(professional_info)
    .bind(&req.photo)
    .fetch_optional(executor)
    .await?;

    Ok(supervisor)
}

pub async fn delete_by_user_id<'e>(executor: impl PgExecutor<'e>, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM supervisors WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
