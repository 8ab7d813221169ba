use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::db::page_window;
use crate::error::Result;
use crate::models::requests::{ListApplicationsQuery, SubmitApplicationRequest};
use crate::models::{Address, ApplicationStatus, SupervisorApplication};

/// Sort columns the list endpoint may order by. Anything else falls back to
/// created_at so caller input never reaches the SQL text.
fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("full_name") => "full_name",
        Some("email") => "email",
        Some("status") => "status",
        _ => "created_at",
    }
}

pub async fn create_application(
    pool: &PgPool,
    req: &SubmitApplicationRequest,
    user_id: &str,
    password_hash: &str,
    registration_fee: f64,
) -> Result<SupervisorApplication> {
    let permanent: Address = req.permanent_address.clone().map(Into::into).unwrap_or_default();
    let correspondence: Address = req
        .correspondence_address
        .clone()
        .map(Into::into)
        .unwrap_or_default();

    let application = sqlx::query_as::<_, SupervisorApplication>(
        r#"
        INSERT INTO supervisor_applications (
            id, user_id, password_hash, full_name, father_name, mother_name,
            dob, gender, caste, mobile_number, email, yojana_name, job_type,
            registration_fee, permanent_address, correspondence_address,
            identity_document_type, document_number, attached_document,
            photo, signature, experience_years, educational_qualification,
            preferred_panchayat
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
            $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(password_hash)
    .bind(&req.full_name)
    .bind(&req.father_name)
    .bind(&req.mother_name)
    .bind(req.dob)
    .bind(req.gender)
    .bind(req.caste)
    .bind(&req.mobile_number)
    .bind(req.email.to_lowercase())
    .bind(&req.yojana_name)
    .bind(&req.job_type)
    .bind(registration_fee)
    .bind(Json(permanent))
    .bind(Json(correspondence))
    .bind(&req.identity_document_type)
    .bind(&req.document_number)
    .bind(&req.attached_document)
    .bind(&req.photo)
    .bind(&req.signature)
    .bind(req.experience_years)
    .bind(&req.educational_qualification)
    .bind(&req.preferred_panchayat)
    .fetch_one(pool)
    .await?;

    Ok(application)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SupervisorApplication>> {
    let application =
        sqlx::query_as::<_, SupervisorApplication>("SELECT * FROM supervisor_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(application)
}

/// Fetch an application and take a row lock until the surrounding transaction
/// commits. Concurrent approval/rejection of the same application serialise
/// behind this lock.
pub async fn find_by_id_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<SupervisorApplication>> {
    let application = sqlx::query_as::<_, SupervisorApplication>(
        "SELECT * FROM supervisor_applications WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(application)
}

pub async fn user_id_exists(pool: &PgPool, user_id: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM supervisor_applications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

pub async fn list(
    pool: &PgPool,
    query: &ListApplicationsQuery,
) -> Result<(Vec<SupervisorApplication>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let order = match query.sort_order.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };
    let column = sort_column(query.sort_by.as_deref());
    let search = query.search.as_ref().map(|s| format!("%{}%", s));

    let sql = format!(
        r#"
        SELECT * FROM supervisor_applications
        WHERE ($1::application_status IS NULL OR status = $1)
          AND ($2::text IS NULL
               OR full_name ILIKE $2
               OR email ILIKE $2
               OR mobile_number ILIKE $2)
        ORDER BY {} {}
        LIMIT $3 OFFSET $4
        "#,
        column, order
    );

    let applications = sqlx::query_as::<_, SupervisorApplication>(&sql)
        .bind(query.status)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM supervisor_applications
        WHERE ($1::application_status IS NULL OR status = $1)
          AND ($2::text IS NULL
               OR full_name ILIKE $2
               OR email ILIKE $2
               OR mobile_number ILIKE $2)
        "#,
    )
    .bind(query.status)
    .bind(&search)
    .fetch_one(pool)
    .await?;

    Ok((applications, total))
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE supervisor_applications SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Like `set_status`, but hands back the updated row so callers inside a
/// transaction never have to re-read it after commit.
pub async fn set_status_returning<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<SupervisorApplication>> {
    let application = sqlx::query_as::<_, SupervisorApplication>(
        r#"
        UPDATE supervisor_applications
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(executor)
    .await?;

    Ok(application)
}

/// Delete an application regardless of status. Accounts or profiles created
/// from it are left untouched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM supervisor_applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("full_name")), "full_name");
        assert_eq!(sort_column(Some("created_at; DROP TABLE users")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }
}
