use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::page_window;
use crate::error::Result;
use crate::models::requests::{ListRegistrationsQuery, RegisterBeneficiaryRequest};
use crate::models::{Address, BeneficiaryRegistration, RegistrationType};

/// Sort columns the list endpoint may order by. Anything else falls back to
/// created_at so caller input never reaches the SQL text.
fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("full_name") => "full_name",
        Some("yojana_name") => "yojana_name",
        Some("register_id") => "register_id",
        _ => "created_at",
    }
}

/// Counter columns a registration feeds, by type. `total_reg` is bumped for
/// both kinds.
fn counter_column(registration_type: RegistrationType) -> &'static str {
    match registration_type {
        RegistrationType::Yojana => "total_yojana_reg",
        RegistrationType::Intern => "total_intern_reg",
    }
}

/// Insert a registration and bump the filing supervisor's counters in one
/// transaction. Admin accounts have no profile row, so for them the counter
/// update touches nothing and only the registration is recorded.
pub async fn create(
    pool: &PgPool,
    req: &RegisterBeneficiaryRequest,
    supervisor_user_id: &str,
    register_id: &str,
) -> Result<BeneficiaryRegistration> {
    let registration_type = req.registration_type.unwrap_or(RegistrationType::Yojana);
    let address: Address = req.address.clone().map(Into::into).unwrap_or_default();
    let correspondence: Address = req
        .correspondence_address
        .clone()
        .map(Into::into)
        .unwrap_or_default();

    let mut tx = pool.begin().await?;

    let registration = sqlx::query_as::<_, BeneficiaryRegistration>(
        r#"
        INSERT INTO beneficiary_registrations (
            id, register_id, supervisor_user_id, registration_type,
            yojana_name, full_name, guardian_name, mother_name, dob, gender,
            caste, mobile_number, email, address, correspondence_address,
            guardian_annual_income, ration_card, village_head_name,
            previous_training_institute, work_duration, preferred_panchayat,
            identity_document_type, document_number, photo, signature,
            identity_document, fee
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
            $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(register_id)
    .bind(supervisor_user_id)
    .bind(registration_type)
    .bind(&req.yojana_name)
    .bind(&req.full_name)
    .bind(&req.guardian_name)
    .bind(&req.mother_name)
    .bind(req.dob)
    .bind(req.gender)
    .bind(req.caste)
    .bind(&req.mobile_number)
    .bind(req.email.as_ref().map(|e| e.to_lowercase()))
    .bind(Json(address))
    .bind(Json(correspondence))
    .bind(&req.guardian_annual_income)
    .bind(&req.ration_card)
    .bind(&req.village_head_name)
    .bind(&req.previous_training_institute)
    .bind(&req.work_duration)
    .bind(&req.preferred_panchayat)
    .bind(&req.identity_document_type)
    .bind(&req.document_number)
    .bind(&req.photo)
    .bind(&req.signature)
    .bind(&req.identity_document)
    .bind(req.fee.unwrap_or(0.0))
    .fetch_one(&mut *tx)
    .await?;

    let counter = counter_column(registration_type);
    let sql = format!(
        "UPDATE supervisors \
         SET {counter} = {counter} + 1, total_reg = total_reg + 1, updated_at = NOW() \
         WHERE user_id = $1"
    );
    sqlx::query(&sql)
        .bind(supervisor_user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(registration)
}

pub async fn find_by_register_id(
    pool: &PgPool,
    register_id: &str,
) -> Result<Option<BeneficiaryRegistration>> {
    let registration = sqlx::query_as::<_, BeneficiaryRegistration>(
        "SELECT * FROM beneficiary_registrations WHERE register_id = $1",
    )
    .bind(register_id)
    .fetch_optional(pool)
    .await?;

    Ok(registration)
}

pub async fn register_id_exists(pool: &PgPool, register_id: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM beneficiary_registrations WHERE register_id = $1")
            .bind(register_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// List registrations, optionally restricted to those filed by one
/// supervisor. Admin callers pass no owner and see everything.
pub async fn list(
    pool: &PgPool,
    query: &ListRegistrationsQuery,
    owner: Option<&str>,
) -> Result<(Vec<BeneficiaryRegistration>, i64)> {
    let (_, limit, offset) = page_window(query.page, query.limit);

    let order = match query.sort_order.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };
    let column = sort_column(query.sort_by.as_deref());
    let search = query.search.as_ref().map(|s| format!("%{}%", s));

    let sql = format!(
        r#"
        SELECT * FROM beneficiary_registrations
        WHERE ($1::text IS NULL OR supervisor_user_id = $1)
          AND ($2::text IS NULL
               OR full_name ILIKE $2
               OR mobile_number ILIKE $2
               OR register_id ILIKE $2)
        ORDER BY {} {}
        LIMIT $3 OFFSET $4
        "#,
        column, order
    );

    let registrations = sqlx::query_as::<_, BeneficiaryRegistration>(&sql)
        .bind(owner)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM beneficiary_registrations
        WHERE ($1::text IS NULL OR supervisor_user_id = $1)
          AND ($2::text IS NULL
               OR full_name ILIKE $2
               OR mobile_number ILIKE $2
               OR register_id ILIKE $2)
        "#,
    )
    .bind(owner)
    .bind(&search)
    .fetch_one(pool)
    .await?;

    Ok((registrations, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("full_name")), "full_name");
        assert_eq!(sort_column(Some("register_id")), "register_id");
        assert_eq!(sort_column(Some("fee; DROP TABLE users")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }

    #[test]
    fn test_counter_column_by_type() {
        assert_eq!(counter_column(RegistrationType::Yojana), "total_yojana_reg");
        assert_eq!(counter_column(RegistrationType::Intern), "total_intern_reg");
    }
}
