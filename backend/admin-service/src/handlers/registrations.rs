/// Beneficiary registration handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{page_window, registration_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::{ListRegistrationsQuery, RegisterBeneficiaryRequest};
use crate::models::BeneficiaryRegistration;
use crate::security::credentials;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationListResponse {
    pub registrations: Vec<BeneficiaryRegistration>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// File a beneficiary registration under the caller's name. The registration
/// is counted towards the caller's supervisor profile.
#[utoipa::path(
    post,
    path = "/api/v1/registrations",
    tag = "Registrations",
    request_body = RegisterBeneficiaryRequest,
    responses(
        (status = 201, description = "Registration filed", body = BeneficiaryRegistration),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    payload: web::Json<RegisterBeneficiaryRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let register_id = credentials::generate_beneficiary_register_id(pool.get_ref()).await?;
    let registration =
        registration_repo::create(pool.get_ref(), &payload, &auth.user_id, &register_id).await?;

    tracing::info!(
        register_id = %registration.register_id,
        supervisor_user_id = %registration.supervisor_user_id,
        registration_type = ?registration.registration_type,
        "Beneficiary registered"
    );

    Ok(HttpResponse::Created().json(registration))
}

/// Admins see every registration; a supervisor only those they filed.
#[utoipa::path(
    get,
    path = "/api/v1/registrations",
    tag = "Registrations",
    params(ListRegistrationsQuery),
    responses(
        (status = 200, description = "Registrations", body = RegistrationListResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    query: web::Query<ListRegistrationsQuery>,
) -> Result<HttpResponse> {
    let owner = if auth.is_admin() {
        None
    } else {
        Some(auth.user_id.as_str())
    };

    let (registrations, total) = registration_repo::list(pool.get_ref(), &query, owner).await?;
    let (page, limit, _) = page_window(query.page, query.limit);

    Ok(HttpResponse::Ok().json(RegistrationListResponse {
        registrations,
        total,
        page,
        limit,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/registrations/{register_id}",
    tag = "Registrations",
    params(("register_id" = String, Path, description = "Beneficiary register id")),
    responses(
        (status = 200, description = "Registration", body = BeneficiaryRegistration),
        (status = 403, description = "Filed by another supervisor"),
        (status = 404, description = "Registration not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_register_id(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let registration = registration_repo::find_by_register_id(pool.get_ref(), &path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    if !auth.is_admin() && auth.user_id != registration.supervisor_user_id {
        return Err(AppError::Authorization(
            "Not allowed to read this registration".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(registration))
}
