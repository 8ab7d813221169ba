/// Supervisor application handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::db::{application_repo, page_window};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::{ListApplicationsQuery, SubmitApplicationRequest};
use crate::models::{Role, SupervisorApplication};
use crate::security::credentials::{self, GeneratedCredentials};
use crate::security::password;
use crate::services::approval;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationListResponse {
    pub applications: Vec<SupervisorApplication>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitApplicationResponse {
    pub application: SupervisorApplication,
    /// Returned exactly once; only the hash is stored.
    pub credentials: GeneratedCredentials,
}

/// Submit a supervisor application. A fresh login id and one-time password
/// are issued per submission and returned to the applicant. The email is
/// recorded as-is; uniqueness against existing accounts is checked at
/// approval, not here.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    tag = "Applications",
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = SubmitApplicationResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn submit(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<SubmitApplicationRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let creds = credentials::generate_credentials(pool.get_ref(), Role::Supervisor).await?;
    let password_hash = password::hash_password(&creds.password)?;
    let registration_fee = payload
        .registration_fee
        .unwrap_or(config.fees.default_registration_fee);

    let application = application_repo::create_application(
        pool.get_ref(),
        &payload,
        &creds.user_id,
        &password_hash,
        registration_fee,
    )
    .await?;

    tracing::info!(
        application_id = %application.id,
        user_id = %application.user_id,
        "Application submitted"
    );

    Ok(HttpResponse::Created().json(SubmitApplicationResponse {
        application,
        credentials: creds,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications",
    tag = "Applications",
    params(ListApplicationsQuery),
    responses(
        (status = 200, description = "Applications", body = ApplicationListResponse),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    query: web::Query<ListApplicationsQuery>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let (applications, total) = application_repo::list(pool.get_ref(), &query).await?;
    let (page, limit, _) = page_window(query.page, query.limit);

    Ok(HttpResponse::Ok().json(ApplicationListResponse {
        applications,
        total,
        page,
        limit,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application", body = SupervisorApplication),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_id(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let application = application_repo::find_by_id(pool.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    Ok(HttpResponse::Ok().json(application))
}

#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/approve",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Approved; supervisor profile created"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Not pending, or email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let supervisor = approval::approve(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(supervisor))
}

#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/reject",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Rejected", body = SupervisorApplication),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let application = approval::reject(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}

#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    approval::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
