/// Supervisor profile handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{page_window, supervisor_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::{ListSupervisorsQuery, UpdateSupervisorRequest};
use crate::models::Supervisor;

#[derive(Debug, Serialize, ToSchema)]
pub struct SupervisorListResponse {
    pub supervisors: Vec<Supervisor>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/supervisors",
    tag = "Supervisors",
    params(ListSupervisorsQuery),
    responses(
        (status = 200, description = "Supervisors", body = SupervisorListResponse),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    query: web::Query<ListSupervisorsQuery>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let (supervisors, total) = supervisor_repo::list(pool.get_ref(), &query).await?;
    let (page, limit, _) = page_window(query.page, query.limit);

    Ok(HttpResponse::Ok().json(SupervisorListResponse {
        supervisors,
        total,
        page,
        limit,
    }))
}

/// A supervisor's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/supervisors/me",
    tag = "Supervisors",
    responses(
        (status = 200, description = "Own profile", body = Supervisor),
        (status = 404, description = "No profile for this account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_own_profile(auth: AuthUser, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let supervisor = supervisor_repo::find_by_user_id(pool.get_ref(), &auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No supervisor profile for this account".to_string()))?;

    Ok(HttpResponse::Ok().json(supervisor))
}

#[utoipa::path(
    put,
    path = "/api/v1/supervisors/me",
    tag = "Supervisors",
    request_body = UpdateSupervisorRequest,
    responses(
        (status = 200, description = "Profile updated", body = Supervisor),
        (status = 404, description = "No profile for this account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_own_profile(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    payload: web::Json<UpdateSupervisorRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let supervisor = supervisor_repo::update(pool.get_ref(), &auth.user_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("No supervisor profile for this account".to_string()))?;

    Ok(HttpResponse::Ok().json(supervisor))
}

#[utoipa::path(
    get,
    path = "/api/v1/supervisors/{user_id}",
    tag = "Supervisors",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    responses(
        (status = 200, description = "Supervisor profile", body = Supervisor),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_user_id(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    auth.require_admin()?;

    let supervisor = supervisor_repo::find_by_user_id(pool.get_ref(), &path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Supervisor not found".to_string()))?;

    Ok(HttpResponse::Ok().json(supervisor))
}

#[utoipa::path(
    put,
    path = "/api/v1/supervisors/{user_id}",
    tag = "Supervisors",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    request_body = UpdateSupervisorRequest,
    responses(
        (status = 200, description = "Supervisor updated", body = Supervisor),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_by_user_id(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateSupervisorRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let supervisor = supervisor_repo::update(pool.get_ref(), &path.into_inner(), &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Supervisor not found".to_string()))?;

    Ok(HttpResponse::Ok().json(supervisor))
}

/// Remove a supervisor entirely: the profile, its ledgers (via cascade) and
/// the login account go together in one transaction.
#[utoipa::path(
    delete,
    path = "/api/v1/supervisors/{user_id}",
    tag = "Supervisors",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    responses(
        (status = 204, description = "Supervisor deleted"),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_by_user_id(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    let user_id = path.into_inner();

    let mut tx = pool.get_ref().begin().await?;

    let deleted = supervisor_repo::delete_by_user_id(&mut *tx, &user_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Supervisor not found".to_string()));
    }
    user_repo::delete_by_user_id(&mut *tx, &user_id).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, "Supervisor deleted");

    Ok(HttpResponse::NoContent().finish())
}
