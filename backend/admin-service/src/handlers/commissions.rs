/// Commission ledger handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{commission_repo, supervisor_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::RecordCommissionRequest;
use crate::models::{Commission, Supervisor};

#[derive(Debug, Serialize, ToSchema)]
pub struct CommissionResponse {
    pub commission: Commission,
    pub supervisor: Supervisor,
}

#[utoipa::path(
    post,
    path = "/api/v1/supervisors/{user_id}/commissions",
    tag = "Commissions",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    request_body = RecordCommissionRequest,
    responses(
        (status = 200, description = "Commission recorded", body = CommissionResponse),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<RecordCommissionRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let (commission, supervisor) = commission_repo::record_commission(
        pool.get_ref(),
        &path.into_inner(),
        payload.commission_amount,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CommissionResponse {
        commission,
        supervisor,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/supervisors/{user_id}/commissions",
    tag = "Commissions",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    responses(
        (status = 200, description = "Commission history", body = [Commission]),
        (status = 403, description = "Not allowed to read this ledger"),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    if !auth.is_admin() && auth.user_id != user_id {
        return Err(AppError::Authorization(
            "Not allowed to read this ledger".to_string(),
        ));
    }

    let supervisor = supervisor_repo::find_by_user_id(pool.get_ref(), &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supervisor not found".to_string()))?;

    let entries = commission_repo::list_for_supervisor(pool.get_ref(), supervisor.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}
