/// Wallet ledger handlers
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{supervisor_repo, wallet_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::WalletAdjustRequest;
use crate::models::{Supervisor, TransactionType, WalletTransaction};

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletAdjustResponse {
    pub transaction: WalletTransaction,
    pub supervisor: Supervisor,
}

#[utoipa::path(
    post,
    path = "/api/v1/supervisors/{user_id}/wallet/credit",
    tag = "Wallet",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    request_body = WalletAdjustRequest,
    responses(
        (status = 200, description = "Wallet credited", body = WalletAdjustResponse),
        (status = 404, description = "Supervisor not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn credit(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<WalletAdjustRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let (transaction, supervisor) = wallet_repo::record_transaction(
        pool.get_ref(),
        &path.into_inner(),
        TransactionType::Credit,
        payload.amount,
    )
    .await?;

    Ok(HttpResponse::Ok().json(WalletAdjustResponse {
        transaction,
        supervisor,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/supervisors/{user_id}/wallet/debit",
    tag = "Wallet",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    request_body = WalletAdjustRequest,
    responses(
        (status = 200, description = "Wallet debited", body = WalletAdjustResponse),
        (status = 404, description = "Supervisor not found"),
        (status = 409, description = "Insufficient balance")
    ),
    security(("bearer_auth" = []))
)]
pub async fn debit(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<WalletAdjustRequest>,
) -> Result<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let (transaction, supervisor) = wallet_repo::record_transaction(
        pool.get_ref(),
        &path.into_inner(),
        TransactionType::Debit,
        payload.amount,
    )
    .await?;

    Ok(HttpResponse::Ok().json(WalletAdjustResponse {
        transaction,
        supervisor,
    }))
}

/// Transaction history. Admins may read any supervisor's ledger, a
/// supervisor only their own.
#[utoipa::path(
    get,
    path = "/api/v1/supervisors/{user_id}/wallet",
    tag = "Wallet",
    params(("user_id" = String, Path, description = "Login id of the supervisor")),
    responses(
        (status = 200, description = "Wallet transactions", body = [WalletTransaction]),
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

    let entries = wallet_repo::list_for_supervisor(pool.get_ref(), supervisor.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}
