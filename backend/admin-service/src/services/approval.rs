//! Application approval workflow.
//!
//! Every state transition runs in a single transaction that starts by taking
//! a row lock on the application, so concurrent decisions on the same
//! application serialise and exactly one wins.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{application_repo, supervisor_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{ApplicationStatus, Role, Supervisor, SupervisorApplication};
use crate::security::credentials;

/// Approve a pending application: create the login account and the
/// supervisor profile, then mark the application approved. The account
/// reuses the login id and password hash issued at submission time.
pub async fn approve(pool: &PgPool, application_id: Uuid) -> Result<Supervisor> {
    let mut tx = pool.begin().await?;

    let application = application_repo::find_by_id_for_update(&mut *tx, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if application.status != ApplicationStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "Application is not pending (status: {:?})",
            application.status
        )));
    }

    // Email uniqueness is enforced here, at decision time, not at submission.
    if user_repo::email_exists(&mut *tx, &application.email).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    user_repo::create_user(
        &mut *tx,
        &application.user_id,
        &application.full_name,
        &application.email,
        &application.password_hash,
        Role::Supervisor,
    )
    .await?;

    // Uniqueness of the candidate is checked against committed rows; the
    // unique index on register_id backstops the race.
    let register_id = credentials::generate_register_id(pool).await?;

    let supervisor =
        supervisor_repo::create_from_application(&mut *tx, &application, &register_id).await?;

    application_repo::set_status(&mut *tx, application_id, ApplicationStatus::Approved).await?;

    tx.commit().await?;

    tracing::info!(
        application_id = %application_id,
        user_id = %application.user_id,
        register_id = %register_id,
        "Application approved"
    );

    Ok(supervisor)
}

/// Reject an application. Rejection is unconditional for any existing
/// application. Rejecting an already approved one additionally deletes the
/// login account, while the supervisor profile is kept for record.
pub async fn reject(pool: &PgPool, application_id: Uuid) -> Result<SupervisorApplication> {
    let mut tx = pool.begin().await?;

    let application = application_repo::find_by_id_for_update(&mut *tx, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if application.status == ApplicationStatus::Approved {
        user_repo::delete_by_user_id(&mut *tx, &application.user_id).await?;
    }

    // The row is returned from inside the transaction; a concurrent delete
    // landing right after commit cannot turn a committed rejection into a 404.
    let rejected =
        application_repo::set_status_returning(&mut *tx, application_id, ApplicationStatus::Rejected)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    tx.commit().await?;

    tracing::info!(
        application_id = %application_id,
        user_id = %application.user_id,
        previous_status = ?application.status,
        "Application rejected"
    );

    Ok(rejected)
}

/// Delete an application in any status. Accounts and profiles created from
/// it are left standing; this removes the paperwork only.
pub async fn delete(pool: &PgPool, application_id: Uuid) -> Result<()> {
    let deleted = application_repo::delete(pool, application_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Application not found".to_string()));
    }

    tracing::info!(application_id = %application_id, "Application deleted");
    Ok(())
}
