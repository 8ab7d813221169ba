/// Integration tests for the application approval workflow
///
/// These tests need a PostgreSQL instance reachable via DATABASE_URL and are
/// ignored by default:
///
///   DATABASE_URL=postgres://localhost/admin_test cargo test -- --ignored

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use admin_service::db::{self, application_repo, supervisor_repo, user_repo};
use admin_service::error::AppError;
use admin_service::models::requests::SubmitApplicationRequest;
use admin_service::models::{ApplicationStatus, Caste, Gender, Role};
use admin_service::security::{credentials, password};
use admin_service::services::approval;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = PgPool::connect(&url).await.expect("connect to database");
    db::run_migrations(&pool).await.expect("run migrations");
    pool
}

fn request(email: &str) -> SubmitApplicationRequest {
    SubmitApplicationRequest {
        full_name: "Asha Kumari".to_string(),
        father_name: "Ram Kumar".to_string(),
        mother_name: "Sita Devi".to_string(),
        dob: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
        gender: Gender::Female,
        caste: Caste::General,
        mobile_number: "9876543210".to_string(),
        email: email.to_string(),
        yojana_name: "Gram Vikas Yojana".to_string(),
        job_type: "Field Supervisor".to_string(),
        registration_fee: Some(1000.0),
        permanent_address: None,
        correspondence_address: None,
        identity_document_type: "Aadhaar".to_string(),
        document_number: "1234-5678-9012".to_string(),
        attached_document: None,
        photo: None,
        signature: None,
        experience_years: Some(3),
        educational_qualification: Some("B.A.".to_string()),
        preferred_panchayat: None,
    }
}

async fn submit(pool: &PgPool) -> Uuid {
    let user_id = credentials::generate_user_id(pool, Role::Supervisor)
        .await
        .unwrap();
    let email = format!("applicant-{}@example.com", Uuid::new_v4());
    submit_with(pool, &user_id, &email).await
}

async fn submit_with(pool: &PgPool, user_id: &str, email: &str) -> Uuid {
    let hash = password::hash_password("X7K2PQ").unwrap();
    let application =
        application_repo::create_application(pool, &request(email), user_id, &hash, 1000.0)
            .await
            .unwrap();
    application.id
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn approve_creates_account_and_profile() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    let supervisor = approval::approve(&pool, id).await.unwrap();

    let application = application_repo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(application.status, ApplicationStatus::Approved);

    let user = user_repo::find_by_user_id(&pool, &application.user_id)
        .await
        .unwrap()
        .expect("account must exist after approval");
    assert_eq!(user.role, Role::Supervisor);
    assert_eq!(user.email, application.email);

    assert!(supervisor.register_id.starts_with("SUP-"));
    assert_eq!(supervisor.user_id, application.user_id);
    assert_eq!(supervisor.name, application.full_name);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn approve_twice_fails_with_invalid_state() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    approval::approve(&pool, id).await.unwrap();
    let second = approval::approve(&pool, id).await;

    assert!(matches!(second, Err(AppError::InvalidState(_))));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn approve_with_taken_email_conflicts_and_persists_nothing() {
    let pool = test_pool().await;
    let email = format!("taken-{}@example.com", Uuid::new_v4());

    let first = submit_with(
        &pool,
        &credentials::generate_user_id(&pool, Role::Supervisor)
            .await
            .unwrap(),
        &email,
    )
    .await;
    approval::approve(&pool, first).await.unwrap();

    let second_user_id = credentials::generate_user_id(&pool, Role::Supervisor)
        .await
        .unwrap();
    let second = submit_with(&pool, &second_user_id, &email).await;

    let result = approval::approve(&pool, second).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // Nothing from the failed approval leaked out of the transaction.
    let application = application_repo::find_by_id(&pool, second)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(user_repo::find_by_user_id(&pool, &second_user_id)
        .await
        .unwrap()
        .is_none());
    assert!(supervisor_repo::find_by_user_id(&pool, &second_user_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn reject_is_unconditional_for_existing_applications() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    let application = approval::reject(&pool, id).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::Rejected);

    // Rejecting again succeeds and stays Rejected; re-approval is refused.
    let again = approval::reject(&pool, id).await.unwrap();
    assert_eq!(again.status, ApplicationStatus::Rejected);
    assert!(matches!(
        approval::approve(&pool, id).await,
        Err(AppError::InvalidState(_))
    ));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn reject_reports_the_row_it_committed() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    let returned = approval::reject(&pool, id).await.unwrap();

    // The response is the row written inside the transaction, not a later
    // re-read; it must match what landed in the table exactly.
    let stored = application_repo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(returned.status, ApplicationStatus::Rejected);
    assert_eq!(returned.updated_at, stored.updated_at);

    // Even if the paperwork is deleted right after, the committed rejection
    // already holds the rejected row.
    approval::delete(&pool, id).await.unwrap();
    assert_eq!(returned.id, id);
    assert_eq!(returned.status, ApplicationStatus::Rejected);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn reject_approved_deletes_account_but_keeps_profile() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    approval::approve(&pool, id).await.unwrap();
    let application = application_repo::find_by_id(&pool, id).await.unwrap().unwrap();

    approval::reject(&pool, id).await.unwrap();

    assert!(user_repo::find_by_user_id(&pool, &application.user_id)
        .await
        .unwrap()
        .is_none());
    assert!(supervisor_repo::find_by_user_id(&pool, &application.user_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn delete_application_leaves_profile_standing() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    approval::approve(&pool, id).await.unwrap();
    let application = application_repo::find_by_id(&pool, id).await.unwrap().unwrap();

    approval::delete(&pool, id).await.unwrap();

    assert!(application_repo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(supervisor_repo::find_by_user_id(&pool, &application.user_id)
        .await
        .unwrap()
        .is_some());
    assert!(matches!(
        approval::delete(&pool, id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn concurrent_approvals_let_exactly_one_win() {
    let pool = test_pool().await;
    let id = submit(&pool).await;

    let (a, b) = tokio::join!(approval::approve(&pool, id), approval::approve(&pool, id));

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one concurrent approval must succeed");

    let application = application_repo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(application.status, ApplicationStatus::Approved);
}
