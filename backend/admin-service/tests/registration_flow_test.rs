/// Integration tests for beneficiary registrations
///
/// These tests need a PostgreSQL instance reachable via DATABASE_URL and are
/// ignored by default:
///
///   DATABASE_URL=postgres://localhost/admin_test cargo test -- --ignored

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use admin_service::db::{self, application_repo, registration_repo, supervisor_repo};
use admin_service::models::requests::{
    ListRegistrationsQuery, RegisterBeneficiaryRequest, SubmitApplicationRequest,
};
use admin_service::models::{Caste, Gender, RegistrationType, Role, Supervisor};
use admin_service::security::{credentials, password};
use admin_service::services::approval;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = PgPool::connect(&url).await.expect("connect to database");
    db::run_migrations(&pool).await.expect("run migrations");
    pool
}

/// Submit and approve an application, yielding a live supervisor profile.
async fn approved_supervisor(pool: &PgPool) -> Supervisor {
    let user_id = credentials::generate_user_id(pool, Role::Supervisor)
        .await
        .unwrap();
    let email = format!("supervisor-{}@example.com", Uuid::new_v4());
    let hash = password::hash_password("X7K2PQ").unwrap();

    let request = SubmitApplicationRequest {
        full_name: "Asha Kumari".to_string(),
        father_name: "Ram Kumar".to_string(),
        mother_name: "Sita Devi".to_string(),
        dob: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
        gender: Gender::Female,
        caste: Caste::General,
        mobile_number: "9876543210".to_string(),
        email,
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
    };
    let application = application_repo::create_application(pool, &request, &user_id, &hash, 1000.0)
        .await
        .unwrap();

    approval::approve(pool, application.id).await.unwrap()
}

fn beneficiary(registration_type: RegistrationType) -> RegisterBeneficiaryRequest {
    RegisterBeneficiaryRequest {
        registration_type: Some(registration_type),
        yojana_name: "Free Sewing Machine Distribution Pariyojna".to_string(),
        full_name: "Meena Devi".to_string(),
        guardian_name: "Shyam Lal".to_string(),
        mother_name: Some("Radha Devi".to_string()),
        dob: NaiveDate::from_ymd_opt(1990, 7, 2).unwrap(),
        gender: Gender::Female,
        caste: Caste::Obc,
        mobile_number: "9123456780".to_string(),
        email: None,
        address: None,
        correspondence_address: None,
        guardian_annual_income: Some("48000".to_string()),
        ration_card: None,
        village_head_name: None,
        previous_training_institute: None,
        work_duration: None,
        preferred_panchayat: None,
        identity_document_type: "Aadhaar".to_string(),
        document_number: "9876-5432-1098".to_string(),
        photo: Some("photo-1723.jpg".to_string()),
        signature: None,
        identity_document: Some("aadhaar-1723.pdf".to_string()),
        fee: Some(30.0),
    }
}

fn all(search: Option<&str>) -> ListRegistrationsQuery {
    ListRegistrationsQuery {
        search: search.map(|s| s.to_string()),
        sort_by: None,
        sort_order: None,
        page: None,
        limit: None,
    }
}

async fn file(pool: &PgPool, supervisor_user_id: &str, registration_type: RegistrationType) {
    let register_id = credentials::generate_beneficiary_register_id(pool)
        .await
        .unwrap();
    registration_repo::create(
        pool,
        &beneficiary(registration_type),
        supervisor_user_id,
        &register_id,
    )
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn registering_a_beneficiary_bumps_the_supervisor_counters() {
    let pool = test_pool().await;
    let supervisor = approved_supervisor(&pool).await;
    assert_eq!(supervisor.total_reg, 0);

    file(&pool, &supervisor.user_id, RegistrationType::Yojana).await;
    file(&pool, &supervisor.user_id, RegistrationType::Yojana).await;
    file(&pool, &supervisor.user_id, RegistrationType::Intern).await;

    let updated = supervisor_repo::find_by_user_id(&pool, &supervisor.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.total_yojana_reg, 2);
    assert_eq!(updated.total_intern_reg, 1);
    assert_eq!(updated.total_reg, 3);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn owner_filter_scopes_the_listing() {
    let pool = test_pool().await;
    let first = approved_supervisor(&pool).await;
    let second = approved_supervisor(&pool).await;

    file(&pool, &first.user_id, RegistrationType::Yojana).await;
    file(&pool, &second.user_id, RegistrationType::Yojana).await;

    let (own, total) = registration_repo::list(&pool, &all(None), Some(&first.user_id))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(own.iter().all(|r| r.supervisor_user_id == first.user_id));

    // Unscoped listing sees registrations from both supervisors.
    let (_, unscoped_total) = registration_repo::list(&pool, &all(None), None).await.unwrap();
    assert!(unscoped_total >= 2);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn absurd_page_numbers_yield_an_empty_page() {
    let pool = test_pool().await;
    let supervisor = approved_supervisor(&pool).await;
    file(&pool, &supervisor.user_id, RegistrationType::Yojana).await;

    let query = ListRegistrationsQuery {
        search: None,
        sort_by: None,
        sort_order: None,
        page: Some(i64::MAX),
        limit: Some(100),
    };
    let (rows, total) = registration_repo::list(&pool, &query, Some(&supervisor.user_id))
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn registrations_carry_filename_references_and_a_register_id() {
    let pool = test_pool().await;
    let supervisor = approved_supervisor(&pool).await;

    let register_id = credentials::generate_beneficiary_register_id(&pool)
        .await
        .unwrap();
    let registration = registration_repo::create(
        &pool,
        &beneficiary(RegistrationType::Yojana),
        &supervisor.user_id,
        &register_id,
    )
    .await
    .unwrap();

    assert!(registration.register_id.starts_with("REG-"));
    assert_eq!(registration.photo.as_deref(), Some("photo-1723.jpg"));
    assert!(!registration.confirmed);

    let found = registration_repo::find_by_register_id(&pool, &registration.register_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, registration.id);
}
