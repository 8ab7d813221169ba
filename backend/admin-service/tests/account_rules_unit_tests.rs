/// Unit tests for account update authorization
///
/// This test module covers:
/// - Supervisors updating themselves and only themselves
/// - The role/email lockout for supervisors
/// - Admin-to-admin protection

use chrono::Utc;
use uuid::Uuid;

use admin_service::handlers::auth::authorize_account_update;
use admin_service::middleware::AuthUser;
use admin_service::models::requests::UpdateAccountRequest;
use admin_service::models::{Role, User};

fn user(user_id: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        name: "Someone".to_string(),
        email: format!("{}@example.com", user_id.to_lowercase()),
        password_hash: "hash".to_string(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn actor(user_id: &str, role: Role) -> AuthUser {
    AuthUser {
        user_id: user_id.to_string(),
        role,
    }
}

fn name_only() -> UpdateAccountRequest {
    UpdateAccountRequest {
        name: Some("Renamed".to_string()),
        email: None,
        password: None,
        role: None,
    }
}

#[test]
fn test_supervisor_may_rename_self() {
    let result = authorize_account_update(
        &actor("I-X7K2PQ", Role::Supervisor),
        &user("I-X7K2PQ", Role::Supervisor),
        &name_only(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_supervisor_may_change_own_password() {
    let req = UpdateAccountRequest {
        name: None,
        email: None,
        password: Some("new-password".to_string()),
        role: None,
    };
    let result = authorize_account_update(
        &actor("I-X7K2PQ", Role::Supervisor),
        &user("I-X7K2PQ", Role::Supervisor),
        &req,
    );
    assert!(result.is_ok());
}

#[test]
fn test_supervisor_may_not_touch_another_account() {
    let result = authorize_account_update(
        &actor("I-X7K2PQ", Role::Supervisor),
        &user("I-OTHER1", Role::Supervisor),
        &name_only(),
    );
    assert!(result.is_err());
}

#[test]
fn test_supervisor_may_not_escalate_role() {
    let mut req = name_only();
    req.role = Some(Role::Admin);

    let result = authorize_account_update(
        &actor("I-X7K2PQ", Role::Supervisor),
        &user("I-X7K2PQ", Role::Supervisor),
        &req,
    );
    assert!(result.is_err());
}

#[test]
fn test_supervisor_may_not_change_own_email() {
    let mut req = name_only();
    req.email = Some("sneaky@example.com".to_string());

    let result = authorize_account_update(
        &actor("I-X7K2PQ", Role::Supervisor),
        &user("I-X7K2PQ", Role::Supervisor),
        &req,
    );
    assert!(result.is_err());
}

#[test]
fn test_admin_may_update_any_supervisor() {
    let mut req = name_only();
    req.email = Some("corrected@example.com".to_string());
    req.role = Some(Role::Supervisor);

    let result = authorize_account_update(
        &actor("A-ADMIN1", Role::Admin),
        &user("I-X7K2PQ", Role::Supervisor),
        &req,
    );
    assert!(result.is_ok());
}

#[test]
fn test_admin_may_update_self() {
    let result = authorize_account_update(
        &actor("A-ADMIN1", Role::Admin),
        &user("A-ADMIN1", Role::Admin),
        &name_only(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_admin_may_not_update_other_admin() {
    let result = authorize_account_update(
        &actor("A-ADMIN1", Role::Admin),
        &user("A-ADMIN2", Role::Admin),
        &name_only(),
    );
    assert!(result.is_err());
}
