use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::db::{application_repo, registration_repo, supervisor_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::Role;

/// Uppercase alphanumerics only, so ids survive handwriting and phone calls.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;
const MAX_ATTEMPTS: usize = 32;

/// A freshly issued login id and one-time password. The password is returned
/// exactly once; only its hash is ever stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedCredentials {
    pub user_id: String,
    pub password: String,
}

/// Random 6-character uppercase alphanumeric code.
pub fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Prefix a code with the role marker: `A-` for admins, `I-` for supervisors.
pub fn format_user_id(role: Role, code: &str) -> String {
    format!("{}-{}", role.id_prefix(), code)
}

/// Generate a login id that collides with neither an existing account nor a
/// parked application. Ids handed out for still-pending applications must stay
/// reserved, hence the second check.
pub async fn generate_user_id(pool: &PgPool, role: Role) -> Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format_user_id(role, &random_code());
        if user_repo::user_id_exists(pool, &candidate).await? {
            continue;
        }
        if application_repo::user_id_exists(pool, &candidate).await? {
            continue;
        }
        return Ok(candidate);
    }

    Err(AppError::Internal(
        "Exhausted attempts generating a unique user id".to_string(),
    ))
}

/// Issue a unique login id plus a one-time password. The password is random
/// only, never uniqueness-checked; two accounts sharing a password is fine.
pub async fn generate_credentials(pool: &PgPool, role: Role) -> Result<GeneratedCredentials> {
    let user_id = generate_user_id(pool, role).await?;
    let password = random_code();
    Ok(GeneratedCredentials { user_id, password })
}

/// Supervisor register id: `SUP-` followed by six digits, unique among
/// supervisor profiles.
pub async fn generate_register_id(pool: &PgPool) -> Result<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format!("SUP-{:06}", rng.gen_range(0..1_000_000));
        if !supervisor_repo::register_id_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    Err(AppError::Internal(
        "Exhausted attempts generating a unique register id".to_string(),
    ))
}

/// Beneficiary register id: `REG-` followed by six digits, unique among
/// beneficiary registrations.
pub async fn generate_beneficiary_register_id(pool: &PgPool) -> Result<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format!("REG-{:06}", rng.gen_range(0..1_000_000));
        if !registration_repo::register_id_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    Err(AppError::Internal(
        "Exhausted attempts generating a unique register id".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_shape() {
        for _ in 0..100 {
            let code = random_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_format_user_id_prefixes() {
        assert_eq!(format_user_id(Role::Admin, "X7K2PQ"), "A-X7K2PQ");
        assert_eq!(format_user_id(Role::Supervisor, "X7K2PQ"), "I-X7K2PQ");
    }

    #[test]
    fn test_codes_are_not_constant() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| random_code()).collect();
        assert!(codes.len() > 1);
    }
}
