/// Account and session handlers
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::{revoked_token_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::requests::{LoginRequest, RegisterRequest, UpdateAccountRequest};
use crate::models::{Role, User};
use crate::security::jwt::{token_digest, TokenIssuer};
use crate::security::{credentials, password};

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub token: String,
    pub account: AccountResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create an account directly. Self-service registration yields a supervisor
/// account; requesting the admin role requires an already-authenticated
/// admin caller.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 403, description = "Admin role requested without admin credentials"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let role = payload.role.unwrap_or(Role::Supervisor);
    if role == Role::Admin {
        let caller = optional_auth(&req, pool.get_ref(), &issuer).await?.ok_or_else(|| {
            AppError::Authentication("Admin registration requires authentication".to_string())
        })?;
        caller.require_admin()?;
    }

    if user_repo::email_exists(pool.get_ref(), &payload.email).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user_id = credentials::generate_user_id(pool.get_ref(), role).await?;
    let password_hash = password::hash_password(&payload.password)?;

    let user = user_repo::create_user(
        pool.get_ref(),
        &user_id,
        &payload.name,
        &payload.email,
        &password_hash,
        role,
    )
    .await?;

    tracing::info!(user_id = %user.user_id, role = %role.as_str(), "Account created");

    let token = issuer.issue(&user.user_id, user.role)?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        token,
        account: AccountResponse::from(user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    // Same error for unknown email and wrong password.
    let user = user_repo::find_by_email(pool.get_ref(), &payload.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    password::verify_password(&payload.password, &user.password_hash)?;

    let token = issuer.issue(&user.user_id, user.role)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user_id: user.user_id,
        name: user.name,
        role: user.role,
    }))
}

/// Revoke the presented token. The revocation record outlives the token's
/// maximum remaining lifetime, so replay after logout always fails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    auth: AuthUser,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse> {
    let token = bearer_token(&req)?;

    let expires_at = Utc::now() + Duration::seconds(issuer.ttl_secs());
    revoked_token_repo::revoke(pool.get_ref(), &token_digest(&token), expires_at).await?;

    tracing::info!(user_id = %auth.user_id, "Logged out");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/accounts/{user_id}",
    tag = "Auth",
    params(("user_id" = String, Path, description = "Login id of the account")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 403, description = "Not allowed to update this account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_account(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    let target_user_id = path.into_inner();
    payload.validate()?;

    let target = user_repo::find_by_user_id(pool.get_ref(), &target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    authorize_account_update(&auth, &target, &payload)?;

    if let Some(email) = &payload.email {
        if !email.eq_ignore_ascii_case(&target.email)
            && user_repo::email_exists(pool.get_ref(), email).await?
        {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
    }

    let password_hash = match &payload.password {
        Some(p) => Some(password::hash_password(p)?),
        None => None,
    };

    let updated = user_repo::update_account(
        pool.get_ref(),
        &target_user_id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        password_hash.as_deref(),
        payload.role,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(updated)))
}

/// Who may change what on an account:
/// - supervisors may update only their own account, and may not touch role
///   or email;
/// - admins may update themselves and any supervisor, but never another
///   admin.
pub fn authorize_account_update(
    actor: &AuthUser,
    target: &User,
    req: &UpdateAccountRequest,
) -> Result<()> {
    match actor.role {
        Role::Supervisor => {
            if actor.user_id != target.user_id {
                return Err(AppError::Authorization(
                    "Supervisors may only update their own account".to_string(),
                ));
            }
            if req.role.is_some() || req.email.is_some() {
                return Err(AppError::Authorization(
                    "Supervisors may not change role or email".to_string(),
                ));
            }
            Ok(())
        }
        Role::Admin => {
            if target.role == Role::Admin && actor.user_id != target.user_id {
                return Err(AppError::Authorization(
                    "Admins may not update other admin accounts".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Authenticate from the Authorization header if one is present. Used by the
/// register endpoint, which sits outside the auth-wrapped scopes.
async fn optional_auth(
    req: &HttpRequest,
    pool: &PgPool,
    issuer: &TokenIssuer,
) -> Result<Option<AuthUser>> {
    if req.headers().get("Authorization").is_none() {
        return Ok(None);
    }

    let token = bearer_token(req)?;
    if revoked_token_repo::is_revoked(pool, &token_digest(&token)).await? {
        return Err(AppError::Authentication(
            "Token has been revoked".to_string(),
        ));
    }

    let claims = issuer.verify(&token)?;
    Ok(Some(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    }))
}

fn bearer_token(req: &HttpRequest) -> Result<String> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing Authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::Authentication("Invalid Authorization scheme".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(user_id: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: "Test".to_string(),
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

    fn empty_update() -> UpdateAccountRequest {
        UpdateAccountRequest {
            name: Some("New Name".to_string()),
            email: None,
            password: None,
            role: None,
        }
    }

    #[test]
    fn test_supervisor_updates_self() {
        let target = user("I-X7K2PQ", Role::Supervisor);
        let req = empty_update();
        assert!(authorize_account_update(&actor("I-X7K2PQ", Role::Supervisor), &target, &req).is_ok());
    }

    #[test]
    fn test_supervisor_cannot_update_others() {
        let target = user("I-AAAAAA", Role::Supervisor);
        let req = empty_update();
        assert!(
            authorize_account_update(&actor("I-X7K2PQ", Role::Supervisor), &target, &req).is_err()
        );
    }

    #[test]
    fn test_supervisor_cannot_change_role_or_email() {
        let target = user("I-X7K2PQ", Role::Supervisor);
        let me = actor("I-X7K2PQ", Role::Supervisor);

        let mut req = empty_update();
        req.role = Some(Role::Admin);
        assert!(authorize_account_update(&me, &target, &req).is_err());

        let mut req = empty_update();
        req.email = Some("new@example.com".to_string());
        assert!(authorize_account_update(&me, &target, &req).is_err());
    }

    #[test]
    fn test_admin_updates_supervisor_and_self() {
        let me = actor("A-ADMIN1", Role::Admin);
        let req = empty_update();

        assert!(authorize_account_update(&me, &user("I-X7K2PQ", Role::Supervisor), &req).is_ok());
        assert!(authorize_account_update(&me, &user("A-ADMIN1", Role::Admin), &req).is_ok());
    }

    #[test]
    fn test_admin_cannot_update_other_admin() {
        let me = actor("A-ADMIN1", Role::Admin);
        let req = empty_update();
        assert!(authorize_account_update(&me, &user("A-ADMIN2", Role::Admin), &req).is_err());
    }
}
