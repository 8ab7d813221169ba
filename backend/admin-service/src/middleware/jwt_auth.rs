/// Bearer token authentication middleware.
/// Checks the revocation list before signature validation, then places the
/// authenticated account into request extensions.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::db::revoked_token_repo;
use crate::error::AppError;
use crate::models::Role;
use crate::security::jwt::{token_digest, TokenIssuer};

/// Authenticated account extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Admin privileges required".to_string(),
            ))
        }
    }
}

pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Read headers into owned data before touching extensions_mut();
            // overlapping RefCell borrows on the request panic at runtime.
            let auth_header = match req.headers().get("Authorization") {
                Some(header) => match header.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => {
                        return Err(ErrorUnauthorized("Invalid Authorization header"));
                    }
                },
                None => {
                    return Err(ErrorUnauthorized("Missing Authorization header"));
                }
            };

            let token = match auth_header.strip_prefix("Bearer ") {
                Some(t) => t.to_string(),
                None => {
                    return Err(ErrorUnauthorized(
                        "Invalid Authorization scheme, expected Bearer",
                    ));
                }
            };

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| ErrorUnauthorized("Authentication backend unavailable"))?
                .clone();
            let issuer = req
                .app_data::<web::Data<TokenIssuer>>()
                .ok_or_else(|| ErrorUnauthorized("Authentication backend unavailable"))?
                .clone();

            // Revocation wins over a valid signature: a logged-out token is
            // dead even before it expires.
            let digest = token_digest(&token);
            match revoked_token_repo::is_revoked(&pool, &digest).await {
                Ok(true) => {
                    return Err(ErrorUnauthorized("Token has been revoked"));
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("Revocation check failed: {}", e);
                    return Err(ErrorUnauthorized("Authentication backend unavailable"));
                }
            }

            let claims = match issuer.verify(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!("Token validation failed: {}", e);
                    return Err(ErrorUnauthorized("Invalid or expired token"));
                }
            };

            req.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
                role: claims.role,
            });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized(
                "Authenticated user missing in request extensions",
            ))),
        }
    }
}
