use actix_web::web;

use crate::handlers::{applications, auth, commissions, health, registrations, supervisors, wallet};
use crate::middleware::JwtAuthMiddleware;
use crate::openapi;

/// Route tree. Public endpoints (health, login, credential issuance,
/// application submission) sit outside the auth wrapper; everything else
/// requires a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));
    cfg.route(
        "/api/v1/openapi.json",
        web::get().to(openapi::openapi_json),
    );

    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    // register handles its own (optional) authentication so
                    // self-service supervisor signup stays open
                    .route("/register", web::post().to(auth::register))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("/logout", web::post().to(auth::logout))
                            .route("/accounts/{user_id}", web::put().to(auth::update_account)),
                    ),
            )
            .service(
                web::scope("/applications")
                    .route("", web::post().to(applications::submit))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("", web::get().to(applications::list))
                            .route("/{id}", web::get().to(applications::get_by_id))
                            .route("/{id}/approve", web::patch().to(applications::approve))
                            .route("/{id}/reject", web::patch().to(applications::reject))
                            .route("/{id}", web::delete().to(applications::delete)),
                    ),
            )
            .service(
                web::scope("/registrations")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(registrations::create))
                    .route("", web::get().to(registrations::list))
                    .route(
                        "/{register_id}",
                        web::get().to(registrations::get_by_register_id),
                    ),
            )
            .service(
                // "/me" is registered before "/{user_id}" so it is matched
                // literally, not captured as a login id.
                web::scope("/supervisors")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::get().to(supervisors::list))
                    .route("/me", web::get().to(supervisors::get_own_profile))
                    .route("/me", web::put().to(supervisors::update_own_profile))
                    .route("/{user_id}/wallet/credit", web::post().to(wallet::credit))
                    .route("/{user_id}/wallet/debit", web::post().to(wallet::debit))
                    .route("/{user_id}/wallet", web::get().to(wallet::history))
                    .route(
                        "/{user_id}/commissions",
                        web::post().to(commissions::record),
                    )
                    .route("/{user_id}/commissions", web::get().to(commissions::history))
                    .route("/{user_id}", web::get().to(supervisors::get_by_user_id))
                    .route("/{user_id}", web::put().to(supervisors::update_by_user_id))
                    .route(
                        "/{user_id}",
                        web::delete().to(supervisors::delete_by_user_id),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_openapi_document_served_under_api_v1() {
        let app = test::init_service(App::new().configure(super::configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/openapi.json")
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());
    }
}
