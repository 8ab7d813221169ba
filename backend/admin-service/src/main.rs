use actix_cors::Cors;
use actix_web::{http, web, App, HttpServer};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_service::config::Config;
use admin_service::db::{self, revoked_token_repo, user_repo};
use admin_service::models::Role;
use admin_service::routes;
use admin_service::security::jwt::TokenIssuer;
use admin_service::security::{credentials, password};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_service=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    bootstrap_admin(&pool).await?;

    let issuer = TokenIssuer::from_config(&config.jwt);

    // Periodic purge of revocation records past their expiry.
    let cleanup_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match revoked_token_repo::cleanup_expired(&cleanup_pool).await {
                Ok(purged) if purged > 0 => {
                    tracing::info!(purged, "Purged expired token revocations");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Revocation cleanup failed: {}", e),
            }
        }
    });

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!(
        host = %bind_addr.0,
        port = bind_addr.1,
        env = %config.app.env,
        "Starting admin service"
    );

    let app_config = config.clone();
    HttpServer::new(move || {
        let cors = build_cors(&app_config);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(issuer.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}

/// Account creation is admin-gated, so the very first admin is seeded from
/// the environment. Does nothing once any admin account exists.
async fn bootstrap_admin(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let Ok(admin_password) = std::env::var("BOOTSTRAP_ADMIN_PASSWORD") else {
        return Ok(());
    };

    if user_repo::admin_exists(pool).await? {
        return Ok(());
    }

    let name =
        std::env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let email =
        std::env::var("BOOTSTRAP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());

    let user_id = credentials::generate_user_id(pool, Role::Admin).await?;
    let password_hash = password::hash_password(&admin_password)?;

    user_repo::create_user(pool, &user_id, &name, &email, &password_hash, Role::Admin).await?;
    tracing::info!(user_id = %user_id, "Bootstrap admin account created");

    Ok(())
}

fn build_cors(config: &Config) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .max_age(config.cors.max_age as usize);

    if config.cors.allowed_origins.trim() == "*" {
        cors = cors.allow_any_origin();
    } else {
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
    }

    cors
}
