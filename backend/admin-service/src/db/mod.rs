pub mod application_repo;
pub mod commission_repo;
pub mod registration_repo;
pub mod revoked_token_repo;
pub mod supervisor_repo;
pub mod user_repo;
pub mod wallet_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseConfig;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Resolve caller-supplied paging parameters into a `(page, limit, offset)`
/// window. The offset saturates, so an absurd page number yields an empty
/// page rather than an arithmetic overflow or a negative OFFSET.
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(limit);
    (page, limit, offset)
}

/// Create a PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.url)
        .await
}

/// Run embedded migrations on startup
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None), (1, DEFAULT_PAGE_SIZE, 0));
        assert_eq!(page_window(Some(3), Some(10)), (3, 10, 20));
    }

    #[test]
    fn test_page_window_clamps_out_of_range_input() {
        assert_eq!(page_window(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_window(Some(-5), Some(10_000)), (1, MAX_PAGE_SIZE, 0));
    }

    #[test]
    fn test_page_window_survives_huge_page_numbers() {
        let (_, _, offset) = page_window(Some(i64::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(offset, i64::MAX);

        let (_, _, offset) = page_window(Some(i64::MAX), None);
        assert_eq!(offset, i64::MAX);
    }
}
