//! Shared test infrastructure
//!
//! Builders for test aggregates and the optional database-backed test pool.

pub mod test_data;

pub use test_data::*;

use sqlx::PgPool;

/// Connect to the test database named by TEST_DATABASE_URL and apply
/// migrations. Returns `None` when no test database is configured so
/// database-backed tests can skip instead of failing.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = match PgPool::connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("TEST_DATABASE_URL set but unreachable ({}), skipping", e);
            return None;
        }
    };
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");
    Some(pool)
}

/// Wipe all rows between tests; tables are small in test runs
pub async fn reset_database(pool: &PgPool) {
    sqlx::query("TRUNCATE reviews, notifications, rides, users RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .expect("Failed to reset test database");
}
