use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::core::config::DatabaseConfig;

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    tracing::debug!(
        "Database pool ready: min={}, max={}",
        config.min_connections,
        config.max_connections
    );
    Ok(pool)
}

/// Name of the violated constraint when `err` is a unique violation.
///
/// Services map constraint names (for example `usernames_pkey`) to
/// conflict messages.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    (db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
        .then(|| db_err.constraint().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(unique_violation(&sqlx::Error::RowNotFound).is_none());
        assert!(unique_violation(&sqlx::Error::PoolTimedOut).is_none());
    }
}
