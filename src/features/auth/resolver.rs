use sqlx::PgPool;

use super::model::AccountProfile;
use crate::core::error::{AppError, Result};

/// Looks up the profile behind a token subject
pub struct AccountResolver {
    pool: PgPool,
}

impl AccountResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn resolve(&self, sub: &str) -> Result<Option<AccountProfile>> {
        sqlx::query_as::<_, AccountProfile>(
            "SELECT id, username, role FROM users WHERE auth_subject = $1",
        )
        .bind(sub)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve account for {}: {:?}", sub, e);
            AppError::Database(e)
        })
    }
}
