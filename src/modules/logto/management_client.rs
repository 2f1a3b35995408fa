use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

use super::token_manager::LogtoTokenManager;
use crate::core::error::{AppError, Result};

/// What the identity provider reported for a delete call
#[derive(Debug, PartialEq, Eq)]
enum DeleteOutcome {
    Deleted,
    AlreadyGone,
    RetryWithFreshToken,
    Failed,
}

fn classify_delete(status: StatusCode) -> DeleteOutcome {
    match status {
        s if s.is_success() => DeleteOutcome::Deleted,
        StatusCode::NOT_FOUND => DeleteOutcome::AlreadyGone,
        StatusCode::UNAUTHORIZED => DeleteOutcome::RetryWithFreshToken,
        _ => DeleteOutcome::Failed,
    }
}

/// Identity store behind the bearer tokens this API accepts
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Remove the identity. An identity that no longer exists counts as removed.
    async fn delete_identity(&self, subject: &str) -> Result<()>;
}

/// Client for the Logto Management API
pub struct LogtoManagementClient {
    token_manager: Arc<LogtoTokenManager>,
    http_client: reqwest::Client,
}

impl LogtoManagementClient {
    pub fn new(token_manager: Arc<LogtoTokenManager>) -> Self {
        Self {
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send_delete(&self, subject: &str) -> Result<reqwest::Response> {
        let token = self.token_manager.get_access_token().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to get access token: {}", e))
        })?;

        let url = format!(
            "{}/api/users/{}",
            self.token_manager.api_base_url(),
            urlencoding::encode(subject)
        );

        self.http_client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Logto: {}", e);
                AppError::ExternalServiceError(format!("Failed to reach identity provider: {}", e))
            })
    }
}

#[async_trait]
impl IdentityProvider for LogtoManagementClient {
    async fn delete_identity(&self, subject: &str) -> Result<()> {
        let mut response = self.send_delete(subject).await?;

        if classify_delete(response.status()) == DeleteOutcome::RetryWithFreshToken {
            self.token_manager.invalidate().await;
            response = self.send_delete(subject).await?;
        }

        match classify_delete(response.status()) {
            DeleteOutcome::Deleted => {
                tracing::info!("Deleted Logto identity {}", subject);
                Ok(())
            }
            DeleteOutcome::AlreadyGone => {
                tracing::info!("Logto identity {} already absent", subject);
                Ok(())
            }
            DeleteOutcome::RetryWithFreshToken | DeleteOutcome::Failed => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!("Logto API error: HTTP {} - {}", status, body);
                Err(AppError::ExternalServiceError(format!(
                    "Identity provider refused deletion: HTTP {}",
                    status
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_delete() {
        assert_eq!(classify_delete(StatusCode::NO_CONTENT), DeleteOutcome::Deleted);
        assert_eq!(classify_delete(StatusCode::OK), DeleteOutcome::Deleted);
        assert_eq!(
            classify_delete(StatusCode::NOT_FOUND),
            DeleteOutcome::AlreadyGone
        );
        assert_eq!(
            classify_delete(StatusCode::UNAUTHORIZED),
            DeleteOutcome::RetryWithFreshToken
        );
        assert_eq!(
            classify_delete(StatusCode::FORBIDDEN),
            DeleteOutcome::Failed
        );
        assert_eq!(
            classify_delete(StatusCode::INTERNAL_SERVER_ERROR),
            DeleteOutcome::Failed
        );
    }
}
