use crate::core::config::LogtoM2MConfig;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Usable if it stays valid for at least `margin` longer
    fn is_fresh(&self, now: Instant, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

/// Client-credentials tokens for the Logto Management API, cached until
/// shortly before they expire.
pub struct LogtoTokenManager {
    config: LogtoM2MConfig,
    client: reqwest::Client,
    cache: RwLock<Option<CachedToken>>,
    refresh_margin: Duration,
}

impl LogtoTokenManager {
    pub fn new(config: LogtoM2MConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
            refresh_margin: Duration::from_secs(60),
        }
    }

    pub async fn get_access_token(&self) -> Result<String, TokenError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh(Instant::now(), self.refresh_margin) {
                return Ok(cached.access_token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while this one waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(Instant::now(), self.refresh_margin) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token, e.g. after the API answered 401
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn fetch_token(&self) -> Result<CachedToken, TokenError> {
        tracing::debug!("Fetching Logto M2M token from {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("scope", &self.config.scope),
                ("resource", &self.config.resource),
            ])
            .send()
            .await
            .map_err(|e| TokenError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::FetchError(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched Logto M2M token, expires in {} seconds",
            token.expires_in
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to fetch token: {0}")]
    FetchError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_freshness_respects_margin() {
        let now = Instant::now();
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: now + Duration::from_secs(120),
        };

        assert!(token.is_fresh(now, Duration::from_secs(60)));
        assert!(!token.is_fresh(now + Duration::from_secs(61), Duration::from_secs(60)));
        assert!(!token.is_fresh(now, Duration::from_secs(120)));
    }
}
