use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// Only RSA members are modelled; other key types are skipped
#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

fn rsa_keys(jwks: JwksResponse) -> HashMap<String, DecodingKey> {
    jwks.keys
        .into_iter()
        .filter(|jwk| jwk.kty == "RSA")
        .filter_map(|jwk| {
            let (n, e) = (jwk.n.as_deref()?, jwk.e.as_deref()?);
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => Some((jwk.kid, key)),
                Err(err) => {
                    tracing::warn!("Skipping unusable JWK {}: {}", jwk.kid, err);
                    None
                }
            }
        })
        .collect()
}

/// Fetches and caches the issuer's signing keys
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: RwLock<Option<JwksCache>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(issuer_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: format!("{}/jwks", issuer_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
            cache_ttl,
        }
    }

    /// Key for `kid`. An unknown kid triggers one refetch, which also picks
    /// up rotated keys before the TTL runs out.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        let keys = self.fetch_keys().await?;
        let key = keys.get(kid).cloned();

        *self.cache.write().await = Some(JwksCache {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, DecodingKey>, JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "HTTP {} from {}",
                response.status(),
                self.jwks_url
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let keys = rsa_keys(jwks);
        tracing::debug!("Fetched {} RSA signing keys", keys.len());
        Ok(keys)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsa_keys_skips_other_key_types() {
        let jwks: JwksResponse = serde_json::from_str(
            r#"{"keys": [
                {"kid": "rsa-1", "kty": "RSA", "alg": "RS256", "n": "AQAB", "e": "AQAB"},
                {"kid": "ec-1", "kty": "EC", "crv": "P-256", "x": "AQAB", "y": "AQAB"},
                {"kid": "rsa-incomplete", "kty": "RSA", "e": "AQAB"}
            ]}"#,
        )
        .unwrap();

        let keys = rsa_keys(jwks);

        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("rsa-1"));
    }

    #[test]
    fn test_jwks_url_from_issuer() {
        let client = JwksClient::new("https://auth.example.com/oidc/", Duration::from_secs(60));
        assert_eq!(client.jwks_url, "https://auth.example.com/oidc/jwks");
    }
}
