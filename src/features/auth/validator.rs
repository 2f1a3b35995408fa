use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;
use crate::core::error::AppError;

/// Identity asserted by a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub sub: String,
    /// Only present when the issuer adds an email claim to access tokens
    pub email: Option<String>,
    /// `email_verified` claim; absent counts as unverified
    pub email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

impl Claims {
    fn into_verified(self) -> Result<VerifiedToken, AppError> {
        if let Some(kind) = &self.kind {
            if kind != "AccessToken" {
                return Err(AppError::Auth("Token is not an access token".to_string()));
            }
        }
        if self.sub.trim().is_empty() {
            return Err(AppError::Auth("Token has an empty subject".to_string()));
        }

        Ok(VerifiedToken {
            sub: self.sub,
            email: self
                .email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
            email_verified: self.email_verified.unwrap_or(false),
        })
    }
}

/// RS256 bearer-token verification against the issuer's JWKS
pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<VerifiedToken, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims
            .into_verified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: &str) -> Claims {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_access_token_claims_accepted() {
        let verified = claims(r#"{"sub": "u_1", "kind": "AccessToken", "email": " Camat@Pacitan.go.id "}"#)
            .into_verified()
            .unwrap();
        assert_eq!(verified.sub, "u_1");
        assert_eq!(verified.email.as_deref(), Some("camat@pacitan.go.id"));
        assert!(!verified.email_verified);
    }

    #[test]
    fn test_email_verified_claim_is_read() {
        let verified = claims(
            r#"{"sub": "u_4", "email": "bupati@pacitankab.go.id", "email_verified": true}"#,
        )
        .into_verified()
        .unwrap();
        assert!(verified.email_verified);
    }

    #[test]
    fn test_kind_is_optional() {
        let verified = claims(r#"{"sub": "u_2"}"#).into_verified().unwrap();
        assert_eq!(verified.email, None);
    }

    #[test]
    fn test_id_tokens_rejected() {
        assert!(claims(r#"{"sub": "u_3", "kind": "IdToken"}"#)
            .into_verified()
            .is_err());
    }

    #[test]
    fn test_blank_subject_rejected() {
        assert!(claims(r#"{"sub": "  "}"#).into_verified().is_err());
    }
}
