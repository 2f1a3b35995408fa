//! Google Gemini text generation.

mod client;

pub use client::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request to Gemini failed: {0}")]
    Http(String),

    #[error("Gemini quota exhausted")]
    Quota,

    #[error("Gemini blocked the request: {0}")]
    Blocked(String),

    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("Gemini returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode Gemini response: {0}")]
    Decode(String),
}

/// A model that turns a prompt into raw text.
///
/// The recommendation engine depends on this seam rather than on
/// `GeminiClient` directly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;

    fn model_name(&self) -> &str;
}
