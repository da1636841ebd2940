//! Generative-model provider abstractions and implementations.
//!
//! Trait-based so the relay can swap the real Gemini backend for a mock in
//! tests.

pub mod gemini;
pub mod mock;

use crate::models::ChatTurn;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Stable label for the provider error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Trait for text generation providers (e.g. Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Stateless single-prompt generation.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Chat continuation: send `message` into a session seeded with the
    /// ordered `history` and return the model's reply text.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
