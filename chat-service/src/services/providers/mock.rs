//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use crate::models::ChatTurn;
use async_trait::async_trait;
use std::sync::Mutex;

/// Scripted text provider for tests: fixed replies, an optional failure
/// mode, and a record of the chat calls it received.
pub struct MockTextProvider {
    generate_reply: String,
    chat_reply: String,
    fail: bool,
    chat_calls: Mutex<Vec<(Vec<ChatTurn>, String)>>,
}

impl MockTextProvider {
    /// A healthy provider that finds no grammar errors.
    pub fn new() -> Self {
        Self {
            generate_reply: "NO".to_string(),
            chat_reply: "Mock reply".to_string(),
            fail: false,
            chat_calls: Mutex::new(Vec::new()),
        }
    }

    /// A healthy provider with scripted replies: `generate_reply` for the
    /// stateless call, `chat_reply` for the chat continuation.
    pub fn with_replies(
        generate_reply: impl Into<String>,
        chat_reply: impl Into<String>,
    ) -> Self {
        Self {
            generate_reply: generate_reply.into(),
            chat_reply: chat_reply.into(),
            ..Self::new()
        }
    }

    /// A provider whose every operation fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Chat calls observed so far, as (history, message) pairs.
    pub fn chat_calls(&self) -> Vec<(Vec<ChatTurn>, String)> {
        self.chat_calls.lock().unwrap().clone()
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        if self.fail {
            return Err(ProviderError::ApiError(
                "Mock provider failure".to_string(),
            ));
        }

        Ok(self.generate_reply.clone())
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, ProviderError> {
        if self.fail {
            return Err(ProviderError::ApiError(
                "Mock provider failure".to_string(),
            ));
        }

        self.chat_calls
            .lock()
            .unwrap()
            .push((history.to_vec(), message.to_string()));

        Ok(self.chat_reply.clone())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.fail {
            Err(ProviderError::ApiError(
                "Mock provider failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
