//! CompletionProvider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core so the insight requestor
//! and the analysis pipeline never depend on a specific LLM library.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaskPrompt;

pub use self::rig::RigProvider;

/// Errors from the completion provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
}

/// Trait for a single-shot chat completion.
///
/// One call per prompt, no retries. Implementations return the raw
/// response text; trimming and interpretation belong to the caller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &TaskPrompt) -> Result<String, ProviderError>;
}

/// Stands in for a provider whose credentials are missing; every call
/// fails with [`ProviderError::NotConfigured`].
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
    async fn complete(&self, _prompt: &TaskPrompt) -> Result<String, ProviderError> {
        Err(ProviderError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[tokio::test]
    async fn unconfigured_provider_always_fails() {
        let provider = UnconfiguredProvider::new("no API key");
        let prompt = TaskPrompt {
            task: Task::Score,
            system: "s".into(),
            user: "u".into(),
        };
        let err = provider.complete(&prompt).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(ref r) if r == "no API key"));
    }
}
