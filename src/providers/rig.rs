//! rig-core integration for mentor feedback completions.
//!
//! Uses rig-core's provider clients and Agent abstraction for multi-provider
//! support. Currently supports: GitHub Models, Anthropic, OpenAI, Gemini,
//! Groq, and any OpenAI-compatible API.

use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::config::ProviderConfig;
use crate::constants;
use crate::models::{ProviderName, TaskPrompt};

use super::{CompletionProvider, ProviderError};

/// Maximum tokens per completion response.
///
/// Anthropic rejects requests without it; the mentor outputs are short.
const MAX_TOKENS: u64 = 4096;

/// Build an agent from a rig-core client and prompt it once.
macro_rules! prompt_simple {
    ($client:expr, $model:expr, $temperature:expr, $system:expr, $user:expr, $label:expr) => {{
        let agent = $client
            .agent($model)
            .preamble($system)
            .temperature($temperature)
            .max_tokens(MAX_TOKENS)
            .build();
        agent
            .prompt($user)
            .await
            .map_err(|e| ProviderError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            ProviderError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// rig-core based completion provider.
///
/// Wraps rig-core's multi-provider client system. The provider name
/// in config selects which rig-core provider to use.
pub struct RigProvider {
    config: ProviderConfig,
}

impl RigProvider {
    /// Create a new RigProvider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_none() {
            return Err(ProviderError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {} or {}.",
                config.name,
                constants::ENV_API_KEY,
                config.name.api_key_env_var()
            )));
        }
        Ok(Self { config })
    }

    /// Build an OpenAI-style client against `base_url`.
    fn build_openai_client(
        &self,
        api_key: &str,
        base_url: Option<&str>,
        label: &str,
    ) -> Result<providers::openai::CompletionsClient, ProviderError> {
        let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
        if let Some(base_url) = base_url {
            builder = builder.base_url(base_url);
        }
        builder
            .build()
            .map_err(|e| ProviderError::ApiError(format!("failed to create {label} client: {e}")))
    }

    /// Require `base_url` for OpenAI-compatible providers.
    fn require_base_url(&self) -> Result<&str, ProviderError> {
        self.config.base_url.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            )
        })
    }

    /// Get the API key or return an error.
    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("missing API key".to_string()))
    }

    /// Make a completion call through rig-core and return the raw response text.
    async fn call_rig(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;
        let model = self.config.model.as_str();
        let temperature = self.config.temperature;

        match self.config.name {
            ProviderName::GithubModels => {
                let base_url = self
                    .config
                    .base_url
                    .as_deref()
                    .unwrap_or(constants::GITHUB_MODELS_URL);
                let client = self.build_openai_client(api_key, Some(base_url), "GitHub Models")?;
                prompt_simple!(client, model, temperature, system_prompt, user_prompt, "GitHub Models")
            }
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        ProviderError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_simple!(client, model, temperature, system_prompt, user_prompt, "Anthropic")
            }
            ProviderName::OpenAI => {
                let client =
                    self.build_openai_client(api_key, self.config.base_url.as_deref(), "OpenAI")?;
                prompt_simple!(client, model, temperature, system_prompt, user_prompt, "OpenAI")
            }
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_simple!(client, model, temperature, system_prompt, user_prompt, "Gemini")
            }
            ProviderName::Groq => {
                let client = new_client!(providers::groq::Client, api_key, "Groq")?;
                prompt_simple!(client, model, temperature, system_prompt, user_prompt, "Groq")
            }
            ProviderName::OpenAICompatible => {
                let base_url = self.require_base_url()?;
                let client =
                    self.build_openai_client(api_key, Some(base_url), "OpenAI-compatible")?;
                prompt_simple!(
                    client,
                    model,
                    temperature,
                    system_prompt,
                    user_prompt,
                    "OpenAI-compatible"
                )
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for RigProvider {
    async fn complete(&self, prompt: &TaskPrompt) -> Result<String, ProviderError> {
        let limit = self.config.timeout_secs;
        let call = self.call_rig(&prompt.system, &prompt.user);

        let result = tokio::time::timeout(Duration::from_secs(limit), call)
            .await
            .map_err(|_| ProviderError::Timeout(limit))?;

        if let Err(ref e) = result {
            if let Some(reason) = classify_error(e) {
                tracing::warn!(task = %prompt.task, provider = %self.config.name, reason, "completion failed");
            }
        }
        result
    }
}

/// Classifies a provider error into a short, user-friendly message.
///
/// Returns `Some(message)` for recognisable transient failures, `None`
/// otherwise.
pub fn classify_error(err: &ProviderError) -> Option<&'static str> {
    match err {
        ProviderError::ApiError(msg) => {
            let msg_lower = msg.to_lowercase();
            if msg_lower.contains("429")
                || msg_lower.contains("rate limit")
                || msg_lower.contains("too many requests")
            {
                Some("Rate limited by API")
            } else if msg_lower.contains("503")
                || msg_lower.contains("service unavailable")
                || msg_lower.contains("high demand")
            {
                Some("High model load")
            } else if msg_lower.contains("529") || msg_lower.contains("overloaded") {
                Some("API overloaded")
            } else if msg_lower.contains("502") {
                Some("API gateway error")
            } else if msg_lower.contains("401") || msg_lower.contains("unauthorized") {
                Some("Invalid or missing credentials")
            } else if msg_lower.contains("connection") {
                Some("Connection error")
            } else {
                None
            }
        }
        ProviderError::Timeout(_) => Some("Request timed out"),
        ProviderError::NotConfigured(_) => None,
    }
}
