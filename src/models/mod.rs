//! Shared types used across all modules.
//!
//! This module defines the repository identifier, the raw upstream
//! payloads, the extracted signals, the analysis tasks and the stored
//! history record. Other modules import from here rather than reaching
//! into each other's internals.

pub mod raw;
pub mod record;
pub mod repo;
pub mod signals;
pub mod task;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use raw::RawFactsBundle;
pub use record::{AiInsights, AnalysisRecord, RepoRef, ScoreTier, Understanding};
pub use repo::RepoIdentifier;
pub use signals::{CommitConsistency, Signals, Visibility};
pub use task::{Task, TaskPrompt};

/// Supported completion backends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ProviderName {
    /// GitHub Models inference endpoint, authenticated with a GitHub token.
    #[default]
    GithubModels,
    Anthropic,
    #[serde(rename = "openai")]
    #[strum(to_string = "openai")]
    OpenAI,
    Gemini,
    Groq,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    #[strum(to_string = "openai-compatible")]
    OpenAICompatible,
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::GithubModels => crate::constants::ENV_GITHUB_TOKEN_FALLBACK,
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Groq => "GROQ_API_KEY",
        }
    }
}
