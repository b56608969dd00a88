//! Insight requestor: turns signals plus a task into mentor feedback.
//!
//! Builds the task prompt, makes exactly one completion call through a
//! [`CompletionProvider`], and returns the trimmed text. Unknown task
//! names and non-object signals are rejected before any provider call.

pub mod prompts;

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{Task, Understanding};
use crate::providers::{CompletionProvider, ProviderError};

/// Errors from an insight request.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("unknown analysis task '{0}'")]
    UnknownTask(String),

    #[error("repository signals must be a JSON object")]
    InvalidSignals,

    #[error("completion timed out after {0}s")]
    Timeout(u64),

    #[error("completion failed: {0}")]
    Completion(#[source] ProviderError),
}

impl From<ProviderError> for InsightError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(secs) => InsightError::Timeout(secs),
            other => InsightError::Completion(other),
        }
    }
}

/// Issues one completion per task.
#[derive(Clone)]
pub struct InsightRequestor {
    provider: Arc<dyn CompletionProvider>,
}

impl InsightRequestor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Request `task` for `signals`, returning trimmed output.
    ///
    /// An empty completion is returned as an empty string.
    pub async fn request(
        &self,
        task: Task,
        signals: &serde_json::Value,
    ) -> Result<String, InsightError> {
        if !signals.is_object() {
            return Err(InsightError::InvalidSignals);
        }

        let prompt = prompts::build(task, signals);
        tracing::debug!(%task, "requesting completion");

        let output = self.provider.complete(&prompt).await?;
        let output = output.trim();
        if output.is_empty() {
            tracing::warn!(%task, "completion returned no content");
        }
        Ok(output.to_string())
    }

    /// Like [`request`](Self::request) but takes the wire name of the task.
    pub async fn request_named(
        &self,
        task: &str,
        signals: &serde_json::Value,
    ) -> Result<(Task, String), InsightError> {
        let task: Task = task
            .parse()
            .map_err(|_| InsightError::UnknownTask(task.to_string()))?;
        let output = self.request(task, signals).await?;
        Ok((task, output))
    }
}

/// Regex for extracting content inside markdown code fences.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").unwrap());

/// Parse the `understanding` task output.
///
/// Models sometimes wrap the JSON in a code fence or surround it with
/// prose, so the raw text, the outermost braces and any fenced blocks are
/// tried in turn.
pub fn parse_understanding(text: &str) -> Option<Understanding> {
    extract_json_candidates(text.trim())
        .iter()
        .find_map(|candidate| serde_json::from_str::<Understanding>(candidate).ok())
}

fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = vec![text.to_string()];

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            candidates.push(text[start..=end].to_string());
        }
    }

    for cap in FENCE_RE.captures_iter(text) {
        if let Some(inner) = cap.get(1) {
            let inner = inner.as_str().trim();
            if !inner.is_empty() {
                candidates.push(inner.to_string());
            }
        }
    }

    candidates
}
