//! Stored analysis records and the insight payload they carry.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::RepoIdentifier;

/// Repository reference as stored in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl RepoRef {
    pub fn from_identifier(id: &RepoIdentifier, url: &str) -> Self {
        Self {
            owner: id.owner.clone(),
            name: id.name.clone(),
            url: url.to_string(),
        }
    }
}

/// Model outputs kept with a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub score: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roadmap: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub understanding: Option<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One completed analysis, owned by a single user. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub user_id: String,
    pub repo: RepoRef,
    pub signals: serde_json::Value,
    pub ai: AiInsights,
    /// Numeric score parsed from `ai.score`, if it contained digits.
    pub score_value: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Structured output of the `understanding` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Understanding {
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub maturity_level: String,
    #[serde(default)]
    pub production_ready: bool,
    #[serde(default)]
    pub short_reason: String,
}

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Pull the first run of ASCII digits out of score text.
///
/// `"Score: 87 / 100"` yields `Some(87)`; text without digits yields
/// `None`. A run too large for `u64` saturates.
pub fn extract_score_value(text: &str) -> Option<u64> {
    DIGITS_RE
        .find(text)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
}

/// Display band for a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreTier {
    pub fn from_score(score: u64) -> Self {
        match score {
            90.. => ScoreTier::Excellent,
            70..=89 => ScoreTier::Good,
            50..=69 => ScoreTier::Fair,
            _ => ScoreTier::NeedsWork,
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::Excellent => write!(f, "excellent"),
            ScoreTier::Good => write!(f, "good"),
            ScoreTier::Fair => write!(f, "fair"),
            ScoreTier::NeedsWork => write!(f, "needs work"),
        }
    }
}
