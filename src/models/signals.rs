//! The normalized feature object derived from a [`RawFactsBundle`].
//!
//! [`RawFactsBundle`]: super::raw::RawFactsBundle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Repository visibility as reported by the metadata payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Three-tier label for how steadily commits arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitConsistency {
    Irregular,
    Moderate,
    Consistent,
}

impl CommitConsistency {
    /// Classify an average commits-per-bucket value.
    ///
    /// Boundaries fall into the lower tier: exactly 3 is moderate,
    /// exactly 1 is irregular.
    pub fn from_average(avg: f64) -> Self {
        if avg > 3.0 {
            CommitConsistency::Consistent
        } else if avg > 1.0 {
            CommitConsistency::Moderate
        } else {
            CommitConsistency::Irregular
        }
    }
}

impl fmt::Display for CommitConsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitConsistency::Irregular => write!(f, "irregular"),
            CommitConsistency::Moderate => write!(f, "moderate"),
            CommitConsistency::Consistent => write!(f, "consistent"),
        }
    }
}

/// Fixed-schema repository features fed to the prompt templates.
///
/// Field names are part of the wire format (HTTP responses, stored
/// history, prompt JSON) and must stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub repo_name: String,
    pub visibility: Visibility,

    pub primary_language: String,
    pub languages_used: Vec<String>,

    pub file_count: usize,
    pub folder_depth: usize,

    pub has_src_folder: bool,
    pub has_tests_folder: bool,
    pub has_docs_folder: bool,

    pub readme_present: bool,
    pub readme_word_count: usize,
    pub readme_has_setup: bool,

    pub linting_configured: bool,
    pub ci_pipeline_present: bool,

    pub commit_count: usize,
    pub avg_commits_per_week: f64,
    pub commit_consistency: CommitConsistency,

    pub project_category: String,

    /// Per-bucket commit counts, oldest bucket first (best effort).
    pub weekly_commits: Vec<u32>,
}
