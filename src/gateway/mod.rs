//! Source gateway: fetches raw repository facts from the hosting API.
//!
//! The [`SourceGateway`] trait decouples the analysis pipeline from
//! GitHub so tests can feed canned bundles.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{RawFactsBundle, RepoIdentifier};

pub use github::GithubGateway;

/// Errors from the source gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("GitHub API request failed for {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("GitHub API request timed out for {path}")]
    Timeout { path: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Retrieves the raw facts needed for signal extraction.
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// Fetch metadata, languages, recent commits, the recursive tree and
    /// the README for `repo`.
    ///
    /// Any failure on a mandatory resource aborts the whole fetch. The
    /// README is optional and its absence is reported as `None`.
    async fn fetch(&self, repo: &RepoIdentifier) -> Result<RawFactsBundle, GatewayError>;
}
