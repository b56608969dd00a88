//! GitHub REST API implementation of [`SourceGateway`].
//!
//! Issues five authenticated GETs per repository. Metadata, languages,
//! commits and the README are requested concurrently; the tree request
//! needs the default branch from the metadata and follows it. There are
//! no retries: the first failing mandatory call aborts the fetch.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::config::GithubConfig;
use crate::models::raw::{CommitItem, GitTree, ReadmeContent, RepoMetadata};
use crate::models::{RawFactsBundle, RepoIdentifier};

use super::{GatewayError, SourceGateway};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Fetches repository facts from the GitHub REST API.
pub struct GithubGateway {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubGateway {
    /// Create a gateway with its own HTTP client.
    ///
    /// Every request made through it is bounded by `config.timeout_secs`.
    pub fn new(config: GithubConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// GET `path` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let mut request = self
            .client
            .get(self.url(path))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, crate::constants::USER_AGENT);
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Fetch {
                path: path.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        response.json::<T>().await.map_err(|e| transport_error(path, e))
    }

    /// The README is optional: any failure is logged and becomes `None`.
    async fn fetch_readme(&self, base: &str) -> Option<ReadmeContent> {
        let path = format!("{base}/readme");
        match self.get_json::<ReadmeContent>(&path).await {
            Ok(readme) => Some(readme),
            Err(e) => {
                tracing::debug!(error = %e, "no README available");
                None
            }
        }
    }
}

fn transport_error(path: &str, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            path: path.to_string(),
        }
    } else {
        GatewayError::Fetch {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl SourceGateway for GithubGateway {
    async fn fetch(&self, repo: &RepoIdentifier) -> Result<RawFactsBundle, GatewayError> {
        let base = format!("/repos/{}/{}", repo.owner, repo.name);
        let languages_path = format!("{base}/languages");
        let commits_path = format!("{base}/commits?per_page={}", self.config.commit_limit);

        let (meta, languages, commits, readme) = tokio::try_join!(
            self.get_json::<RepoMetadata>(&base),
            self.get_json::<IndexMap<String, u64>>(&languages_path),
            self.get_json::<Vec<CommitItem>>(&commits_path),
            async { Ok::<_, GatewayError>(self.fetch_readme(&base).await) },
        )?;

        let tree_path = format!("{base}/git/trees/{}?recursive=1", meta.default_branch);
        let tree = self.get_json::<GitTree>(&tree_path).await?;
        if tree.truncated {
            tracing::warn!(repo = %repo, entries = tree.tree.len(), "GitHub truncated the tree listing");
        }

        tracing::debug!(
            repo = %repo,
            languages = languages.len(),
            commits = commits.len(),
            entries = tree.tree.len(),
            readme = readme.is_some(),
            "fetched repository facts"
        );

        Ok(RawFactsBundle {
            repo: meta,
            languages,
            commits,
            tree,
            readme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(api_url: &str) -> GithubGateway {
        GithubGateway::new(GithubConfig {
            api_url: api_url.to_string(),
            ..GithubConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            gateway("https://api.github.com/").url("/repos/a/b"),
            "https://api.github.com/repos/a/b"
        );
        assert_eq!(
            gateway("http://127.0.0.1:9000").url("/repos/a/b/readme"),
            "http://127.0.0.1:9000/repos/a/b/readme"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let gw = gateway("http://127.0.0.1:9");
        let err = gw.fetch(&RepoIdentifier::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Fetch { .. } | GatewayError::Timeout { .. }));
    }
}
