//! Repository identifiers and the URL locator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::GITHUB_WEB_PREFIX;

/// An `(owner, name)` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoIdentifier {
    pub owner: String,
    pub name: String,
}

impl RepoIdentifier {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a `https://github.com/{owner}/{repo}` URL.
    ///
    /// The host prefix and one trailing slash are stripped, then the first
    /// two `/`-separated segments become owner and name. Segments past the
    /// second are ignored. Returns `None` when either segment is missing or
    /// empty; callers report that as a validation failure.
    pub fn parse_url(url: &str) -> Option<Self> {
        let clean = url.replacen(GITHUB_WEB_PREFIX, "", 1);
        let clean = clean.strip_suffix('/').unwrap_or(&clean);

        let mut parts = clean.split('/');
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;
        Some(Self::new(owner, name))
    }

    /// The canonical web URL for this repository.
    pub fn web_url(&self) -> String {
        format!("{GITHUB_WEB_PREFIX}{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
