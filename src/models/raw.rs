//! Raw GitHub API payloads aggregated for a single analysis.
//!
//! Only the fields the signal extractor reads are modelled; everything
//! else in the upstream responses is ignored during deserialization.
//! Optional fields default to neutral values so odd-but-present data
//! never fails extraction.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything fetched for one repository, in upstream shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFactsBundle {
    pub repo: RepoMetadata,
    /// Language → byte count, in the order the API returned them.
    #[serde(default)]
    pub languages: IndexMap<String, u64>,
    #[serde(default)]
    pub commits: Vec<CommitItem>,
    #[serde(default)]
    pub tree: GitTree,
    #[serde(default)]
    pub readme: Option<ReadmeContent>,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitTree {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// Set by GitHub when the listing exceeded its size limit.
    #[serde(default)]
    pub truncated: bool,
}

/// A single entry in a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
        }
    }
}

/// The `type` discriminator of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file.
    Blob,
    /// A folder.
    Tree,
    /// A submodule pointer.
    Commit,
    #[serde(other)]
    Other,
}

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitItem {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub commit: CommitDetail,
}

impl CommitItem {
    /// A commit authored at `date`, for fixtures and stubs.
    pub fn authored_at(date: DateTime<Utc>) -> Self {
        Self {
            sha: String::new(),
            commit: CommitDetail {
                author: Some(CommitAuthor {
                    name: None,
                    date: Some(date),
                }),
                message: String::new(),
            },
        }
    }

    /// The author date, if the payload carried a parseable one.
    pub fn author_date(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
}

/// Accept RFC 3339 dates; anything else (or `null`) becomes `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }))
}

/// `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadmeContent {
    /// Base64 payload, usually wrapped at 60 columns.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn languages_keep_upstream_order() {
        let json = r#"{"repo":{"name":"x"},"languages":{"TypeScript":10,"CSS":9000,"HTML":5}}"#;
        let bundle: RawFactsBundle = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = bundle.languages.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["TypeScript", "CSS", "HTML"]);
    }

    #[test]
    fn unknown_tree_types_are_tolerated() {
        let json = r#"{"tree":[
            {"path":"a","type":"tree","sha":"1"},
            {"path":"a/b.rs","type":"blob","size":3},
            {"path":"vendor/lib","type":"commit"},
            {"path":"weird","type":"symlink"}
        ],"truncated":false}"#;
        let tree: GitTree = serde_json::from_str(json).unwrap();
        let kinds: Vec<_> = tree.tree.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Tree, EntryKind::Blob, EntryKind::Commit, EntryKind::Other]
        );
    }

    #[test]
    fn commit_with_bad_or_missing_date() {
        let json = r#"[
            {"sha":"a","commit":{"author":{"name":"x","date":"2024-03-09T10:00:00Z"}}},
            {"sha":"b","commit":{"author":{"name":"x","date":"not a date"}}},
            {"sha":"c","commit":{"author":null}},
            {"sha":"d","commit":{}}
        ]"#;
        let commits: Vec<CommitItem> = serde_json::from_str(json).unwrap();
        assert!(commits[0].author_date().is_some());
        assert!(commits[1].author_date().is_none());
        assert!(commits[2].author_date().is_none());
        assert!(commits[3].author_date().is_none());
    }

    #[test]
    fn metadata_defaults() {
        let meta: RepoMetadata = serde_json::from_str(r#"{"name":"demo"}"#).unwrap();
        assert_eq!(meta.name, "demo");
        assert!(!meta.private);
        assert_eq!(meta.default_branch, "main");
    }
}
