//! JSON-lines file store for analysis records.
//!
//! One file per user in the history directory, named by the SHA-256 of
//! the user id so arbitrary identities map to safe file names. Records
//! are appended in creation order.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::AnalysisRecord;

use super::HistoryError;

/// Filesystem-backed record storage.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Append `record` to its owner's file, creating the directory on demand.
    pub fn append(&self, record: &AnalysisRecord) -> Result<(), HistoryError> {
        std::fs::create_dir_all(&self.dir)?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.user_path(&record.user_id))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// All records for `user_id` in append order.
    ///
    /// Lines that fail to parse are skipped with a warning so one damaged
    /// entry does not hide the rest of the history.
    pub fn read_all(&self, user_id: &str) -> Result<Vec<AnalysisRecord>, HistoryError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(std::fs::File::open(&path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AnalysisRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    file = %path.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping malformed history entry"
                ),
            }
        }
        Ok(records)
    }

    /// Return the history directory path.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", user_key(user_id)))
    }
}

/// File stem for a user's history.
pub fn user_key(user_id: &str) -> String {
    hex::encode(Sha256::digest(user_id.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiInsights, RepoRef};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(user: &str, summary: &str) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            repo: RepoRef {
                owner: "o".into(),
                name: "r".into(),
                url: "https://github.com/o/r".into(),
            },
            signals: serde_json::json!({"repo_name": "r"}),
            ai: AiInsights {
                summary: summary.into(),
                ..AiInsights::default()
            },
            score_value: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn user_key_is_sha256_hex() {
        let key = user_key("user_1");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, user_key("user_1"));
        assert_ne!(key, user_key("user_2"));
    }

    #[test]
    fn read_missing_user_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.read_all("nobody").unwrap().is_empty());
    }

    #[test]
    fn append_then_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.append(&record("u", "first")).unwrap();
        store.append(&record("u", "second")).unwrap();

        let all = store.read_all("u").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ai.summary, "first");
        assert_eq!(all[1].ai.summary, "second");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        store.append(&record("u", "kept")).unwrap();

        let path = store.user_path("u");
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        let all = store.read_all("u").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ai.summary, "kept");
    }
}
