//! Per-user analysis history.
//!
//! Records are immutable once saved; there is no update or delete.
//! Writes go through a process-wide lock so concurrent saves for the
//! same user never interleave lines.

pub mod store;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::record::extract_score_value;
use crate::models::{AiInsights, AnalysisRecord, RepoRef};

/// Errors from the history store.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid payload: missing {0}")]
    InvalidPayload(&'static str),

    #[error("history storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("background save task failed: {0}")]
    Join(String),
}

/// What a caller submits to be saved. Every part is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePayload {
    #[serde(default)]
    pub repo: Option<RepoRef>,
    #[serde(default)]
    pub signals: Option<serde_json::Value>,
    #[serde(default)]
    pub ai: Option<AiInsights>,
}

/// Saves and lists analysis records.
pub struct HistoryStore {
    store: store::FileStore,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            store: store::FileStore::new(dir),
            write_lock: Mutex::new(()),
        }
    }

    /// Validate and persist a record, returning its new id.
    pub fn save(&self, identity: Option<&str>, payload: SavePayload) -> Result<Uuid, HistoryError> {
        let user_id = require_identity(identity)?;

        let repo = payload.repo.ok_or(HistoryError::InvalidPayload("repo"))?;
        let signals = payload
            .signals
            .filter(|s| !s.is_null())
            .ok_or(HistoryError::InvalidPayload("signals"))?;
        let ai = payload.ai.ok_or(HistoryError::InvalidPayload("ai"))?;

        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            repo,
            signals,
            score_value: extract_score_value(&ai.score),
            ai,
            created_at: Utc::now(),
        };

        {
            let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
            self.store.append(&record)?;
        }

        tracing::info!(id = %record.id, repo = %record.repo.name, "saved analysis");
        Ok(record.id)
    }

    /// The `limit` most recent records for `identity`, newest first.
    pub fn list(&self, identity: Option<&str>, limit: usize) -> Result<Vec<AnalysisRecord>, HistoryError> {
        let user_id = require_identity(identity)?;
        let mut records = self.store.read_all(user_id)?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Save on a blocking worker without waiting for the result.
    ///
    /// The returned handle may be dropped; failures are logged either way.
    pub fn spawn_save(
        self: &Arc<Self>,
        identity: Option<String>,
        payload: SavePayload,
    ) -> JoinHandle<Result<Uuid, HistoryError>> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let result = this.save(identity.as_deref(), payload);
            match &result {
                Err(HistoryError::Unauthorized) => {
                    tracing::debug!("skipping history save without identity")
                }
                Err(e) => tracing::warn!(error = %e, "background history save failed"),
                Ok(_) => {}
            }
            result
        })
    }

    /// Return the history directory path.
    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

fn require_identity(identity: Option<&str>) -> Result<&str, HistoryError> {
    identity
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(HistoryError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(score: &str) -> SavePayload {
        SavePayload {
            repo: Some(RepoRef {
                owner: "alice".into(),
                name: "todo".into(),
                url: "https://github.com/alice/todo".into(),
            }),
            signals: Some(json!({"repo_name": "todo", "file_count": 12})),
            ai: Some(AiInsights {
                score: score.into(),
                summary: "Solid start.".into(),
                roadmap: "- add tests".into(),
                understanding: None,
            }),
        }
    }

    fn store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn save_requires_identity() {
        let (_dir, store) = store();
        assert!(matches!(
            store.save(None, payload("Score: 1 / 100")),
            Err(HistoryError::Unauthorized)
        ));
        assert!(matches!(
            store.save(Some("  "), payload("Score: 1 / 100")),
            Err(HistoryError::Unauthorized)
        ));
    }

    #[test]
    fn save_requires_every_part() {
        let (_dir, store) = store();

        let mut p = payload("x");
        p.repo = None;
        assert!(matches!(store.save(Some("u"), p), Err(HistoryError::InvalidPayload("repo"))));

        let mut p = payload("x");
        p.signals = Some(serde_json::Value::Null);
        assert!(matches!(
            store.save(Some("u"), p),
            Err(HistoryError::InvalidPayload("signals"))
        ));

        let mut p = payload("x");
        p.ai = None;
        assert!(matches!(store.save(Some("u"), p), Err(HistoryError::InvalidPayload("ai"))));
    }

    #[test]
    fn stored_signals_keep_key_order() {
        let (_dir, store) = store();
        let mut p = payload("Score: 50 / 100");
        p.signals = Some(json!({"repo_name": "todo", "visibility": "public", "commit_count": 3}));
        store.save(Some("u"), p).unwrap();

        let records = store.list(Some("u"), 20).unwrap();
        let keys: Vec<&str> = records[0]
            .signals
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["repo_name", "visibility", "commit_count"]);
    }

    #[test]
    fn save_extracts_score_value() {
        let (_dir, store) = store();
        store.save(Some("u"), payload("Score: 73 / 100")).unwrap();
        store.save(Some("u"), payload("no number here")).unwrap();

        let records = store.list(Some("u"), 20).unwrap();
        assert_eq!(records[0].score_value, None);
        assert_eq!(records[1].score_value, Some(73));
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let (_dir, store) = store();
        let ids: Vec<Uuid> = (0..5)
            .map(|i| store.save(Some("u"), payload(&format!("Score: {i} / 100"))).unwrap())
            .collect();

        let records = store.list(Some("u"), 3).unwrap();
        let listed: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![ids[4], ids[3], ids[2]]);
        assert!(records[0].created_at >= records[1].created_at);
    }

    #[test]
    fn list_is_scoped_per_user() {
        let (_dir, store) = store();
        store.save(Some("alice"), payload("Score: 10 / 100")).unwrap();
        store.save(Some("bob"), payload("Score: 20 / 100")).unwrap();

        let alice = store.list(Some("alice"), 20).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].user_id, "alice");
        assert!(store.list(Some("carol"), 20).unwrap().is_empty());
        assert!(matches!(store.list(None, 20), Err(HistoryError::Unauthorized)));
    }

    #[tokio::test]
    async fn spawn_save_completes_in_background() {
        let (_dir, store) = store();
        let store = Arc::new(store);

        let id = store
            .spawn_save(Some("u".into()), payload("Score: 55 / 100"))
            .await
            .unwrap()
            .unwrap();

        let records = store.list(Some("u"), 20).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
    }

    #[tokio::test]
    async fn spawn_save_reports_missing_identity() {
        let (_dir, store) = store();
        let store = Arc::new(store);
        let result = store.spawn_save(None, payload("x")).await.unwrap();
        assert!(matches!(result, Err(HistoryError::Unauthorized)));
    }
}
