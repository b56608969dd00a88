//! Analysis orchestrator: locate, fetch, extract, then fan out insight tasks.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

use crate::gateway::{GatewayError, SourceGateway};
use crate::history::{HistoryError, HistoryStore, SavePayload};
use crate::insight::{self, InsightError, InsightRequestor};
use crate::models::{AiInsights, RepoIdentifier, RepoRef, Signals, Task, Understanding};
use crate::signals::{self, SignalRules};

/// Errors that abort an analysis before any insight is requested.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid GitHub repository URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("failed to encode signals: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A task that produced no output.
#[derive(Debug, Clone, Serialize)]
pub struct FailedTask {
    pub task: Task,
    pub error: String,
}

/// Result of an analysis run, including partial results from failed tasks.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub repo: RepoRef,
    pub signals: Signals,
    /// Successful task outputs, in task order.
    pub outputs: IndexMap<Task, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub understanding: Option<Understanding>,
    pub failed_tasks: Vec<FailedTask>,
    /// Pending background history save, if one was started.
    #[serde(skip)]
    pub history_save: Option<JoinHandle<Result<Uuid, HistoryError>>>,
}

impl AnalysisReport {
    pub fn output(&self, task: Task) -> Option<&str> {
        self.outputs.get(&task).map(String::as_str)
    }

    /// The insights worth persisting: score, summary and roadmap must all
    /// be present. The understanding output is kept as parsed JSON when
    /// it parses and omitted otherwise.
    pub fn ai_insights(&self) -> Option<AiInsights> {
        Some(AiInsights {
            score: self.output(Task::Score)?.to_string(),
            summary: self.output(Task::Summary)?.to_string(),
            roadmap: self.output(Task::Roadmap)?.to_string(),
            understanding: self
                .understanding
                .as_ref()
                .and_then(|u| serde_json::to_value(u).ok()),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.failed_tasks.is_empty()
    }
}

/// Runs the full repository analysis pipeline.
pub struct AnalysisOrchestrator {
    gateway: Arc<dyn SourceGateway>,
    requestor: InsightRequestor,
    rules: SignalRules,
    history: Option<Arc<HistoryStore>>,
}

impl AnalysisOrchestrator {
    pub fn new(gateway: Arc<dyn SourceGateway>, requestor: InsightRequestor, rules: SignalRules) -> Self {
        Self {
            gateway,
            requestor,
            rules,
            history: None,
        }
    }

    /// Persist completed analyses for identified users.
    pub fn with_history(mut self, history: Arc<HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn requestor(&self) -> &InsightRequestor {
        &self.requestor
    }

    /// Locate, fetch and extract without contacting the completion service.
    pub async fn fetch_signals(&self, url: &str) -> Result<(RepoIdentifier, Signals), AnalysisError> {
        let repo = RepoIdentifier::parse_url(url)
            .ok_or_else(|| AnalysisError::InvalidUrl(url.to_string()))?;

        let bundle = self.gateway.fetch(&repo).await.inspect_err(|e| {
            tracing::error!(repo = %repo, error = %e, "failed to fetch repository");
        })?;

        let signals = signals::extract(&bundle, &self.rules);
        tracing::info!(
            repo = %repo,
            files = signals.file_count,
            commits = signals.commit_count,
            language = %signals.primary_language,
            "extracted signals"
        );
        Ok((repo, signals))
    }

    /// Run the whole pipeline for `url`.
    ///
    /// Individual insight failures do not abort the run; they are listed
    /// in [`AnalysisReport::failed_tasks`]. When `identity` is set and the
    /// score, summary and roadmap all succeeded, a history save is started
    /// in the background.
    pub async fn run(&self, url: &str, identity: Option<&str>) -> Result<AnalysisReport, AnalysisError> {
        let (repo, signals) = self.fetch_signals(url).await?;
        let signals_json = Arc::new(serde_json::to_value(&signals)?);

        let mut join_set = JoinSet::new();
        for task in Task::all() {
            let requestor = self.requestor.clone();
            let signals_json = Arc::clone(&signals_json);
            join_set.spawn(async move {
                let result = requestor.request(task, &signals_json).await;
                (task, result)
            });
        }

        let mut results: HashMap<Task, Result<String, InsightError>> = HashMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((task, result)) => {
                    if let Err(ref e) = result {
                        tracing::warn!(%task, error = %e, "insight task failed");
                    }
                    results.insert(task, result);
                }
                Err(e) => tracing::error!(error = %e, "insight task panicked"),
            }
        }

        let mut outputs = IndexMap::new();
        let mut failed_tasks = Vec::new();
        for task in Task::all() {
            match results.remove(&task) {
                Some(Ok(output)) => {
                    outputs.insert(task, output);
                }
                Some(Err(e)) => failed_tasks.push(FailedTask {
                    task,
                    error: e.to_string(),
                }),
                None => failed_tasks.push(FailedTask {
                    task,
                    error: "task aborted".to_string(),
                }),
            }
        }

        let understanding = outputs
            .get(&Task::Understanding)
            .and_then(|text| insight::parse_understanding(text));
        if outputs.contains_key(&Task::Understanding) && understanding.is_none() {
            tracing::debug!("understanding output is not valid JSON");
        }

        let mut report = AnalysisReport {
            repo: RepoRef::from_identifier(&repo, url),
            signals,
            outputs,
            understanding,
            failed_tasks,
            history_save: None,
        };

        report.history_save = self.start_history_save(&report, &signals_json, identity);
        Ok(report)
    }

    fn start_history_save(
        &self,
        report: &AnalysisReport,
        signals_json: &serde_json::Value,
        identity: Option<&str>,
    ) -> Option<JoinHandle<Result<Uuid, HistoryError>>> {
        let history = self.history.as_ref()?;
        let Some(identity) = identity else {
            tracing::debug!("no identity, analysis not saved");
            return None;
        };
        let Some(ai) = report.ai_insights() else {
            tracing::debug!("incomplete insights, analysis not saved");
            return None;
        };

        let payload = SavePayload {
            repo: Some(report.repo.clone()),
            signals: Some(signals_json.clone()),
            ai: Some(ai),
        };
        Some(history.spawn_save(Some(identity.to_string()), payload))
    }
}
