//! JSON output renderer.
//!
//! Reports serialize as `{"repo", "signals", "outputs", "understanding"?,
//! "failed_tasks"}`; history as `{"history": [...]}`.

use crate::models::AnalysisRecord;
use crate::orchestrator::AnalysisReport;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, report: &AnalysisReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_history(&self, records: &[AnalysisRecord]) -> String {
        let output = serde_json::json!({ "history": records });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::{RawFactsBundle, TreeEntry};
    use crate::models::{RepoIdentifier, RepoRef, Task};
    use crate::orchestrator::FailedTask;
    use crate::signals::{self, SignalRules};
    use indexmap::IndexMap;

    fn report() -> AnalysisReport {
        let mut bundle = RawFactsBundle::default();
        bundle.repo.name = "demo".into();
        bundle.tree.tree = vec![TreeEntry::blob("README.md")];

        let mut outputs = IndexMap::new();
        outputs.insert(Task::Score, "Score: 64 / 100".to_string());
        outputs.insert(Task::Summary, "Decent.".to_string());

        AnalysisReport {
            repo: RepoRef::from_identifier(&RepoIdentifier::new("a", "demo"), "https://github.com/a/demo"),
            signals: signals::extract(&bundle, &SignalRules::default()),
            outputs,
            understanding: None,
            failed_tasks: vec![FailedTask {
                task: Task::Roadmap,
                error: "completion failed".into(),
            }],
            history_save: None,
        }
    }

    #[test]
    fn render_report_json() {
        let output = JsonRenderer.render(&report());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["repo"]["name"], "demo");
        assert_eq!(parsed["signals"]["file_count"], 1);
        assert_eq!(parsed["outputs"]["score"], "Score: 64 / 100");
        assert_eq!(parsed["failed_tasks"][0]["task"], "roadmap");
        assert!(parsed.get("understanding").is_none());
        assert!(parsed.get("history_save").is_none());
    }

    #[test]
    fn render_empty_history_json() {
        let output = JsonRenderer.render_history(&[]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["history"].as_array().unwrap().len(), 0);
    }
}
