//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::AnalysisRecord;
use crate::orchestrator::AnalysisReport;

/// Trait for rendering analysis results to an output format.
pub trait OutputRenderer {
    /// Render a full analysis report.
    fn render(&self, report: &AnalysisReport) -> String;

    /// Render a user's stored analyses, newest first.
    fn render_history(&self, records: &[AnalysisRecord]) -> String;
}
