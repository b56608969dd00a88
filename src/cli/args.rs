//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use gitana::models::AnalysisRecord;
use gitana::orchestrator::AnalysisReport;

/// Mentor feedback for GitHub repositories.
#[derive(Parser, Debug)]
#[command(name = "gitana", version = gitana::constants::VERSION, about)]
pub struct Cli {
    /// Directory to look for `.gitana.toml` in (default: current directory).
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),

    /// Analyze a repository and print mentor feedback.
    Analyze(AnalyzeArgs),

    /// Fetch a repository and print its signals as JSON.
    Signals(SignalsArgs),

    /// List saved analyses for a user.
    History(HistoryArgs),

    /// Print version information.
    Version,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config and GITANA_BIND).
    #[arg(long)]
    pub bind: Option<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    pub url: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Save the analysis to this user's history.
    #[arg(long, env = "GITANA_USER")]
    pub user: Option<String>,

    /// Do not save the analysis even when a user is given.
    #[arg(long, default_value_t = false)]
    pub no_history: bool,
}

/// Arguments for the `signals` subcommand.
#[derive(Parser, Debug)]
pub struct SignalsArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    pub url: String,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// User whose history to list.
    #[arg(long, env = "GITANA_USER")]
    pub user: String,

    /// Maximum number of records.
    #[arg(long, default_value_t = gitana::constants::HISTORY_LIST_LIMIT)]
    pub limit: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    fn renderer(&self) -> Box<dyn gitana::output::OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(gitana::output::terminal::TerminalRenderer),
            OutputFormat::Json => Box::new(gitana::output::json::JsonRenderer),
        }
    }

    /// Render a report using the renderer for this format.
    pub fn render(&self, report: &AnalysisReport) -> String {
        self.renderer().render(report)
    }

    /// Render history records using the renderer for this format.
    pub fn render_history(&self, records: &[AnalysisRecord]) -> String {
        self.renderer().render_history(records)
    }
}
