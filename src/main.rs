//! gitana — mentor feedback for GitHub repositories.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use gitana::config;
use gitana::constants;
use gitana::env;
use gitana::gateway;
use gitana::history;
use gitana::insight;
use gitana::models;
use gitana::orchestrator;
use gitana::providers;
use gitana::server;
use gitana::signals;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{AnalyzeArgs, Cli, Command, HistoryArgs, ServeArgs, SignalsArgs};
use config::Config;
use env::Env;
use gateway::{GithubGateway, SourceGateway};
use history::HistoryStore;
use insight::InsightRequestor;
use orchestrator::AnalysisOrchestrator;
use providers::{CompletionProvider, RigProvider, UnconfiguredProvider};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `gitana=info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", constants::APP_NAME)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let workdir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to determine working directory")?,
    };
    let config = Config::load(Some(&workdir), &Env::real()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::Serve(args) => run_serve(args, config).await,
        Command::Analyze(args) => run_analyze(args, config).await,
        Command::Signals(args) => run_signals(args, config).await,
        Command::History(args) => run_history(args, config).await,
        Command::Version => run_version(),
    }
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
    Ok(())
}

/// Run the HTTP API until Ctrl-C.
async fn run_serve(args: ServeArgs, config: Config) -> Result<()> {
    let history = history_store(&config);
    if history.is_none() {
        cli::note("history is disabled; /history endpoints will fail");
    }
    // Fetch and history work without completion credentials.
    let provider: Arc<dyn CompletionProvider> = match RigProvider::new(config.provider.clone()) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            cli::warn(&format!("{e} /analyze will fail until one is configured"));
            Arc::new(UnconfiguredProvider::new(e.to_string()))
        }
    };
    let orchestrator = build_orchestrator(&config, provider, None)?;

    let state = Arc::new(server::AppState {
        orchestrator: Arc::new(orchestrator),
        history,
        identity_header: config.server.identity_header.clone(),
    });

    let bind = args.bind.unwrap_or(config.server.bind);
    server::serve(state, &bind)
        .await
        .with_context(|| format!("HTTP server on {bind} failed"))
}

/// Run the full pipeline for one repository and print the report.
async fn run_analyze(args: AnalyzeArgs, config: Config) -> Result<()> {
    let history = if args.no_history {
        None
    } else {
        history_store(&config)
    };
    if args.user.is_some() && history.is_none() && !args.no_history {
        cli::warn("history is disabled; this analysis will not be saved");
    }

    let provider: Arc<dyn CompletionProvider> = Arc::new(
        RigProvider::new(config.provider.clone()).context("failed to set up completion provider")?,
    );
    let orchestrator = build_orchestrator(&config, provider, history)?;
    let mut report = orchestrator
        .run(&args.url, args.user.as_deref())
        .await
        .context("analysis failed")?;

    print!("{}", args.format.render(&report));

    // Detached saves die with the runtime, so wait for it here.
    if let Some(handle) = report.history_save.take() {
        match handle.await {
            Ok(Ok(id)) => cli::note(&format!("saved analysis {id}")),
            Ok(Err(e)) => cli::warn(&format!("failed to save analysis: {e}")),
            Err(e) => cli::warn(&format!("history save task failed: {e}")),
        }
    }

    if !report.is_complete() {
        bail!(
            "{} insight task(s) failed, results are incomplete",
            report.failed_tasks.len()
        );
    }
    Ok(())
}

/// Fetch and extract signals only; no completion calls.
async fn run_signals(args: SignalsArgs, config: Config) -> Result<()> {
    let repo = models::RepoIdentifier::parse_url(&args.url)
        .with_context(|| format!("invalid GitHub repository URL: {}", args.url))?;

    let gateway = GithubGateway::new(config.github.clone())?;
    let bundle = gateway
        .fetch(&repo)
        .await
        .with_context(|| format!("failed to fetch {repo}"))?;

    let signals = signals::extract(&bundle, &config.signals);
    println!("{}", serde_json::to_string_pretty(&signals)?);
    Ok(())
}

/// List a user's saved analyses.
async fn run_history(args: HistoryArgs, config: Config) -> Result<()> {
    let store = history_store(&config).context("history is disabled")?;
    let records = store
        .list(Some(&args.user), args.limit)
        .with_context(|| format!("failed to read history from {}", store.path().display()))?;

    print!("{}", args.format.render_history(&records));
    Ok(())
}

fn history_store(config: &Config) -> Option<Arc<HistoryStore>> {
    if !config.history.enabled {
        return None;
    }
    let dir: PathBuf = config.history.resolved_dir()?;
    Some(Arc::new(HistoryStore::new(dir)))
}

fn build_orchestrator(
    config: &Config,
    provider: Arc<dyn CompletionProvider>,
    history: Option<Arc<HistoryStore>>,
) -> Result<AnalysisOrchestrator> {
    let gateway: Arc<dyn SourceGateway> = Arc::new(
        GithubGateway::new(config.github.clone()).context("failed to set up GitHub client")?,
    );

    let orchestrator = AnalysisOrchestrator::new(
        gateway,
        InsightRequestor::new(provider),
        config.signals.clone(),
    );
    Ok(match history {
        Some(store) => orchestrator.with_history(store),
        None => orchestrator,
    })
}
