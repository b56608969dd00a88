//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and upstream URLs so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "gitana";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent to the GitHub API (which rejects requests without one).
pub const USER_AGENT: &str = concat!("gitana/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.gitana.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".gitana.toml";

/// Directory name under `~/.config/` for global config and history.
pub const CONFIG_DIR: &str = "gitana";

/// Default GitHub REST API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Prefix the repository locator strips from user-supplied URLs.
pub const GITHUB_WEB_PREFIX: &str = "https://github.com/";

/// GitHub Models inference endpoint (OpenAI-compatible).
pub const GITHUB_MODELS_URL: &str = "https://models.github.ai/inference";

/// Default completion model served by GitHub Models.
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1";

/// Maximum number of history records returned by the list endpoint.
pub const HISTORY_LIST_LIMIT: usize = 20;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "GITANA_PROVIDER";
pub const ENV_MODEL: &str = "GITANA_MODEL";
pub const ENV_API_KEY: &str = "GITANA_API_KEY";
pub const ENV_BASE_URL: &str = "GITANA_BASE_URL";
pub const ENV_GITHUB_TOKEN: &str = "GITANA_GITHUB_TOKEN";
pub const ENV_GITHUB_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API: &str = "GITANA_GITHUB_API";
pub const ENV_BIND: &str = "GITANA_BIND";
pub const ENV_HISTORY_DIR: &str = "GITANA_HISTORY_DIR";
pub const ENV_HISTORY: &str = "GITANA_HISTORY";
