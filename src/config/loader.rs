//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.gitana.toml` in the working directory
//! 4. `~/.config/gitana/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::ProviderName;
use crate::signals::SignalRules;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub signals: SignalRules,
}

/// GitHub REST API access.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Number of most recent commits requested (single page).
    pub commit_limit: u32,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("commit_limit", &self.commit_limit)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::GITHUB_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
            commit_limit: 100,
        }
    }
}

/// Completion provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f64,
    /// Per-completion timeout.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::GithubModels,
            model: constants::DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Header carrying the user id, set by the authenticating proxy.
    pub identity_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            identity_header: "x-user-id".to_string(),
        }
    }
}

/// Analysis history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// Storage directory; defaults to `~/.config/gitana/history`.
    pub dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl HistoryConfig {
    /// The directory history files live in, if one can be determined.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(|| {
            dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("history"))
        })
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the local config in `workdir`, then
    /// applies environment variable overrides.
    pub fn load(workdir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = workdir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_github = GithubConfig::default();
        if other.github.api_url != default_github.api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }
        if other.github.timeout_secs != default_github.timeout_secs {
            self.github.timeout_secs = other.github.timeout_secs;
        }
        if other.github.commit_limit != default_github.commit_limit {
            self.github.commit_limit = other.github.commit_limit;
        }

        let default_provider = ProviderConfig::default();
        if other.provider.name != default_provider.name {
            self.provider.name = other.provider.name;
        }
        if other.provider.model != default_provider.model {
            self.provider.model = other.provider.model;
        }
        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }
        if other.provider.temperature != default_provider.temperature {
            self.provider.temperature = other.provider.temperature;
        }
        if other.provider.timeout_secs != default_provider.timeout_secs {
            self.provider.timeout_secs = other.provider.timeout_secs;
        }

        let default_server = ServerConfig::default();
        if other.server.bind != default_server.bind {
            self.server.bind = other.server.bind;
        }
        if other.server.identity_header != default_server.identity_header {
            self.server.identity_header = other.server.identity_header;
        }

        // Disabled overrides enabled
        if !other.history.enabled {
            self.history.enabled = false;
        }
        if other.history.dir.is_some() {
            self.history.dir = other.history.dir;
        }

        if other.signals != SignalRules::default() {
            self.signals = other.signals;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.var(constants::ENV_PROVIDER) {
            match val.parse::<ProviderName>() {
                Ok(name) => self.provider.name = name,
                Err(_) => tracing::warn!(
                    variable = constants::ENV_PROVIDER,
                    value = %val,
                    "ignoring unsupported provider"
                ),
            }
        }
        if let Some(val) = env.var(constants::ENV_MODEL) {
            self.provider.model = val;
        }
        if let Some(val) = env.var(constants::ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }

        // Provider-specific API key resolution
        let api_key = env.first_of(&[constants::ENV_API_KEY, self.provider.name.api_key_env_var()]);
        if api_key.is_some() {
            self.provider.api_key = api_key;
        }

        let github_token =
            env.first_of(&[constants::ENV_GITHUB_TOKEN, constants::ENV_GITHUB_TOKEN_FALLBACK]);
        if github_token.is_some() {
            self.github.token = github_token;
        }
        if let Some(val) = env.var(constants::ENV_GITHUB_API) {
            self.github.api_url = val;
        }

        // GitHub Models authenticates with the same token as the REST API.
        if self.provider.name == ProviderName::GithubModels && self.provider.api_key.is_none() {
            self.provider.api_key = self.github.token.clone();
        }

        if let Some(val) = env.var(constants::ENV_BIND) {
            self.server.bind = val;
        }
        if let Some(val) = env.var(constants::ENV_HISTORY_DIR) {
            self.history.dir = Some(PathBuf::from(val));
        }
        if let Some(enabled) = env.flag(constants::ENV_HISTORY) {
            self.history.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.provider.name, ProviderName::GithubModels);
        assert_eq!(config.provider.model, "openai/gpt-4.1");
        assert_eq!(config.provider.temperature, 0.2);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.commit_limit, 100);
        assert_eq!(config.server.identity_header, "x-user-id");
        assert!(config.history.enabled);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[github]
timeout_secs = 5

[provider]
name = "openai"
model = "gpt-4o"
temperature = 0.0

[server]
bind = "0.0.0.0:8080"

[history]
enabled = false

[signals]
lint_markers = ["clippy.toml", "rustfmt.toml"]

[[signals.categories]]
manifest = "Cargo.toml"
category = "rust crate"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.provider.name, ProviderName::OpenAI);
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.temperature, 0.0);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(!config.history.enabled);
        assert_eq!(config.signals.lint_markers, vec!["clippy.toml", "rustfmt.toml"]);
        assert_eq!(config.signals.categories[0].category, "rust crate");
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();

        other.github.api_url = "https://ghe.example.com/api/v3".to_string();
        other.github.token = Some("ghp_test".to_string());
        other.provider.name = ProviderName::Anthropic;
        other.provider.model = "claude-sonnet-4-20250514".to_string();
        other.provider.temperature = 0.5;
        other.server.bind = "0.0.0.0:9000".to_string();
        other.history.enabled = false;
        other.history.dir = Some(PathBuf::from("/var/lib/gitana"));
        other.signals.ci_markers = vec![".gitlab-ci.yml".to_string()];

        base.merge(other);

        assert_eq!(base.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(base.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(base.provider.name, ProviderName::Anthropic);
        assert_eq!(base.provider.model, "claude-sonnet-4-20250514");
        assert_eq!(base.provider.temperature, 0.5);
        assert_eq!(base.server.bind, "0.0.0.0:9000");
        assert!(!base.history.enabled);
        assert_eq!(base.history.dir, Some(PathBuf::from("/var/lib/gitana")));
        assert_eq!(base.signals.ci_markers, vec![".gitlab-ci.yml"]);
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.provider.model = "gpt-4o".to_string();
        base.github.timeout_secs = 3;

        base.merge(Config::default());

        assert_eq!(base.provider.model, "gpt-4o");
        assert_eq!(base.github.timeout_secs, 3);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn load_file_not_found() {
        let err = Config::load_file(Path::new("/tmp/gitana_not_exist_config.toml")).unwrap_err();
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn load_from_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".gitana.toml"),
            "[provider]\nname = \"groq\"\nmodel = \"llama-3.3-70b\"\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert_eq!(config.provider.name, ProviderName::Groq);
        assert_eq!(config.provider.model, "llama-3.3-70b");
    }

    #[test]
    fn github_token_env_fallback_order() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([("GITHUB_TOKEN", "ghp_fallback")]));
        assert_eq!(config.github.token.as_deref(), Some("ghp_fallback"));

        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([
            ("GITHUB_TOKEN", "ghp_fallback"),
            ("GITANA_GITHUB_TOKEN", "ghp_primary"),
        ]));
        assert_eq!(config.github.token.as_deref(), Some("ghp_primary"));
    }

    #[test]
    fn github_models_reuses_github_token() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([("GITANA_GITHUB_TOKEN", "ghp_x")]));
        assert_eq!(config.provider.api_key.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn explicit_api_key_wins_for_other_providers() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([
            ("GITANA_PROVIDER", "anthropic"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("GITHUB_TOKEN", "ghp_y"),
        ]));
        assert_eq!(config.provider.name, ProviderName::Anthropic);
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_y"));
    }

    #[test]
    fn invalid_provider_is_ignored() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([("GITANA_PROVIDER", "not-a-provider")]));
        assert_eq!(config.provider.name, ProviderName::GithubModels);
    }

    #[test]
    fn server_and_history_env_overrides() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([
            ("GITANA_BIND", "0.0.0.0:80"),
            ("GITANA_HISTORY_DIR", "/data/history"),
            ("GITANA_HISTORY", "off"),
            ("GITANA_GITHUB_API", "http://localhost:9999"),
        ]));
        assert_eq!(config.server.bind, "0.0.0.0:80");
        assert_eq!(config.history.dir, Some(PathBuf::from("/data/history")));
        assert!(!config.history.enabled);
        assert_eq!(config.github.api_url, "http://localhost:9999");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = Config::default();
        config.github.token = Some("ghp_secret".into());
        config.provider.api_key = Some("sk-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
