use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;

/// Top-level configuration for flotilla.
#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory scanned for repository clones.
    /// Defaults to the current directory; `FLOTILLA_ROOT` overrides it.
    #[serde(default)]
    pub repos_root: Option<String>,

    /// HTTPS proxy merged into the environment of every git invocation
    /// (and used by the API client).
    #[serde(default)]
    pub proxy: Option<String>,

    /// GitLab API settings.
    #[serde(default)]
    pub gitlab: GitLabConfig,
}

/// GitLab API configuration.
#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitLabConfig {
    /// Base URL of the GitLab instance (e.g. "https://gitlab.example.com").
    #[serde(default)]
    pub url: Option<String>,

    /// Private token. The `GITLAB_TOKEN` environment variable overrides it.
    #[serde(default)]
    pub token: Option<String>,

    /// Group whose members the `members` command lists.
    #[serde(default)]
    pub group: Option<String>,
}

impl GitLabConfig {
    /// Token with the environment override applied.
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var("GITLAB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Load configuration from ~/.config/flotilla/config.ya?ml.
/// Returns Config::default() if no config file exists.
pub fn load_config() -> anyhow::Result<Config> {
    let Some(dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("flotilla"))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

/// Resolve the fleet scan root.
///
/// Priority: config value (tilde-expanded), `FLOTILLA_ROOT`, current
/// directory.
pub fn resolve_repos_root(config_value: Option<&str>) -> std::io::Result<PathBuf> {
    if let Some(path) = config_value {
        return Ok(expand_tilde(path));
    }

    if let Some(val) = std::env::var_os("FLOTILLA_ROOT")
        && !val.is_empty()
    {
        return Ok(expand_tilde(&val.to_string_lossy()));
    }

    std::env::current_dir()
}

/// Expand a `~` prefix to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
