//! Configuration file support for gh-archiver.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `GH_ARCHIVER_`, sections split by
//!    a double underscore, e.g. `GH_ARCHIVER_ARCHIVE__MAX_IN_FLIGHT`)
//! 3. Config file (./gh-archiver.toml, then ~/.config/gh-archiver/config.toml)
//! 4. Built-in defaults
//!
//! When no token is configured anywhere, `GITHUB_TOKEN` is consulted at
//! validation time.
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use GH_ARCHIVER_GITHUB__TOKEN / GITHUB_TOKEN
//! api_url = "https://api.github.com"
//!
//! [filter]
//! compare = ["updatedAt"]
//! type = ["public"]
//!
//! [archive]
//! max_in_flight = 0  # 0 sends every request at once
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

const APP_NAME: &str = "gh-archiver";
const LOCAL_CONFIG_FILE: &str = "gh-archiver.toml";
const ENV_PREFIX: &str = "GH_ARCHIVER";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub connection.
    pub github: GitHubConfig,
    /// Default filter criteria for the interactive profile.
    pub filter: FilterDefaults,
    /// Archive phase tuning.
    pub archive: ArchiveConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token.
    pub token: Option<String>,
    /// REST API root, for GitHub Enterprise.
    pub api_url: Option<String>,
}

/// Filter defaults applied when the corresponding flags are absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub compare: Vec<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
}

/// Archive phase configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Maximum simultaneous archive requests; 0 means unbounded.
    pub max_in_flight: usize,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/gh-archiver/config.toml)
    /// 3. Local config file (./gh-archiver.toml)
    /// 4. Environment variables with GH_ARCHIVER_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            tracing::debug!("Loading config from ./{}", LOCAL_CONFIG_FILE);
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(environment_source());

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token, if configured.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|t| !t.is_empty())
    }

    /// Get the GitHub API root.
    pub fn github_api_url(&self) -> String {
        self.github
            .api_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| archiver::github::DEFAULT_API_URL.to_string())
    }

    /// In-flight bound for archive requests, `None` when unbounded.
    pub fn max_in_flight(&self) -> Option<usize> {
        Some(self.archive.max_in_flight).filter(|n| *n > 0)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// `GH_ARCHIVER_`-prefixed variables, e.g. `GH_ARCHIVER_FILTER__TYPE=public,fork`.
fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("filter.compare")
        .with_list_parse_key("filter.type")
}
