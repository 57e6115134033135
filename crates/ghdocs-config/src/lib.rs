//! Configuration management for ghdocs.
//!
//! Parses `ghdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `github.api_url`
//! - `github.owner`
//! - `github.repo`
//! - `github.default_branch`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override GitHub API base URL.
    pub api_url: Option<String>,
    /// Override repository owner.
    pub owner: Option<String>,
    /// Override repository name.
    pub repo: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ghdocs.toml";

/// Default cache time-to-live in seconds.
const DEFAULT_TTL_SECS: u64 = 60;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation repository configuration.
    pub github: GithubConfig,
    /// Cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Documentation repository configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// REST API base URL.
    pub api_url: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch used when a request names none.
    pub default_branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_owned(),
            owner: "laravel".to_owned(),
            repo: "docs".to_owned(),
            default_branch: "master".to_owned(),
        }
    }
}

/// Raw cache configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    ttl_secs: Option<u64>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Directory for cached pages.
    pub dir: PathBuf,
    /// Time-to-live of cached pages, in seconds.
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Time-to-live of cached pages.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`github.api_url`").
        field: String,
        /// Error message (e.g., "${`GITHUB_API_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ghdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(api_url) = &settings.api_url {
            self.github.api_url.clone_from(api_url);
        }
        if let Some(owner) = &settings.owner {
            self.github.owner.clone_from(owner);
        }
        if let Some(repo) = &settings.repo {
            self.github.repo.clone_from(repo);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(cache_dir) = &settings.cache_dir {
            self.cache_resolved.dir.clone_from(cache_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(current)
    }

    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            github: GithubConfig::default(),
            cache: CacheConfigRaw::default(),
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(".ghdocs").join("cache"),
                ttl_secs: DEFAULT_TTL_SECS,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_github()?;
        self.validate_cache()?;
        Ok(())
    }

    /// Validate repository configuration.
    fn validate_github(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.github.api_url, "github.api_url")?;
        require_http_url(&self.github.api_url, "github.api_url")?;
        require_non_empty(&self.github.owner, "github.owner")?;
        require_non_empty(&self.github.repo, "github.repo")?;
        require_non_empty(&self.github.default_branch, "github.default_branch")?;

        for (value, field) in [
            (&self.github.owner, "github.owner"),
            (&self.github.repo, "github.repo"),
        ] {
            if value.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{field} cannot contain '/'"
                )));
            }
        }

        Ok(())
    }

    /// Validate cache configuration.
    fn validate_cache(&self) -> Result<(), ConfigError> {
        if self.cache_resolved.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let github = &mut self.github;
        github.api_url = expand::expand_env(&github.api_url, "github.api_url")?;
        github.owner = expand::expand_env(&github.owner, "github.owner")?;
        github.repo = expand::expand_env(&github.repo, "github.repo")?;
        github.default_branch =
            expand::expand_env(&github.default_branch, "github.default_branch")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let dir = self
            .cache
            .dir
            .as_deref()
            .map_or_else(|| config_dir.join(".ghdocs").join("cache"), |d| config_dir.join(d));

        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir,
            ttl_secs: self.cache.ttl_secs.unwrap_or(DEFAULT_TTL_SECS),
        };
    }
}
