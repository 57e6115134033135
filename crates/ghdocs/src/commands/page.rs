//! `ghdocs page` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use ghdocs_cache::{CacheStore, FileCache, NullCache};
use ghdocs_config::{CacheConfig, CliSettings, Config};
use ghdocs_core::{DocResolver, RepoRef};
use ghdocs_github::GithubClient;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Page name without extension (e.g., "installation").
    pub page: String,

    /// Section directory the page lives in.
    #[arg(short, long)]
    pub section: Option<String>,

    /// Branch to read from (default: `github.default_branch` from config).
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Path to configuration file (default: auto-discover ghdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub API base URL (overrides config).
    #[arg(long, env = "GHDOCS_API_URL")]
    api_url: Option<String>,

    /// Repository owner (overrides config).
    #[arg(long)]
    owner: Option<String>,

    /// Repository name (overrides config).
    #[arg(long)]
    repo: Option<String>,

    /// Cache directory (overrides config).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable caching.
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl PageArgs {
    /// Execute the page command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page cannot be fetched,
    /// or the page does not exist.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            api_url: self.api_url.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            cache_enabled: self.resolve_cache_enabled(),
            cache_dir: self.cache_dir.clone(),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let branch = self
            .branch
            .as_deref()
            .unwrap_or(&config.github.default_branch);

        if self.verbose {
            output.info(&format!(
                "Repository: {}/{} ({})",
                config.github.owner, config.github.repo, config.github.api_url
            ));
            if config.cache_resolved.enabled {
                output.info(&format!(
                    "Cache directory: {}",
                    config.cache_resolved.dir.display()
                ));
            } else {
                output.info("Cache: disabled");
            }
        }

        let resolver = DocResolver::new(
            Arc::new(GithubClient::new(&config.github.api_url)),
            open_cache(&config.cache_resolved, version)?,
            RepoRef::new(&config.github.owner, &config.github.repo),
        )
        .with_ttl(config.cache_resolved.ttl());

        let section = self.section.as_deref();
        let Some(markdown) = resolver.page(&self.page, section, branch)? else {
            return Err(CliError::NotFound(describe_page(&self.page, section, branch)));
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(markdown.as_bytes())?;
        if !markdown.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;

        Ok(())
    }

    /// Resolve `cache_enabled` from --cache/--no-cache flags.
    fn resolve_cache_enabled(&self) -> Option<bool> {
        self.no_cache.then_some(false).or(self.cache)
    }
}

/// Open the configured cache store.
///
/// The cache version is the binary version, so entries written by another
/// release are discarded.
fn open_cache(cache: &CacheConfig, version: &str) -> Result<Arc<dyn CacheStore>, CliError> {
    if !cache.enabled {
        tracing::debug!("Cache disabled");
        return Ok(Arc::new(NullCache));
    }

    tracing::debug!(dir = %cache.dir.display(), ttl_secs = cache.ttl_secs, "Using file cache");
    let store = FileCache::new(cache.dir.clone(), version);
    ensure_gitignore(store.root())?;
    Ok(Arc::new(store))
}

/// Ensure the cache directory exists with a `.gitignore`.
fn ensure_gitignore(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)?;

    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists()
        && let Err(e) = std::fs::write(&gitignore_path, "# Automatically created by ghdocs\n*\n")
    {
        tracing::warn!(path = %gitignore_path.display(), error = %e, "Failed to write .gitignore");
    }

    Ok(())
}

/// Human-readable location of a page, e.g. `quickstart/intro.md@develop`.
fn describe_page(page: &str, section: Option<&str>, branch: &str) -> String {
    match section {
        Some(section) => format!("{section}/{page}.md@{branch}"),
        None => format!("{page}.md@{branch}"),
    }
}
