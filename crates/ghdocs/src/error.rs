//! CLI error types.

use ghdocs_config::ConfigError;
use ghdocs_core::ResolveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("page not found: {0}")]
    NotFound(String),
}
