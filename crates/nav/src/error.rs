//! CLI error types.

use nav_config::ConfigError;
use nav_repo::RepositoryError;
use nav_tree::NavError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Navigation(#[from] NavError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
