//! CLI error types.

use quire_config::ConfigError;
use quire_publish::PublishError;
use quire_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("Cannot encode plan: {0}")]
    Json(#[from] serde_json::Error),
}
