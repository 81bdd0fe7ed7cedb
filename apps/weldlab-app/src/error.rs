use thiserror::Error;
use weldlab_core::error::ConfigError;

/// Anything that ends a CLI run early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config encoding failed: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("health batch failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("unknown component: {0}")]
    UnknownComponent(String),
}
