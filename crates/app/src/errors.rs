use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("usage: {0}")]
    Usage(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
