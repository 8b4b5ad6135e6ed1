//! Error types for the SDK context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
