use std::io;

use thiserror::Error;

/// Errors surfaced by parameter handling and model persistence
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid model format: {0}")]
    InvalidFormat(String),

    #[error("unsupported model version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format<T: Into<String>>(msg: T) -> Self {
        Error::InvalidFormat(msg.into())
    }

    pub(crate) fn parameter<T: Into<String>>(msg: T) -> Self {
        Error::InvalidParameter(msg.into())
    }
}
