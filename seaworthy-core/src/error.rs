//! Error types for the seaworthy core.

use std::{error::Error, fmt, io};

/// Error type for seaworthy core operations.
#[derive(Debug)]
pub enum SeaworthyError {
    /// An underlying I/O error.
    Io(io::Error),
    /// The DataSource capability could not produce the requested data.
    DataSource(String),
    /// A repository URL did not yield an owner/name pair.
    InvalidRepoUrl(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for SeaworthyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::DataSource(message) => write!(f, "data source error: {message}"),
            Self::InvalidRepoUrl(url) => write!(f, "invalid repository url: {url}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for SeaworthyError {}

impl From<io::Error> for SeaworthyError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Convenience result type for the seaworthy core.
pub type Result<T> = std::result::Result<T, SeaworthyError>;
