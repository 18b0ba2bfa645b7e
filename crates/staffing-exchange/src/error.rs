//! Error types for the file exchange.

use staffing_ingest::IngestError;
use thiserror::Error;

/// Errors that can occur while reading or writing a remote table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExchangeError {
    // === Transport Errors ===
    /// Connecting, authenticating or talking to the remote host failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Reading or writing a file failed mid-transfer.
    #[error("I/O error on {file}: {message}")]
    Io { file: String, message: String },

    /// The remote file does not exist.
    #[error("remote file not found: {file}")]
    NotFound { file: String },

    // === Content Errors ===
    /// The file is not valid UTF-8.
    #[error("{file} is not valid UTF-8 text")]
    Encoding { file: String },

    /// The file was fetched but its table failed to parse or validate.
    #[error("{file}: {source}")]
    Ingest {
        file: String,
        #[source]
        source: IngestError,
    },

    // === Setup Errors ===
    /// The exchange configuration is incomplete or unreadable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ExchangeError {
    pub(crate) fn io(file: &str, err: impl ToString) -> Self {
        Self::Io {
            file: file.to_string(),
            message: err.to_string(),
        }
    }

    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(_) => {
                "Could not reach the file server. Check the network and try again.".to_string()
            }
            Self::Io { file, .. } => format!("Transferring {file} failed. Try again."),
            Self::NotFound { file } => format!("The file {file} does not exist on the server."),
            Self::Encoding { file } => format!("The file {file} is not valid UTF-8 text."),
            Self::Ingest { file, source } => match source.column() {
                Some(column) => format!("The file {file} has a problem with column {column}."),
                None => format!("The file {file} could not be read as CSV."),
            },
            Self::Config(message) => format!("Configuration problem: {message}"),
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Io { .. })
    }
}

impl From<ssh2::Error> for ExchangeError {
    fn from(err: ssh2::Error) -> Self {
        Self::Connection(err.to_string())
    }
}

/// Result type alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
