use std::io;
use thiserror::Error;

pub type SenderResult<T> = Result<T, SenderError>;

/// Errors raised by the email sender client
#[derive(Error, Debug)]
pub enum SenderError {
    /// IO error (file system, terminal)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Spreadsheet could not be opened or decoded
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// CSV file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File extension is not a supported spreadsheet type
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Network failure talking to the mail service
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Mail service answered with a non-success status
    #[error("Mail service returned status {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// OS keyring failure
    #[error("Credential store error: {0}")]
    CredentialStore(String),
}

impl SenderError {
    /// Create a new spreadsheet error
    pub fn spreadsheet<S: Into<String>>(msg: S) -> Self {
        SenderError::Spreadsheet(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SenderError::InvalidConfig(msg.into())
    }

    /// Whether the error came from talking to the mail service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SenderError::Transport(_)
                | SenderError::RemoteStatus { .. }
                | SenderError::Timeout
                | SenderError::InvalidResponse(_)
        )
    }
}

impl From<calamine::Error> for SenderError {
    fn from(err: calamine::Error) -> Self {
        SenderError::Spreadsheet(err.to_string())
    }
}

impl From<toml::de::Error> for SenderError {
    fn from(err: toml::de::Error) -> Self {
        SenderError::InvalidConfig(err.to_string())
    }
}

impl From<keyring::Error> for SenderError {
    fn from(err: keyring::Error) -> Self {
        SenderError::CredentialStore(err.to_string())
    }
}
