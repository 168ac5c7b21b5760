//! Error types for bbgurl

use thiserror::Error;

/// Boxed error from the response stream
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for bbgurl
#[derive(Error, Debug)]
pub enum BbgurlError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Fatal failures while moving the response body to its destination
///
/// Both variants are raised only after the terminal has been restored and
/// the sink closed.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The response stream failed (reset, timeout, protocol violation)
    #[error("Response stream failed: {0}")]
    Stream(#[source] BoxError),

    /// The destination refused a write
    #[error("Failed to write output: {0}")]
    SinkWrite(#[source] std::io::Error),
}

impl TransferError {
    /// Wrap any stream error
    pub fn stream<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        TransferError::Stream(err.into())
    }
}
