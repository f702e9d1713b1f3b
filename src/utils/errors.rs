use thiserror::Error;

/// Main error type for SafeSpace
#[derive(Error, Debug)]
pub enum SafeSpaceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("UI error: {0}")]
    UIError(String),
}
