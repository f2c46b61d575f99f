/*!
 * Error types for the yaet application.
 *
 * Custom error types for the different parts of the application, using the
 * thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while working with markup trees
#[derive(Error, Debug)]
pub enum MarkupError {
    /// The list renderer was invoked on something that is not a list.
    /// A programmer error; it halts the document's processing.
    #[error("Unsupported element in list renderer: <{0}>")]
    UnsupportedListElement(String),

    /// The input could not be parsed at all
    #[error("Markup parse error: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or missing configuration; fatal for the whole run
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from markup processing
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility conversions for error propagation
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
