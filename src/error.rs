//! Error types for the content client and page controllers

use thiserror::Error;

/// Result type alias for filmworks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the content API
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration (fatal at startup)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("Content API returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A single item lookup matched nothing
    #[error("{0} not found")]
    NotFound(String),

    /// A detail page was requested without a slug
    #[error("Invalid slug")]
    InvalidSlug,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means "the thing does not exist" rather than
    /// "we could not reach the API".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Error::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_empty_lookup_and_404() {
        assert!(Error::NotFound("work".into()).is_not_found());
        assert!(Error::Status { status: 404, url: "x".into() }.is_not_found());
        assert!(!Error::Status { status: 500, url: "x".into() }.is_not_found());
        assert!(!Error::Network("refused".into()).is_not_found());
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(Error::NotFound("Work".into()).to_string(), "Work not found");
        assert_eq!(
            Error::Config("STRAPI_API_BASE_URL is not defined".into()).to_string(),
            "Invalid configuration: STRAPI_API_BASE_URL is not defined"
        );
    }
}
