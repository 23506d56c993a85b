//! Error types for the registry crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while resolving channels or reading repodata.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(repodata_registry::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(repodata_registry::http),
        help("Check your network connection and the channel URL")
    )]
    UreqError(#[from] ureq::Error),

    #[error("Failed to fetch from remote source: {0}")]
    #[diagnostic(
        code(repodata_registry::fetch_remote),
        help("Verify the channel URL is correct and accessible")
    )]
    FailedToFetchRemote(String),

    #[error(transparent)]
    #[diagnostic(
        code(repodata_registry::json),
        help("The repodata file may be corrupted or in an invalid format")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    #[diagnostic(
        code(repodata_registry::invalid_url),
        help("Ensure the URL is valid and properly formatted")
    )]
    InvalidUrl(String),

    #[error("Invalid channel: {0}")]
    #[diagnostic(
        code(repodata_registry::invalid_channel),
        help("Use a channel name, an http(s)/file URL or an absolute path")
    )]
    InvalidChannel(String),

    #[error("Unsupported URL scheme `{0}`")]
    #[diagnostic(
        code(repodata_registry::unsupported_scheme),
        help("Only http, https and file channels are supported")
    )]
    UnsupportedScheme(String),

    #[error("{0}")]
    #[diagnostic(code(repodata_registry::custom))]
    Custom(String),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            RegistryError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
