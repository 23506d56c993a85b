use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(repodata_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(repodata_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {}", .0.display())]
    #[diagnostic(
        code(repodata_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(std::path::PathBuf),

    #[error("No channels configured")]
    #[diagnostic(
        code(repodata_config::no_channels),
        help("Add at least one entry to `channels` or pass --channel")
    )]
    NoChannels,

    #[error("Channel name cannot be empty")]
    #[diagnostic(
        code(repodata_config::empty_channel),
        help("Remove the blank entry from `channels`")
    )]
    EmptyChannel,

    #[error("Duplicate channel: {0}")]
    #[diagnostic(
        code(repodata_config::duplicate_channel),
        help("Each channel must only be listed once")
    )]
    DuplicateChannel(String),

    #[error("Invalid channel alias: {0}")]
    #[diagnostic(
        code(repodata_config::invalid_channel_alias),
        help("The channel alias must be an http(s) or file URL")
    )]
    InvalidChannelAlias(String),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(repodata_config::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Extension trait for attaching a description of the failed action to I/O errors.
pub trait ErrorContext<T> {
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
            ConfigError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
