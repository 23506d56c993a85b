use std::path::PathBuf;

use miette::Diagnostic;
use repodata_config::error::ConfigError;
use repodata_registry::RegistryError;
use repodata_transform::TransformationError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transformation(#[from] TransformationError),

    #[error("Too many channels/subdirs specified to dump to stdout")]
    #[diagnostic(
        code(conda_repodata::too_many_targets),
        help("Select a single channel and subdir, or use --output with a directory")
    )]
    TooManyTargets,

    #[error("Output file already exists: {}", .0.display())]
    #[diagnostic(
        code(conda_repodata::output_exists),
        help("Pass --force to overwrite it")
    )]
    OutputExists(PathBuf),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(conda_repodata::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(conda_repodata::json))]
    JsonError(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CliError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
