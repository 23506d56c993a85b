//! Error types for the transformation pipeline.
//!
//! Loading and applying fail with distinct errors. Both carry the reference
//! exactly as it was configured and keep the underlying cause as their
//! [`source`](std::error::Error::source).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type returned by transformations themselves.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a reference could not be resolved to a transformation.
#[derive(Error, Debug)]
pub enum LoadCause {
    #[error("Error while reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid transformation file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("File does not define a `transformation` table")]
    MissingTransformation,

    #[error("Invalid rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    #[error("Not an existing file nor a `module:function` or `module.function` reference")]
    InvalidReference,

    #[error("No module named `{0}`")]
    ModuleNotFound(String),

    #[error("Module `{module}` has no transformation `{attribute}`")]
    AttributeNotFound { module: String, attribute: String },
}

#[derive(Error, Diagnostic, Debug)]
#[error("Failed to import transformation ({reference}): {cause}")]
#[diagnostic(
    code(repodata_transform::load),
    help("Check the entries of $CONDA_TRANSFORMATIONS; run with --list-transformations to see the built-in ones")
)]
pub struct TransformationLoadError {
    pub reference: String,
    #[source]
    pub cause: LoadCause,
}

#[derive(Error, Diagnostic, Debug)]
#[error("Failed to apply transformation ({reference}): {cause}")]
#[diagnostic(
    code(repodata_transform::apply),
    help("The transformation rejected the repodata; remaining transformations were skipped")
)]
pub struct TransformationApplyError {
    pub reference: String,
    #[source]
    pub cause: BoxError,
}

#[derive(Error, Diagnostic, Debug)]
pub enum TransformationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] TransformationLoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Apply(#[from] TransformationApplyError),
}

impl TransformationError {
    /// The reference that failed to load or apply.
    pub fn reference(&self) -> &str {
        match self {
            Self::Load(err) => &err.reference,
            Self::Apply(err) => &err.reference,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformationError>;
