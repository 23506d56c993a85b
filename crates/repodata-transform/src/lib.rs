//! Repodata transformation pipeline.
//!
//! A transformation mutates a channel's repodata document. References to
//! transformations are configured as a comma-separated list (usually through
//! `$CONDA_TRANSFORMATIONS`) and applied strictly left to right, each one
//! observing the output of the previous one.
//!
//! A reference is either
//! - the path of a transformation file (see [`rules`]), or
//! - `module:attribute` / `module.attribute`, resolved through a
//!   [`Registry`] of compiled-in transformations.
//!
//! # Example
//!
//! ```no_run
//! use repodata_registry::{Channel, ChannelSource, RepodataSource};
//! use repodata_transform::{apply, parse_references};
//!
//! fn patched(channel: &Channel) -> miette::Result<()> {
//!     let repodata = ChannelSource.fetch(channel)?;
//!     let references = parse_references("samples:hotfix,samples:only_python");
//!     let repodata = apply(repodata, channel, &references)?;
//!     println!("{}", repodata.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod registry;
pub mod rules;
pub mod samples;
pub mod source;
pub mod transformation;

pub use error::{
    BoxError, LoadCause, Result, TransformationApplyError, TransformationError,
    TransformationLoadError,
};
pub use hooks::{apply_transformations, patch_repodata, repodata_patches, RepodataPatch};
pub use pipeline::{apply, load, parse_references, Pipeline};
pub use registry::{Registry, TransformationRef, DEFAULT_REGISTRY};
pub use source::TransformationSource;
pub use transformation::Transformation;
