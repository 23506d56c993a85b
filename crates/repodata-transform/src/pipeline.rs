//! Loading and applying chains of transformations.

use std::sync::Arc;

use repodata_registry::{Channel, RepoData};
use tracing::debug;

use crate::{
    error::{LoadCause, Result, TransformationApplyError, TransformationLoadError},
    registry::{Registry, TransformationRef, DEFAULT_REGISTRY},
    rules::FileTransformation,
    source::{TransformationSource, FILE_ENTRYPOINT},
};

/// Splits a comma-separated reference list, dropping blank entries and keeping order.
pub fn parse_references(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(String::from)
        .collect()
}

/// Resolves references against a [`Registry`] and applies them in order.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    registry: &'a Registry,
}

impl Default for Pipeline<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_REGISTRY)
    }
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
        }
    }

    /// Resolves a single reference to a transformation.
    ///
    /// An existing file is read as a transformation file and must define its
    /// `transformation` table. Anything else is treated as a
    /// `module:attribute` or `module.attribute` reference into the registry.
    pub fn load(
        &self,
        reference: &str,
    ) -> std::result::Result<TransformationRef, TransformationLoadError> {
        let wrap = |cause: LoadCause| {
            TransformationLoadError {
                reference: reference.to_string(),
                cause,
            }
        };

        match TransformationSource::parse(reference).map_err(wrap)? {
            TransformationSource::FilePath(path) => {
                debug!("Loading `{}` from {}", FILE_ENTRYPOINT, path.display());
                let transformation = FileTransformation::load(&path).map_err(wrap)?;
                Ok(Arc::new(transformation))
            }
            TransformationSource::ImportReference {
                module,
                attribute,
            } => {
                debug!("Resolving `{}` in module `{}`", attribute, module);
                self.registry.resolve(&module, &attribute).map_err(wrap)
            }
        }
    }

    /// Applies `references` to `repodata` left to right.
    ///
    /// Each reference is loaded right before it runs. The first failure
    /// aborts the chain; transformations after it are neither loaded nor
    /// called. An empty list returns the document untouched.
    pub fn apply<S: AsRef<str>>(
        &self,
        repodata: RepoData,
        channel: &Channel,
        references: &[S],
    ) -> Result<RepoData> {
        let mut repodata = repodata;
        for reference in references {
            let reference = reference.as_ref();
            let transformation = self.load(reference)?;

            debug!("Applying transformation {} to {}", reference, channel);
            repodata = transformation.transform(channel, repodata).map_err(|cause| {
                TransformationApplyError {
                    reference: reference.to_string(),
                    cause,
                }
            })?;
        }
        Ok(repodata)
    }
}

/// [`Pipeline::load`] against the built-in registry.
pub fn load(reference: &str) -> std::result::Result<TransformationRef, TransformationLoadError> {
    Pipeline::default().load(reference)
}

/// [`Pipeline::apply`] against the built-in registry.
pub fn apply<S: AsRef<str>>(
    repodata: RepoData,
    channel: &Channel,
    references: &[S],
) -> Result<RepoData> {
    Pipeline::default().apply(repodata, channel, references)
}
