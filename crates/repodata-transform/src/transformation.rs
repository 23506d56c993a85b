use repodata_registry::{Channel, RepoData};

use crate::error::BoxError;

/// A repodata-mutating step.
///
/// Implementations receive the channel the document belongs to and own the
/// document for the duration of the call. The returned document is the one
/// handed to the next step; mutating in place and returning it is fine.
pub trait Transformation: Send + Sync {
    fn transform(&self, channel: &Channel, repodata: RepoData) -> Result<RepoData, BoxError>;
}

impl<F> Transformation for F
where
    F: Fn(&Channel, RepoData) -> Result<RepoData, BoxError> + Send + Sync,
{
    fn transform(&self, channel: &Channel, repodata: RepoData) -> Result<RepoData, BoxError> {
        self(channel, repodata)
    }
}
