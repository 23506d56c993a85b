//! Repodata patch hooks.
//!
//! A host fetches repodata, then runs every registered patch over it before
//! handing the document to its consumers.

use repodata_config::config::get_config;
use repodata_registry::{Channel, RepoData};
use tracing::debug;

use crate::{
    error::Result,
    pipeline::{apply, parse_references},
};

pub type PatchAction = fn(&Channel, RepoData) -> Result<RepoData>;

/// A named patch run over freshly fetched repodata.
#[derive(Clone, Copy)]
pub struct RepodataPatch {
    pub name: &'static str,
    pub action: PatchAction,
}

/// Patches provided by this crate, in the order they run.
pub fn repodata_patches() -> Vec<RepodataPatch> {
    vec![RepodataPatch {
        name: "apply_transformations",
        action: apply_transformations,
    }]
}

/// Applies the transformations configured through `$CONDA_TRANSFORMATIONS`
/// (or the `transformations` config entry).
pub fn apply_transformations(channel: &Channel, repodata: RepoData) -> Result<RepoData> {
    let references = parse_references(&get_config().get_transformations());
    if references.is_empty() {
        return Ok(repodata);
    }
    debug!("{} transformation(s) configured for {}", references.len(), channel);
    apply(repodata, channel, &references)
}

/// Runs every registered patch in order, stopping at the first failure.
pub fn patch_repodata(channel: &Channel, repodata: RepoData) -> Result<RepoData> {
    repodata_patches()
        .into_iter()
        .try_fold(repodata, |repodata, patch| {
            debug!("Running repodata patch {}", patch.name);
            (patch.action)(channel, repodata)
        })
}

#[cfg(test)]
mod tests {
    use repodata_config::{config::TRANSFORMATIONS_ENV, test_utils::with_env};
    use repodata_registry::{ChannelInfo, PackageRecord};
    use serial_test::serial;
    use url::Url;

    use super::*;
    use crate::error::TransformationError;

    fn channel() -> Channel {
        Channel::new(
            "conda-forge",
            "noarch",
            Url::parse("https://conda.anaconda.org/conda-forge/").unwrap(),
        )
    }

    fn repodata() -> RepoData {
        let mut repodata = RepoData {
            info: Some(ChannelInfo {
                subdir: Some("noarch".to_string()),
                ..ChannelInfo::default()
            }),
            ..RepoData::default()
        };
        repodata
            .packages_mut()
            .insert("zlib-1.2.13-h0.tar.bz2".into(), PackageRecord::new("zlib", "1.2.13"));
        repodata
            .conda_packages_mut()
            .insert("python-3.11.4-h0.conda".into(), PackageRecord::new("python", "3.11.4"));
        repodata
    }

    #[test]
    fn test_registered_patches() {
        let names: Vec<_> = repodata_patches().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["apply_transformations"]);
    }

    #[test]
    #[serial]
    fn test_no_transformations_configured() {
        with_env(vec![(TRANSFORMATIONS_ENV, Some(" , "))], || {
            let result = patch_repodata(&channel(), repodata()).unwrap();
            assert_eq!(result, repodata());
        });
    }

    #[test]
    #[serial]
    fn test_transformations_from_env() {
        with_env(vec![(TRANSFORMATIONS_ENV, Some("samples:hotfix,samples:only_zlib"))], || {
            let result = patch_repodata(&channel(), repodata()).unwrap();

            assert_eq!(result.len(), 1);
            assert_eq!(
                result.record("zlib-1.2.13-h0.tar.bz2").unwrap().depends(),
                ["python"]
            );
        });
    }

    #[test]
    #[serial]
    fn test_failing_transformation_from_env() {
        with_env(vec![(TRANSFORMATIONS_ENV, Some("samples:only_python,samples:nope"))], || {
            let err = apply_transformations(&channel(), repodata()).unwrap_err();

            assert!(matches!(err, TransformationError::Load(_)));
            assert_eq!(err.reference(), "samples:nope");
        });
    }
}
