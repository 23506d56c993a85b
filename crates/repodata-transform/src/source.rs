//! Classification of transformation references.

use std::path::{Path, PathBuf};

use crate::error::LoadCause;

/// Name of the transformation looked up inside a transformation file.
pub const FILE_ENTRYPOINT: &str = "transformation";

/// Where a transformation comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformationSource {
    /// A transformation file on disk exposing a `transformation` table.
    FilePath(PathBuf),
    /// A `module` + `attribute` pair resolved through the registry.
    ImportReference { module: String, attribute: String },
}

impl TransformationSource {
    /// Classifies a reference.
    ///
    /// An existing file wins. Otherwise the reference is split on its last
    /// `:`, or on its last `.` when it has no `:`.
    pub fn parse(reference: &str) -> Result<Self, LoadCause> {
        let path = Path::new(reference);
        if path.is_file() {
            return Ok(Self::FilePath(path.to_path_buf()));
        }

        let separator = if reference.contains(':') { ':' } else { '.' };
        match reference.rsplit_once(separator) {
            Some((module, attribute)) if !module.is_empty() && !attribute.is_empty() => {
                Ok(Self::ImportReference {
                    module: module.to_string(),
                    attribute: attribute.to_string(),
                })
            }
            _ => Err(LoadCause::InvalidReference),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn import(module: &str, attribute: &str) -> TransformationSource {
        TransformationSource::ImportReference {
            module: module.to_string(),
            attribute: attribute.to_string(),
        }
    }

    #[test]
    fn test_entrypoint_syntax() {
        assert_eq!(
            TransformationSource::parse("conda_repodata.samples:hotfix").unwrap(),
            import("conda_repodata.samples", "hotfix")
        );
    }

    #[test]
    fn test_dotted_syntax_splits_on_last_dot() {
        assert_eq!(
            TransformationSource::parse("conda_repodata.samples.only_python").unwrap(),
            import("conda_repodata.samples", "only_python")
        );
    }

    #[test]
    fn test_colon_takes_precedence_over_dots() {
        assert_eq!(
            TransformationSource::parse("pkg.module:fn.name").unwrap(),
            import("pkg.module", "fn.name")
        );
    }

    #[test]
    fn test_no_separator() {
        assert!(matches!(
            TransformationSource::parse("does-not-exist"),
            Err(LoadCause::InvalidReference)
        ));
    }

    #[test]
    fn test_empty_parts() {
        for reference in ["samples:", ":hotfix", "samples.", ".hotfix", ""] {
            assert!(
                matches!(
                    TransformationSource::parse(reference),
                    Err(LoadCause::InvalidReference)
                ),
                "{reference} should be rejected"
            );
        }
    }

    #[test]
    fn test_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotfix.toml");
        fs::write(&path, "[transformation]\n").unwrap();

        let reference = path.to_string_lossy().to_string();
        assert_eq!(
            TransformationSource::parse(&reference).unwrap(),
            TransformationSource::FilePath(path)
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("samples.d").to_string_lossy().to_string();
        fs::create_dir(&reference).unwrap();

        assert!(matches!(
            TransformationSource::parse(&reference).unwrap(),
            TransformationSource::ImportReference { attribute, .. } if attribute == "d"
        ));
    }
}
