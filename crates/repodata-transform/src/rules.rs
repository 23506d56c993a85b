//! Declarative transformation files.
//!
//! A transformation file is a TOML document with a `transformation` table
//! listing rules that are applied in order:
//!
//! ```toml
//! [transformation]
//! description = "Hotfix zlib, then keep python only"
//!
//! [[transformation.rules]]
//! action = "append-depends"
//! name = "zlib"
//! version = "1.2.13"
//! depends = ["python"]
//!
//! [[transformation.rules]]
//! action = "keep"
//! name = "python"
//! ```
//!
//! `name` and `version` are glob patterns; a rule without either matches
//! every record.

use std::{
    fs,
    path::{Path, PathBuf},
};

use fast_glob::glob_match;
use repodata_registry::{Channel, PackageRecord, RepoData};
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::{BoxError, LoadCause},
    transformation::Transformation,
};

#[derive(Deserialize)]
struct TransformationFile {
    transformation: Option<RuleSetSpec>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSetSpec {
    description: Option<String>,
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum Action {
    Keep,
    Drop,
    AppendDepends,
    RequireSubdir,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    action: Action,
    name: Option<String>,
    version: Option<String>,
    depends: Option<Vec<String>>,
    subdir: Option<String>,
}

/// Selects package records by name and version.
///
/// Both fields are glob patterns. An unset field matches anything, so the
/// default matcher selects every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matcher {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl Matcher {
    /// Returns `true` when `record` satisfies every set pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use repodata_registry::PackageRecord;
    /// use repodata_transform::rules::Matcher;
    ///
    /// let matcher = Matcher {
    ///     name: Some("zlib".into()),
    ///     version: Some("1.2.*".into()),
    /// };
    ///
    /// assert!(matcher.matches(&PackageRecord::new("zlib", "1.2.13")));
    /// assert!(!matcher.matches(&PackageRecord::new("zlib", "1.3.1")));
    /// assert!(Matcher::default().matches(&PackageRecord::new("python", "3.12.0")));
    /// ```
    pub fn matches(&self, record: &PackageRecord) -> bool {
        self.name
            .as_deref()
            .is_none_or(|pattern| glob_match(pattern, &record.name))
            && self
                .version
                .as_deref()
                .is_none_or(|pattern| glob_match(pattern, &record.version))
    }
}

/// A single step of a transformation file, applied in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Keep only matching records.
    Keep(Matcher),
    /// Remove matching records.
    Drop(Matcher),
    /// Append dependencies to matching records, skipping ones already listed.
    AppendDepends { matcher: Matcher, depends: Vec<String> },
    /// Empty the document unless `info.subdir` equals the given subdir.
    RequireSubdir(String),
}

impl Rule {
    fn from_spec(index: usize, spec: RuleSpec) -> Result<Self, LoadCause> {
        let invalid = |reason: &str| {
            LoadCause::InvalidRule {
                index,
                reason: reason.to_string(),
            }
        };

        let matcher = Matcher {
            name: spec.name,
            version: spec.version,
        };
        let has_matcher = matcher != Matcher::default();

        match spec.action {
            Action::Keep | Action::Drop | Action::AppendDepends if spec.subdir.is_some() => {
                Err(invalid("`subdir` is only valid for `require-subdir`"))
            }
            Action::Keep | Action::Drop if spec.depends.is_some() => {
                Err(invalid("`depends` is only valid for `append-depends`"))
            }
            Action::Keep => Ok(Self::Keep(matcher)),
            Action::Drop => Ok(Self::Drop(matcher)),
            Action::AppendDepends => {
                match spec.depends {
                    Some(depends) if !depends.is_empty() => {
                        Ok(Self::AppendDepends {
                            matcher,
                            depends,
                        })
                    }
                    _ => Err(invalid("`append-depends` requires a non-empty `depends`")),
                }
            }
            Action::RequireSubdir => {
                if has_matcher || spec.depends.is_some() {
                    return Err(invalid("`require-subdir` only accepts `subdir`"));
                }
                spec.subdir
                    .map(Self::RequireSubdir)
                    .ok_or_else(|| invalid("`require-subdir` requires `subdir`"))
            }
        }
    }

    fn apply(&self, repodata: &mut RepoData) -> Result<(), BoxError> {
        match self {
            Self::Keep(matcher) => repodata.retain_records(|_, record| matcher.matches(record)),
            Self::Drop(matcher) => repodata.retain_records(|_, record| !matcher.matches(record)),
            Self::AppendDepends {
                matcher,
                depends,
            } => {
                for (_, record) in repodata.records_mut() {
                    if !matcher.matches(record) {
                        continue;
                    }
                    let current = record.depends_mut();
                    for dep in depends {
                        if !current.contains(dep) {
                            current.push(dep.clone());
                        }
                    }
                }
            }
            Self::RequireSubdir(subdir) => {
                let current = repodata
                    .subdir()
                    .ok_or("repodata has no `info.subdir`")?;
                if current != subdir.as_str() {
                    repodata.clear_records();
                }
            }
        }
        Ok(())
    }
}

/// A transformation loaded from a transformation file.
///
/// Running it applies each of its [`Rule`]s in order to the document. A
/// failing rule aborts the remaining ones.
#[derive(Clone, Debug)]
pub struct FileTransformation {
    pub path: PathBuf,
    pub description: Option<String>,
    pub rules: Vec<Rule>,
}

impl FileTransformation {
    /// Reads and validates the `transformation` table of the file at `path`.
    ///
    /// Fails when the file cannot be read, is not valid TOML, has no
    /// `transformation` table or contains an invalid rule. Rules are
    /// numbered from 1 in [`LoadCause::InvalidRule`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repodata_transform::rules::FileTransformation;
    ///
    /// let transformation = FileTransformation::load("only_python.toml").unwrap();
    /// println!("{} rule(s)", transformation.rules.len());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadCause> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            LoadCause::Io {
                path: path.to_path_buf(),
                source: err,
            }
        })?;
        Self::from_toml(path, &content)
    }

    fn from_toml(path: &Path, content: &str) -> Result<Self, LoadCause> {
        let file: TransformationFile = toml::from_str(content)?;
        let spec = file
            .transformation
            .ok_or(LoadCause::MissingTransformation)?;

        let rules = spec
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| Rule::from_spec(index + 1, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            description: spec.description,
            rules,
        })
    }
}

impl Transformation for FileTransformation {
    fn transform(&self, channel: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
        for rule in &self.rules {
            trace!("{}: applying {:?} to {}", self.path.display(), rule, channel);
            rule.apply(&mut repodata)?;
        }
        Ok(repodata)
    }
}
