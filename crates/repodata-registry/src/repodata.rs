//! The repodata document.
//!
//! [`RepoData`] models a channel subdir's `repodata.json`. The well-known
//! top-level keys get typed fields; everything else is kept verbatim in
//! `extra` so a document survives a read/write cycle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// File name of the repodata document inside a channel subdir.
pub const REPODATA_FN: &str = "repodata.json";

/// A channel subdir's package index.
///
/// Sections absent from the input stay absent on output: a document is
/// written back with exactly the keys it was read with, plus whatever a
/// transformation added.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ChannelInfo>,

    /// Records of `.tar.bz2` packages, keyed by filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<IndexMap<String, PackageRecord>>,

    /// Records of `.conda` packages, keyed by filename.
    #[serde(default, rename = "packages.conda", skip_serializing_if = "Option::is_none")]
    pub conda_packages: Option<IndexMap<String, PackageRecord>>,

    /// Filenames of packages removed from the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repodata_version: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `info` section of a repodata document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata of a single package archive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Dependencies of the package; empty when the record lists none.
    pub fn depends(&self) -> &[String] {
        self.depends.as_deref().unwrap_or_default()
    }

    /// Mutable dependency list, created on first use.
    pub fn depends_mut(&mut self) -> &mut Vec<String> {
        self.depends.get_or_insert_with(Vec::new)
    }
}

impl RepoData {
    /// Subdir recorded in the `info` section, if any.
    pub fn subdir(&self) -> Option<&str> {
        self.info.as_ref().and_then(|info| info.subdir.as_deref())
    }

    /// Total number of records across `packages` and `packages.conda`.
    pub fn len(&self) -> usize {
        self.packages.as_ref().map_or(0, IndexMap::len)
            + self.conda_packages.as_ref().map_or(0, IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `packages`, created on first use.
    pub fn packages_mut(&mut self) -> &mut IndexMap<String, PackageRecord> {
        self.packages.get_or_insert_with(IndexMap::new)
    }

    /// `packages.conda`, created on first use.
    pub fn conda_packages_mut(&mut self) -> &mut IndexMap<String, PackageRecord> {
        self.conda_packages.get_or_insert_with(IndexMap::new)
    }

    pub fn removed(&self) -> &[String] {
        self.removed.as_deref().unwrap_or_default()
    }

    /// Looks a record up by filename in `packages`, then `packages.conda`.
    pub fn record(&self, filename: &str) -> Option<&PackageRecord> {
        self.packages
            .as_ref()
            .and_then(|packages| packages.get(filename))
            .or_else(|| {
                self.conda_packages
                    .as_ref()
                    .and_then(|packages| packages.get(filename))
            })
    }

    /// Iterates `(filename, record)` pairs of `packages` followed by `packages.conda`.
    pub fn records(&self) -> impl Iterator<Item = (&String, &PackageRecord)> {
        self.packages
            .iter()
            .flatten()
            .chain(self.conda_packages.iter().flatten())
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = (&String, &mut PackageRecord)> {
        self.packages
            .iter_mut()
            .flatten()
            .chain(self.conda_packages.iter_mut().flatten())
    }

    /// Keeps only the records for which `keep` returns `true`, preserving order.
    pub fn retain_records<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &PackageRecord) -> bool,
    {
        for packages in [&mut self.packages, &mut self.conda_packages]
            .into_iter()
            .flatten()
        {
            packages.retain(|filename, record| keep(filename, record));
        }
    }

    /// Empties `packages`, `packages.conda` and `removed`. Sections missing
    /// from the document are not added.
    pub fn clear_records(&mut self) {
        self.retain_records(|_, _| false);
        if let Some(removed) = &mut self.removed {
            removed.clear();
        }
    }

    pub fn from_slice(content: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(content)?)
    }

    /// Renders the document as JSON indented with two spaces.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Converts the document into a generic JSON value keyed by its top-level fields.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "info": {"subdir": "linux-64", "arch": "x86_64"},
            "packages": {
                "zlib-1.2.13-h1.tar.bz2": {
                    "name": "zlib",
                    "version": "1.2.13",
                    "build": "h1",
                    "build_number": 0,
                    "depends": ["libgcc-ng >=12"],
                    "md5": "abc"
                }
            },
            "packages.conda": {
                "python-3.11.0-h2.conda": {
                    "name": "python",
                    "version": "3.11.0",
                    "depends": []
                }
            },
            "removed": ["old-1.0-0.tar.bz2"],
            "repodata_version": 1,
            "signatures": {}
        })
    }

    #[test]
    fn test_deserialize_typed_fields() {
        let repodata: RepoData = serde_json::from_value(sample()).unwrap();

        assert_eq!(repodata.subdir(), Some("linux-64"));
        assert_eq!(repodata.len(), 2);
        assert_eq!(repodata.removed(), ["old-1.0-0.tar.bz2"]);
        assert_eq!(repodata.repodata_version, Some(1));

        let zlib = repodata.record("zlib-1.2.13-h1.tar.bz2").unwrap();
        assert_eq!(zlib.name, "zlib");
        assert_eq!(zlib.build.as_deref(), Some("h1"));
        assert_eq!(zlib.depends(), ["libgcc-ng >=12"]);
        assert_eq!(zlib.extra["md5"], json!("abc"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let value = sample();
        let repodata: RepoData = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(repodata.to_value().unwrap(), value);
    }

    #[test]
    fn test_missing_sections_stay_missing() {
        let value = json!({
            "packages": {"a-1-0.tar.bz2": {"name": "a", "version": "1"}}
        });
        let repodata: RepoData = serde_json::from_value(value.clone()).unwrap();

        assert!(repodata.info.is_none());
        assert!(repodata.removed().is_empty());
        assert!(repodata.record("a-1-0.tar.bz2").unwrap().depends().is_empty());
        assert_eq!(repodata.to_value().unwrap(), value);
    }

    #[test]
    fn test_empty_document() {
        let repodata = RepoData::from_slice(b"{}").unwrap();

        assert!(repodata.is_empty());
        assert!(repodata.subdir().is_none());
        assert_eq!(repodata.to_value().unwrap(), json!({}));
    }

    #[test]
    fn test_record_requires_name_and_version() {
        let result = RepoData::from_slice(br#"{"packages": {"a.conda": {"name": "a"}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_retain_records_covers_both_maps() {
        let mut repodata: RepoData = serde_json::from_value(sample()).unwrap();

        repodata.retain_records(|_, record| record.name == "python");

        let filenames: Vec<_> = repodata.records().map(|(filename, _)| filename).collect();
        assert_eq!(filenames, ["python-3.11.0-h2.conda"]);
        assert_eq!(repodata.to_value().unwrap()["packages"], json!({}));
    }

    #[test]
    fn test_records_mut() {
        let mut repodata: RepoData = serde_json::from_value(sample()).unwrap();

        for (_, record) in repodata.records_mut() {
            record.depends_mut().push("extra".to_string());
        }

        assert!(repodata
            .records()
            .all(|(_, record)| record.depends().last().map(String::as_str) == Some("extra")));
    }

    #[test]
    fn test_clear_records() {
        let mut repodata: RepoData = serde_json::from_value(sample()).unwrap();

        repodata.clear_records();

        assert!(repodata.is_empty());
        assert!(repodata.removed().is_empty());
        assert_eq!(repodata.subdir(), Some("linux-64"));

        let value = repodata.to_value().unwrap();
        assert_eq!(value["packages"], json!({}));
        assert_eq!(value["packages.conda"], json!({}));
        assert_eq!(value["removed"], json!([]));
    }

    #[test]
    fn test_clear_records_does_not_add_sections() {
        let mut repodata = RepoData::from_slice(br#"{"info": {"subdir": "noarch"}}"#).unwrap();

        repodata.clear_records();

        assert_eq!(
            repodata.to_value().unwrap(),
            json!({"info": {"subdir": "noarch"}})
        );
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let mut repodata = RepoData::default();
        repodata
            .packages_mut()
            .insert("a-1-0.conda".into(), PackageRecord::new("a", "1"));

        let rendered = repodata.to_pretty_json().unwrap();
        assert!(rendered.starts_with("{\n  \"packages\": {\n    \"a-1-0.conda\""));
    }
}
