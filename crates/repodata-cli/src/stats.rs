use std::collections::BTreeSet;

use nu_ansi_term::Color::{Cyan, Green};
use repodata_registry::RepoData;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::info;

use crate::{
    dump::Target,
    error::CliResult,
    utils::{term_width, Colored},
};

/// Collections larger than this are shown as their length.
const CUTOFF: usize = 5;

/// Renders one cell of the stats table.
pub fn pretty_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) if items.len() > CUTOFF => items.len().to_string(),
        Some(Value::Object(map)) if map.len() > CUTOFF => map.len().to_string(),
        Some(value) => value.to_string(),
    }
}

/// Rows of `field`, `original`, `patched` over the sorted union of top-level keys.
pub fn stats_rows(original: &RepoData, patched: &RepoData) -> CliResult<Vec<[String; 3]>> {
    let original = original.to_value()?;
    let patched = patched.to_value()?;

    let keys: BTreeSet<&String> = original
        .as_object()
        .into_iter()
        .chain(patched.as_object())
        .flat_map(|map| map.keys())
        .collect();

    Ok(keys
        .into_iter()
        .map(|key| {
            [
                key.clone(),
                pretty_cell(original.get(key)),
                pretty_cell(patched.get(key)),
            ]
        })
        .collect())
}

pub fn display_stats(targets: &[Target]) -> CliResult<()> {
    for target in targets {
        let mut builder = Builder::new();
        builder.push_record(["field", "original", "patched"]);
        for row in stats_rows(&target.original, &target.patched)? {
            builder.push_record(row);
        }

        let table = builder
            .build()
            .with(Panel::header(target.channel.to_string()))
            .with(Style::rounded())
            .with(BorderCorrection {})
            .with(Width::wrap(term_width()).priority(PriorityMax::default()))
            .to_string();

        info!("\n{table}");
        info!(
            "{}: {} -> {} records",
            Colored(Cyan, &target.channel),
            target.original.len(),
            Colored(Green, target.patched.len())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use repodata_registry::PackageRecord;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pretty_cell() {
        assert_eq!(pretty_cell(None), "");
        assert_eq!(pretty_cell(Some(&Value::Null)), "");
        assert_eq!(pretty_cell(Some(&json!("linux-64"))), "linux-64");
        assert_eq!(pretty_cell(Some(&json!(1))), "1");
        assert_eq!(pretty_cell(Some(&json!(["a", "b"]))), r#"["a","b"]"#);
        assert_eq!(pretty_cell(Some(&json!({"subdir": "noarch"}))), r#"{"subdir":"noarch"}"#);
        assert_eq!(pretty_cell(Some(&json!([1, 2, 3, 4, 5]))), "[1,2,3,4,5]");
        assert_eq!(pretty_cell(Some(&json!([1, 2, 3, 4, 5, 6]))), "6");
    }

    #[test]
    fn test_stats_rows() {
        let original: RepoData = serde_json::from_value(json!({
            "info": {"subdir": "noarch"},
            "packages": {
                "a-1-0.tar.bz2": {"name": "a", "version": "1"},
                "b-1-0.tar.bz2": {"name": "b", "version": "1"},
                "c-1-0.tar.bz2": {"name": "c", "version": "1"},
                "d-1-0.tar.bz2": {"name": "d", "version": "1"},
                "e-1-0.tar.bz2": {"name": "e", "version": "1"},
                "f-1-0.tar.bz2": {"name": "f", "version": "1"}
            },
            "repodata_version": 1
        }))
        .unwrap();
        let mut patched = original.clone();
        patched.retain_records(|_, record| record.name == "a");
        patched
            .conda_packages_mut()
            .insert("g-1-0.conda".into(), PackageRecord::new("g", "1"));

        let rows = stats_rows(&original, &patched).unwrap();
        let fields: Vec<_> = rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(
            fields,
            vec!["info", "packages", "packages.conda", "repodata_version"]
        );

        assert_eq!(rows[0][1], r#"{"subdir":"noarch"}"#);
        assert_eq!(rows[1][1], "6");
        assert_eq!(rows[1][2], r#"{"a-1-0.tar.bz2":{"name":"a","version":"1"}}"#);
        assert_eq!(rows[2][1], "");
        assert_eq!(rows[2][2], r#"{"g-1-0.conda":{"name":"g","version":"1"}}"#);
        assert_eq!(rows[3], ["repodata_version".to_string(), "1".into(), "1".into()]);
    }

    #[test]
    fn test_stats_rows_missing_removed_stays_empty() {
        let original = RepoData::from_slice(br#"{"packages": {}}"#).unwrap();
        let mut patched = original.clone();
        patched.removed = Some(vec!["a-1-0.tar.bz2".to_string()]);

        let rows = stats_rows(&original, &patched).unwrap();
        assert_eq!(
            rows,
            vec![
                ["packages".to_string(), "{}".into(), "{}".into()],
                ["removed".to_string(), "".into(), r#"["a-1-0.tar.bz2"]"#.into()],
            ]
        );
    }
}
