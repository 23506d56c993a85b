use nu_ansi_term::Color::{Blue, Cyan};
use repodata_transform::Registry;
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::info;

use crate::utils::{term_width, Colored};

/// Rows of `module`, `attribute` for every registered transformation.
pub fn transformation_rows(registry: &Registry) -> Vec<[String; 2]> {
    registry
        .references()
        .into_iter()
        .filter_map(|reference| {
            let (module, attribute) = reference.split_once(':')?;
            Some([module.to_string(), attribute.to_string()])
        })
        .collect()
}

pub fn list_transformations(registry: &Registry) {
    let rows = transformation_rows(registry);

    let mut builder = Builder::new();
    builder.push_record(["module", "attribute"]);
    for [module, attribute] in &rows {
        builder.push_record([
            Colored(Cyan, module).to_string(),
            Colored(Blue, attribute).to_string(),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Built-in Transformations"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string();

    info!("\n{table}");
    info!("Reference them as `module:attribute` or `module.attribute`, or pass a transformation file path.");
}
