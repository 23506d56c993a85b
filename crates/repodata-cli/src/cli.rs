use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Args {
    /// Channel to fetch repodata from (repeatable, defaults to the configured channels)
    #[arg(short = 'c', long = "channel", value_name = "CHANNEL")]
    pub channels: Vec<String>,

    /// Subdir to fetch (repeatable, defaults to the configured subdirs)
    #[arg(long = "subdir", visible_alias = "platform", value_name = "SUBDIR")]
    pub subdirs: Vec<String>,

    /// Show a table comparing original and patched repodata instead of dumping it
    #[arg(long)]
    pub stats: bool,

    /// Write patched repodata to a file, or to a directory tree when it is a directory
    #[arg(short, long, value_hint = ValueHint::AnyPath)]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,

    /// List the built-in transformations and exit
    #[arg(long, conflicts_with_all = ["stats", "output", "default_config"])]
    pub list_transformations: bool,

    /// Write the default configuration file and exit
    #[arg(long, conflicts_with_all = ["stats", "output"])]
    pub default_config: bool,

    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}
