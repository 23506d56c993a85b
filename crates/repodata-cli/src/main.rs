use std::{env, io};

use clap::Parser;
use cli::Args;
use dump::{dump_stdout, load_targets, resolve_channels, write_output};
use error::{CliError, CliResult, ErrorContext};
use list::list_transformations;
use logging::setup_logging;
use repodata_config::config::{self, generate_default_config, get_config, CONFIG_PATH};
use repodata_registry::{http_client::configure_http_client, ChannelSource};
use repodata_transform::DEFAULT_REGISTRY;
use stats::display_stats;
use tracing::debug;
use utils::COLOR;

mod cli;
mod dump;
mod error;
mod list;
mod logging;
mod stats;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        let mut color = COLOR.write().unwrap();
        *color = false;
    }

    if let Some(ref path) = args.config {
        let mut config_path = CONFIG_PATH.write().unwrap();
        *config_path = if path.is_absolute() {
            path.clone()
        } else {
            env::current_dir()
                .with_context(|| "retrieving current directory".into())?
                .join(path)
        };
    }

    if args.default_config {
        generate_default_config()?;
        return Ok(());
    }

    if args.list_transformations {
        list_transformations(&DEFAULT_REGISTRY);
        return Ok(());
    }

    config::init()?;
    let config = get_config();

    let user_agent = config.get_user_agent();
    configure_http_client(|client| {
        client.user_agent = Some(user_agent);
    });

    let specs = if args.channels.is_empty() {
        config.channels.clone()
    } else {
        args.channels.clone()
    };
    let subdirs = if args.subdirs.is_empty() {
        config.get_subdirs()
    } else {
        args.subdirs.clone()
    };

    let channels = resolve_channels(&specs, &subdirs, config.get_channel_alias())?;
    if !args.stats && args.output.is_none() && channels.len() > 1 {
        return Err(CliError::TooManyTargets);
    }

    debug!(
        "Transformations: {:?}",
        repodata_transform::parse_references(&config.get_transformations())
    );
    let targets = load_targets(&ChannelSource, channels)?;

    if args.stats {
        display_stats(&targets)
    } else if let Some(ref output) = args.output {
        write_output(&targets, output, args.force).map(|_| ())
    } else {
        dump_stdout(&targets, io::stdout().lock())
    }
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
