use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use nu_ansi_term::Color::{Blue, Cyan};
use repodata_registry::{Channel, RepoData, RepodataSource};
use repodata_transform::patch_repodata;
use tracing::{debug, info};

use crate::{
    error::{CliError, CliResult, ErrorContext},
    utils::Colored,
};

/// Repodata of one channel subdir before and after patching.
#[derive(Debug)]
pub struct Target {
    pub channel: Channel,
    pub original: RepoData,
    pub patched: RepoData,
}

/// Expands channel specs into one [`Channel`] per subdir, channel-major.
pub fn resolve_channels(
    specs: &[String],
    subdirs: &[String],
    channel_alias: &str,
) -> CliResult<Vec<Channel>> {
    let mut channels = Vec::with_capacity(specs.len() * subdirs.len());
    for spec in specs {
        for subdir in subdirs {
            channels.push(Channel::from_spec(spec, channel_alias, subdir)?);
        }
    }
    Ok(channels)
}

/// Fetches every channel and runs the repodata patches over a copy.
pub fn load_targets<S: RepodataSource>(
    source: &S,
    channels: Vec<Channel>,
) -> CliResult<Vec<Target>> {
    channels
        .into_iter()
        .map(|channel| {
            let original = source.fetch(&channel)?;
            let patched = patch_repodata(&channel, original.clone())?;
            debug!(
                "{}: {} records, {} after patching",
                channel,
                original.len(),
                patched.len()
            );
            Ok(Target {
                channel,
                original,
                patched,
            })
        })
        .collect()
}

fn write_repodata(path: &Path, repodata: &RepoData) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, repodata.to_pretty_json()?)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", Colored(Blue, path.display()));
    Ok(())
}

/// Writes patched repodata below `output`.
///
/// A directory output, or more than one target, produces
/// `<output>/<channel>/<subdir>/repodata.json` per target. Otherwise the
/// single target is written to `output` itself. Existing files are only
/// replaced with `force`.
pub fn write_output(targets: &[Target], output: &Path, force: bool) -> CliResult<Vec<PathBuf>> {
    if output.is_file() && !force {
        return Err(CliError::OutputExists(output.to_path_buf()));
    }

    if output.is_dir() || targets.len() > 1 {
        let mut written = Vec::with_capacity(targets.len());
        for target in targets {
            let path = target.channel.output_path(output);
            if path.is_file() && !force {
                return Err(CliError::OutputExists(path));
            }
            write_repodata(&path, &target.patched)?;
            written.push(path);
        }
        return Ok(written);
    }

    match targets.first() {
        Some(target) => {
            write_repodata(output, &target.patched)?;
            Ok(vec![output.to_path_buf()])
        }
        None => Ok(Vec::new()),
    }
}

/// Prints the single patched document.
pub fn dump_stdout<W: Write>(targets: &[Target], mut writer: W) -> CliResult<()> {
    let target = match targets {
        [target] => target,
        [] => return Ok(()),
        _ => return Err(CliError::TooManyTargets),
    };

    debug!("Dumping {} to stdout", Colored(Cyan, &target.channel));
    writeln!(writer, "{}", target.patched.to_pretty_json()?)
        .with_context(|| "writing to stdout".to_string())?;
    Ok(())
}
