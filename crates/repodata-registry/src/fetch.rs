//! Reading a channel's repodata.
//!
//! [`ChannelSource`] is intentionally plain: it reads `repodata.json` from a
//! local channel directory or issues a single GET for it. Caching and
//! conditional requests are left to the package manager.

use std::fs;

use tracing::debug;

use crate::{
    channel::Channel,
    error::{ErrorContext, RegistryError, Result},
    http_client::shared_agent,
    repodata::RepoData,
};

/// Magic bytes for Zstandard compressed files.
pub const ZST_MAGIC_BYTES: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Anything that can produce the repodata document of a channel subdir.
pub trait RepodataSource {
    fn fetch(&self, channel: &Channel) -> Result<RepoData>;
}

/// Reads repodata from `file://` channels and fetches it from `http(s)://` channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelSource;

impl RepodataSource for ChannelSource {
    fn fetch(&self, channel: &Channel) -> Result<RepoData> {
        let url = channel.repodata_url()?;

        let content = match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| RegistryError::InvalidUrl(url.to_string()))?;
                debug!("Reading repodata from {}", path.display());
                fs::read(&path).with_context(|| format!("reading {}", path.display()))?
            }
            "http" | "https" => {
                debug!("Fetching repodata from {}", url);
                let resp = shared_agent()
                    .get(url.as_str())
                    .call()
                    .map_err(|err| RegistryError::FailedToFetchRemote(format!("{url}: {err}")))?;

                if !resp.status().is_success() {
                    return Err(RegistryError::FailedToFetchRemote(format!(
                        "{url} [{}]",
                        resp.status()
                    )));
                }

                resp.into_body()
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()?
            }
            scheme => return Err(RegistryError::UnsupportedScheme(scheme.to_string())),
        };

        parse_repodata(content)
    }
}

/// Parses raw repodata bytes, transparently decompressing zstd content.
pub fn parse_repodata(content: Vec<u8>) -> Result<RepoData> {
    if content.starts_with(&ZST_MAGIC_BYTES) {
        let decoded = zstd::decode_all(content.as_slice())
            .map_err(|e| RegistryError::Custom(format!("decoding zstd repodata: {e}")))?;
        return RepoData::from_slice(&decoded);
    }

    RepoData::from_slice(&content)
}
