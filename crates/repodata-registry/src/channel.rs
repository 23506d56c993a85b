//! Channel context handed to transformations.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{
    error::{RegistryError, Result},
    repodata::REPODATA_FN,
};

/// A single subdir of a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    /// Channel name, e.g. `conda-forge` or `pkgs/main`.
    pub name: String,

    /// Subdir such as `linux-64` or `noarch`.
    pub subdir: String,

    /// Channel root URL. Always ends with a `/`.
    pub base_url: Url,
}

impl Channel {
    pub fn new(name: impl Into<String>, subdir: impl Into<String>, base_url: Url) -> Self {
        Self {
            name: name.into(),
            subdir: subdir.into(),
            base_url: with_trailing_slash(base_url),
        }
    }

    /// Resolves a channel spec for the given subdir.
    ///
    /// A spec is either a bare name resolved against `channel_alias`, an
    /// `http(s)://` or `file://` URL, or an absolute filesystem path.
    pub fn from_spec(spec: &str, channel_alias: &str, subdir: &str) -> Result<Self> {
        let spec = spec.trim().trim_end_matches('/');
        if spec.is_empty() {
            return Err(RegistryError::InvalidChannel(spec.to_string()));
        }

        let alias = parse_url(&format!("{}/", channel_alias.trim_end_matches('/')))?;

        if spec.contains("://") {
            let url = with_trailing_slash(parse_url(spec)?);
            let name = match url.as_str().strip_prefix(alias.as_str()) {
                Some(relative) if !relative.is_empty() => relative.trim_end_matches('/').to_string(),
                _ => last_segment(&url).ok_or_else(|| RegistryError::InvalidChannel(spec.into()))?,
            };
            return Ok(Self::new(name, subdir, url));
        }

        let path = Path::new(spec);
        if path.is_absolute() {
            let url = Url::from_directory_path(path)
                .map_err(|_| RegistryError::InvalidChannel(spec.to_string()))?;
            let name =
                last_segment(&url).ok_or_else(|| RegistryError::InvalidChannel(spec.into()))?;
            return Ok(Self::new(name, subdir, url));
        }

        let url = alias
            .join(&format!("{spec}/"))
            .map_err(|err| RegistryError::InvalidUrl(err.to_string()))?;
        Ok(Self::new(spec, subdir, url))
    }

    /// URL of the channel subdir, ending with a `/`.
    pub fn url(&self) -> Result<Url> {
        self.base_url
            .join(&format!("{}/", self.subdir))
            .map_err(|err| RegistryError::InvalidUrl(err.to_string()))
    }

    pub fn repodata_url(&self) -> Result<Url> {
        self.url()?
            .join(REPODATA_FN)
            .map_err(|err| RegistryError::InvalidUrl(err.to_string()))
    }

    /// Location of this channel's repodata below an output directory:
    /// `<root>/<channel-name>/<subdir>/repodata.json`.
    pub fn output_path<P: AsRef<Path>>(&self, root: P) -> PathBuf {
        let mut path = root.as_ref().to_path_buf();
        path.extend(self.name.split('/').filter(|part| !part.is_empty()));
        path.push(&self.subdir);
        path.push(REPODATA_FN);
        path
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.subdir)
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|err| RegistryError::InvalidUrl(format!("{value}: {err}")))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn last_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(String::from)
}
