//! Repodata documents and channels for conda-repodata.
//!
//! This crate provides the typed repodata document that transformations
//! operate on, the channel context handed to them, and a minimal source that
//! reads a channel's `repodata.json` either from a local directory or over
//! HTTP.
//!
//! # Example
//!
//! ```no_run
//! use repodata_registry::{Channel, ChannelSource, RepodataSource};
//!
//! fn dump(spec: &str) -> repodata_registry::Result<()> {
//!     let channel = Channel::from_spec(spec, "https://conda.anaconda.org", "noarch")?;
//!     let repodata = ChannelSource.fetch(&channel)?;
//!     println!("{} has {} records", channel, repodata.len());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod repodata;

pub use channel::Channel;
pub use error::{ErrorContext, RegistryError, Result};
pub use fetch::{parse_repodata, ChannelSource, RepodataSource, ZST_MAGIC_BYTES};
pub use repodata::{ChannelInfo, PackageRecord, RepoData, REPODATA_FN};
