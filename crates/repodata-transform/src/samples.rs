//! Built-in sample transformations, registered under [`MODULE`].

use repodata_registry::{Channel, RepoData};

use crate::{error::BoxError, registry::Registry};

pub const MODULE: &str = "conda_repodata.samples";

/// Short alias of [`MODULE`].
pub const MODULE_ALIAS: &str = "samples";

pub fn register(registry: &mut Registry) {
    for module in [MODULE, MODULE_ALIAS] {
        registry.register(module, "hotfix", hotfix);
        registry.register(module, "only_python", only_python);
        registry.register(module, "only_zlib", only_zlib);
        registry.register(module, "drop_openssl", drop_openssl);
        registry.register(module, "noarch", noarch);
    }
}

/// Adds `python` to the dependencies of zlib 1.2.13.
pub fn hotfix(_: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
    for (_, record) in repodata.records_mut() {
        if record.name == "zlib" && record.version == "1.2.13" {
            record.depends_mut().push("python".to_string());
        }
    }
    Ok(repodata)
}

pub fn only_python(_: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
    repodata.retain_records(|_, record| record.name == "python");
    Ok(repodata)
}

pub fn only_zlib(_: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
    repodata.retain_records(|_, record| record.name == "zlib");
    Ok(repodata)
}

pub fn drop_openssl(_: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
    repodata.retain_records(|_, record| record.name != "openssl" || record.version != "3.0.8");
    Ok(repodata)
}

/// Empties every subdir except `noarch`.
pub fn noarch(_: &Channel, mut repodata: RepoData) -> Result<RepoData, BoxError> {
    let subdir = repodata
        .subdir()
        .ok_or("repodata has no `info.subdir`")?;
    if subdir != "noarch" {
        repodata.clear_records();
    }
    Ok(repodata)
}
