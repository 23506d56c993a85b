use std::{
    collections::HashSet,
    env, fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, ErrorContext, Result},
    platform::current_subdir,
};

/// Environment variable holding the comma-separated transformation references.
pub const TRANSFORMATIONS_ENV: &str = "CONDA_TRANSFORMATIONS";

pub const DEFAULT_CHANNEL_ALIAS: &str = "https://conda.anaconda.org";

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Channels inspected when none are given on the command line.
    /// Default: ["conda-forge"]
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Base URL that bare channel names are resolved against.
    /// Default: "https://conda.anaconda.org"
    pub channel_alias: Option<String>,

    /// Subdirs fetched for every channel.
    /// Default: the current platform subdir and "noarch"
    pub subdirs: Option<Vec<String>>,

    /// Transformation references applied to fetched repodata, in order.
    /// Overridden by $CONDA_TRANSFORMATIONS when it is set.
    pub transformations: Option<Vec<String>>,

    /// User agent sent with repodata requests.
    /// Default: "conda-repodata/<version>"
    pub user_agent: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match env::var("CONDA_REPODATA_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => {
            xdg_config_home()
                .join("conda-repodata")
                .join("config.toml")
        }
    })
});

fn xdg_config_home() -> PathBuf {
    if let Some(path) = env::var_os("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
        .join(".config")
}

pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap();
    *global_config = Some(config);
    Ok(())
}

pub fn get_config() -> Config {
    {
        let config_guard = CONFIG.read().unwrap();
        if let Some(config) = config_guard.as_ref() {
            return config.clone();
        }
    }

    let mut config_guard = CONFIG.write().unwrap();
    config_guard
        .get_or_insert_with(Config::default_config)
        .clone()
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            channels: default_channels(),
            channel_alias: Some(DEFAULT_CHANNEL_ALIAS.to_string()),
            subdirs: Some(default_subdirs()),
            transformations: None,
            user_agent: None,
        }
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => {
                debug!("Loading configuration from {}", config_path.display());
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default_config(),
            Err(err) => {
                return Err(ConfigError::IoError {
                    action: format!("reading config {}", config_path.display()),
                    source: err,
                })
            }
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        let mut seen = HashSet::new();
        for channel in &mut self.channels {
            let trimmed = channel.trim().trim_end_matches('/');
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyChannel);
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(ConfigError::DuplicateChannel(trimmed.to_string()));
            }
            *channel = trimmed.to_string();
        }

        let alias = self
            .channel_alias
            .get_or_insert_with(|| DEFAULT_CHANNEL_ALIAS.to_string());
        let alias_lower = alias.to_lowercase();
        if !["http://", "https://", "file://"]
            .iter()
            .any(|scheme| alias_lower.starts_with(scheme))
        {
            return Err(ConfigError::InvalidChannelAlias(alias.clone()));
        }
        *alias = alias.trim_end_matches('/').to_string();

        match &self.subdirs {
            Some(subdirs) if !subdirs.is_empty() => {}
            _ => self.subdirs = Some(default_subdirs()),
        }

        Ok(())
    }

    pub fn get_channel_alias(&self) -> &str {
        self.channel_alias
            .as_deref()
            .unwrap_or(DEFAULT_CHANNEL_ALIAS)
    }

    pub fn get_subdirs(&self) -> Vec<String> {
        self.subdirs.clone().unwrap_or_else(default_subdirs)
    }

    pub fn get_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("conda-repodata/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Returns the configured transformation references as a single comma-separated value.
    ///
    /// `$CONDA_TRANSFORMATIONS` wins over the config file, even when it is empty.
    pub fn get_transformations(&self) -> String {
        if let Ok(value) = env::var(TRANSFORMATIONS_ENV) {
            return value;
        }
        self.transformations
            .as_deref()
            .map(|refs| refs.join(","))
            .unwrap_or_default()
    }
}

/// Writes the default configuration to the config path.
///
/// Refuses to overwrite an existing configuration file.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(config_path));
    }

    let serialized = toml::to_string_pretty(&Config::default_config())?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(&config_path, serialized)
        .with_context(|| format!("writing config {}", config_path.display()))?;
    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(config_path)
}

fn default_channels() -> Vec<String> {
    vec!["conda-forge".to_string()]
}

fn default_subdirs() -> Vec<String> {
    let current = current_subdir();
    if current == "noarch" {
        vec![current.to_string()]
    } else {
        vec![current.to_string(), "noarch".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.channels, vec!["conda-forge"]);
        assert_eq!(config.get_channel_alias(), "https://conda.anaconda.org");
        assert!(config.get_subdirs().contains(&current_subdir().to_string()));
        assert!(config.get_subdirs().contains(&"noarch".to_string()));
        assert!(config.transformations.is_none());
    }

    #[test]
    fn test_config_resolve_no_channels() {
        let mut config = Config::default_config();
        config.channels.clear();

        assert!(matches!(config.resolve(), Err(ConfigError::NoChannels)));
    }

    #[test]
    fn test_config_resolve_empty_channel() {
        let mut config = Config::default_config();
        config.channels.push("  ".to_string());

        assert!(matches!(config.resolve(), Err(ConfigError::EmptyChannel)));
    }

    #[test]
    fn test_config_resolve_duplicate_channel() {
        let mut config = Config::default_config();
        config.channels.push("conda-forge/".to_string());

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::DuplicateChannel(name)) if name == "conda-forge"
        ));
    }

    #[test]
    fn test_config_resolve_invalid_alias() {
        let mut config = Config::default_config();
        config.channel_alias = Some("conda.anaconda.org".to_string());

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidChannelAlias(_))
        ));
    }

    #[test]
    fn test_config_resolve_sets_defaults() {
        let mut config = Config::default_config();
        config.channel_alias = None;
        config.subdirs = Some(Vec::new());

        config.resolve().unwrap();

        assert_eq!(
            config.channel_alias.as_deref(),
            Some("https://conda.anaconda.org")
        );
        assert_eq!(config.get_subdirs(), default_subdirs());
    }

    #[test]
    fn test_config_resolve_trims_alias() {
        let mut config = Config::default_config();
        config.channel_alias = Some("https://mirror.example.com/conda/".to_string());

        config.resolve().unwrap();

        assert_eq!(config.get_channel_alias(), "https://mirror.example.com/conda");
    }

    #[test]
    fn test_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
            channels = ["defaults", "conda-forge"]
            subdirs = ["linux-64"]
            transformations = ["samples:hotfix", "samples:only_python"]
            "#,
        )
        .unwrap();

        assert_eq!(config.channels, vec!["defaults", "conda-forge"]);
        assert_eq!(config.get_subdirs(), vec!["linux-64"]);
        assert!(config.channel_alias.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.channels, config.channels);
        assert_eq!(deserialized.subdirs, config.subdirs);
    }

    #[test]
    #[serial]
    fn test_transformations_from_config() {
        with_env(vec![(TRANSFORMATIONS_ENV, None)], || {
            let mut config = Config::default_config();
            config.transformations =
                Some(vec!["samples:hotfix".into(), "samples:only_python".into()]);

            assert_eq!(
                config.get_transformations(),
                "samples:hotfix,samples:only_python"
            );
        });
    }

    #[test]
    #[serial]
    fn test_transformations_env_override() {
        with_env(vec![(TRANSFORMATIONS_ENV, Some("samples.noarch"))], || {
            let mut config = Config::default_config();
            config.transformations = Some(vec!["samples:hotfix".into()]);

            assert_eq!(config.get_transformations(), "samples.noarch");
        });
    }

    #[test]
    #[serial]
    fn test_transformations_unset() {
        with_env(vec![(TRANSFORMATIONS_ENV, None)], || {
            assert_eq!(Config::default_config().get_transformations(), "");
        });
    }

    #[test]
    #[serial]
    fn test_config_new_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "channels = [\"bioconda\"]\n").unwrap();

        let previous = CONFIG_PATH.read().unwrap().clone();
        *CONFIG_PATH.write().unwrap() = path;

        let config = Config::new();
        *CONFIG_PATH.write().unwrap() = previous;

        let config = config.unwrap();
        assert_eq!(config.channels, vec!["bioconda"]);
        assert_eq!(config.get_channel_alias(), DEFAULT_CHANNEL_ALIAS);
    }

    #[test]
    #[serial]
    fn test_config_new_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let previous = CONFIG_PATH.read().unwrap().clone();
        *CONFIG_PATH.write().unwrap() = dir.path().join("missing.toml");

        let config = Config::new();
        *CONFIG_PATH.write().unwrap() = previous;

        assert_eq!(config.unwrap().channels, vec!["conda-forge"]);
    }

    #[test]
    #[serial]
    fn test_generate_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let previous = CONFIG_PATH.read().unwrap().clone();
        *CONFIG_PATH.write().unwrap() = path.clone();

        let first = generate_default_config();
        let second = generate_default_config();
        *CONFIG_PATH.write().unwrap() = previous;

        assert_eq!(first.unwrap(), path);
        assert!(matches!(second, Err(ConfigError::ConfigAlreadyExists(_))));

        let saved: Config = toml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved.channels, vec!["conda-forge"]);
    }
}
