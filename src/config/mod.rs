//! Layered configuration
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `~/.acquiacli/acquiacli.yml`
//! 3. Project config: `./acquiacli.yml`
//! 4. Environment variables: `ACQUIACLI_*`

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AcquiaError, Result};

pub const CONFIG_FILE_NAME: &str = "acquiacli.yml";
pub const GLOBAL_CONFIG_DIR: &str = ".acquiacli";
pub const ENV_PREFIX: &str = "ACQUIACLI_";

pub const DEFAULT_TIMEZONE: &str = "Australia/Sydney";
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_TASKWAIT: u64 = 5;
pub const DEFAULT_TIMEOUT: u64 = 300;

/// API key pair from the Cloud UI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// Display and polling settings (`extraconfig` section)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtraConfig {
    /// IANA timezone used to display timestamps
    pub timezone: String,
    /// strftime-style format used to display timestamps
    pub format: String,
    /// Seconds between notification polls
    pub taskwait: u64,
    /// Seconds before giving up on a notification
    pub timeout: u64,
}

impl Default for ExtraConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            taskwait: DEFAULT_TASKWAIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ExtraConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.taskwait)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Effective configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub acquia: Credentials,
    pub extraconfig: ExtraConfig,
}

impl Settings {
    pub fn with_credentials(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            acquia: Credentials {
                key: key.into(),
                secret: secret.into(),
            },
            extraconfig: ExtraConfig::default(),
        }
    }

    /// Overlay wins for every field it sets
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let acquia = &overlay.acquia;
        let extra = &overlay.extraconfig;

        Self {
            acquia: Credentials {
                key: acquia.key.clone().unwrap_or_else(|| self.acquia.key.clone()),
                secret: acquia
                    .secret
                    .clone()
                    .unwrap_or_else(|| self.acquia.secret.clone()),
            },
            extraconfig: ExtraConfig {
                timezone: extra
                    .timezone
                    .clone()
                    .unwrap_or_else(|| self.extraconfig.timezone.clone()),
                format: extra
                    .format
                    .clone()
                    .unwrap_or_else(|| self.extraconfig.format.clone()),
                taskwait: extra.taskwait.unwrap_or(self.extraconfig.taskwait),
                timeout: extra.timeout.unwrap_or(self.extraconfig.timeout),
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawExtraConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taskwait: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// One configuration layer; `None` means "not set here, inherit"
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawSettings {
    pub acquia: RawCredentials,
    pub extraconfig: RawExtraConfig,
}

impl RawSettings {
    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Build the environment layer from `ACQUIACLI_*` variables
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let seconds = |name: &str| -> Result<Option<u64>> {
            var(name)
                .map(|value| {
                    value.trim().parse::<u64>().map_err(|_| {
                        AcquiaError::InvalidConfig(format!(
                            "{}{} must be a number of seconds, got '{}'",
                            ENV_PREFIX, name, value
                        ))
                    })
                })
                .transpose()
        };

        let layer = Self {
            acquia: RawCredentials {
                key: var("KEY"),
                secret: var("SECRET"),
            },
            extraconfig: RawExtraConfig {
                timezone: var("TIMEZONE"),
                format: var("FORMAT"),
                taskwait: seconds("TASKWAIT")?,
                timeout: seconds("TIMEOUT")?,
            },
        };
        layer.validate(&format!("{}TASKWAIT", ENV_PREFIX))?;

        Ok(layer)
    }

    /// `taskwait` is the poll interval and must be at least one second
    pub fn validate(&self, source: &str) -> Result<()> {
        if self.extraconfig.taskwait == Some(0) {
            return Err(AcquiaError::InvalidConfig(format!(
                "{}: taskwait must be at least 1 second",
                source
            )));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Locations of the global and project configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub global: PathBuf,
    pub project: PathBuf,
}

impl ConfigPaths {
    pub fn new(global: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            global: global.into(),
            project: project.into(),
        }
    }

    pub fn discover() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            AcquiaError::InvalidConfig("Failed to determine home directory".to_string())
        })?;
        let cwd = std::env::current_dir()?;

        Ok(Self::new(
            home.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILE_NAME),
            cwd.join(CONFIG_FILE_NAME),
        ))
    }
}

/// A configuration file that was found on disk
#[derive(Debug, Clone)]
pub struct FileLayer {
    pub path: PathBuf,
    pub contents: String,
    pub settings: RawSettings,
}

impl FileLayer {
    fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let settings = RawSettings::parse(&contents).map_err(|e| {
            AcquiaError::InvalidConfig(format!("parse {}: {}", path.display(), e))
        })?;
        settings.validate(&path.display().to_string())?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");

        Ok(Some(Self {
            path: path.to_path_buf(),
            contents,
            settings,
        }))
    }
}

/// Every layer that makes up the running configuration
#[derive(Debug, Clone)]
pub struct ConfigLayers {
    pub paths: ConfigPaths,
    pub global: Option<FileLayer>,
    pub project: Option<FileLayer>,
    pub environment: RawSettings,
}

impl ConfigLayers {
    pub fn load<F>(paths: &ConfigPaths, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            paths: paths.clone(),
            global: FileLayer::load(&paths.global)?,
            project: FileLayer::load(&paths.project)?,
            environment: RawSettings::from_env(lookup)?,
        })
    }

    pub fn defaults(&self) -> Settings {
        Settings::default()
    }

    /// Merge all layers into the effective configuration
    pub fn resolve(&self) -> Settings {
        let mut current = self.defaults();

        for layer in [&self.global, &self.project].into_iter().flatten() {
            current = current.merge_with(&layer.settings);
        }

        current.merge_with(&self.environment)
    }
}

/// Write a configuration file readable by its owner only.
///
/// A missing parent directory is created with mode 0700.
pub fn write_config_file(path: &Path, settings: &Settings) -> Result<()> {
    let yaml = settings.to_yaml()?;
    let failure = |reason: String| AcquiaError::ConfigWriteFailure {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            create_private_dir(dir)
                .map_err(|e| failure(format!("cannot create {}: {}", dir.display(), e)))?;
        } else if !dir.is_dir() {
            return Err(failure(format!("{} is not a directory", dir.display())));
        }
    }

    write_private_file(path, yaml.as_bytes()).map_err(|e| failure(e.to_string()))?;
    tracing::info!(path = %path.display(), "Configuration file written");

    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;

    // An existing file keeps its old mode through open(), tighten it explicitly
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
