//! Loading and saving `winsdk.yaml`

use super::types::WinsdkConfig;
use crate::error::{Error, Result};
use crate::warning::{Outcome, Warning};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the pinned-version configuration file
pub const CONFIG_FILE_NAME: &str = "winsdk.yaml";

/// Reads and writes the pinned-version configuration of a workspace
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Full path to the configuration file
    path: PathBuf,
}

impl ConfigStore {
    /// Store for `winsdk.yaml` inside `config_dir`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists on disk
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the configuration without failing
    ///
    /// A missing file yields an empty configuration. An unreadable or
    /// malformed file also yields an empty configuration, with a warning.
    pub fn load(&self) -> Outcome<WinsdkConfig> {
        if !self.exists() {
            debug!("No config at {}, using empty config", self.path.display());
            return Outcome::clean(WinsdkConfig::default());
        }

        match self.try_load() {
            Ok(config) => Outcome::clean(config),
            Err(e) => Outcome::degraded(
                WinsdkConfig::default(),
                Warning::new(self.path.display().to_string(), e),
            ),
        }
    }

    /// Load the configuration, failing if it is missing or malformed
    pub fn try_load(&self) -> Result<WinsdkConfig> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(self.path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        if content.trim().is_empty() {
            return Ok(WinsdkConfig::default());
        }

        let mut config: WinsdkConfig = serde_yaml_ng::from_str(&content)?;
        if config
            .packages
            .iter()
            .any(|p| p.name.trim().is_empty() || p.version.trim().is_empty())
        {
            return Err(Error::invalid_config(
                "every package entry needs a name and a version",
            ));
        }
        config.normalize();
        Ok(config)
    }

    /// Overwrite the configuration file with `config`
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place so a reader never observes a half-written file.
    pub fn save(&self, config: &WinsdkConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml_ng::to_string(config)?;
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved {} pinned packages to {}",
            config.packages.len(),
            self.path.display()
        );
        Ok(())
    }
}
