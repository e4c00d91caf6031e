//! Pinned-version configuration document

use serde::{Deserialize, Serialize};

/// A package name pinned to an exact version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePin {
    /// NuGet package id
    pub name: String,

    /// Exact dotted version
    pub version: String,
}

impl PackagePin {
    /// Create a new pin
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Contents of `winsdk.yaml`
///
/// Package names are unique ignoring case. Order is preserved so that the
/// file stays stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinsdkConfig {
    /// Pinned packages in file order
    #[serde(default)]
    pub packages: Vec<PackagePin>,
}

impl WinsdkConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the pinned version of a package (case-insensitive)
    pub fn get_version(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.version.as_str())
    }

    /// Insert or replace the pinned version of a package (case-insensitive)
    pub fn set_version(&mut self, name: impl Into<String>, version: impl Into<String>) {
        let name = name.into();
        let version = version.into();
        match self
            .packages
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.version = version,
            None => self.packages.push(PackagePin::new(name, version)),
        }
    }

    /// Whether any package is pinned
    pub fn has_pins(&self) -> bool {
        !self.packages.is_empty()
    }

    /// Collapse duplicate names (case-insensitive), keeping the last occurrence's version
    pub(crate) fn normalize(&mut self) {
        let pins = std::mem::take(&mut self.packages);
        for pin in pins {
            self.set_version(pin.name, pin.version);
        }
    }
}
