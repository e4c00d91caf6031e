//! `update`: move every pin to the latest published version

use crate::error::{Error, Result};
use crate::setup::WorkspaceSetupService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use winsdk_core::config::ConfigStore;
use winsdk_core::paths::WorkspaceLayout;
use winsdk_core::version::compare_versions;
use winsdk_core::{CancelToken, Warning};
use winsdk_packages::{AcquisitionOptions, PackageRequest};
use winsdk_tools::{BuildToolLocator, BuildToolsService};

/// Options for an update run
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Directory holding `.winsdk`
    pub base_dir: PathBuf,

    /// Directory holding `winsdk.yaml`
    pub config_dir: PathBuf,

    /// Consider prerelease versions
    pub include_prerelease: bool,
}

impl UpdateOptions {
    /// Update the workspace in `base_dir` with the configuration next to it
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            config_dir: base_dir.clone(),
            base_dir,
            include_prerelease: false,
        }
    }
}

/// A pin moved to another version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinChange {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Result of an update run
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    /// Pins that moved
    pub changed: Vec<PinChange>,

    /// Pins already at the latest version
    pub unchanged: Vec<String>,

    /// BuildTools bin folder after the update
    pub build_tools_bin: PathBuf,

    /// Lookups that failed and other non-fatal problems
    pub warnings: Vec<Warning>,
}

impl WorkspaceSetupService {
    /// Query the latest version of every pinned package, save and install
    /// the ones that changed, then make sure the latest BuildTools are present
    ///
    /// A failed lookup keeps the current pin and is reported as a warning.
    /// Without a configuration only the BuildTools step runs.
    pub async fn update(
        &self,
        options: &UpdateOptions,
        cancel: &CancelToken,
    ) -> Result<UpdateReport> {
        let layout = WorkspaceLayout::discover(&options.base_dir);
        layout.ensure_created()?;
        let store = ConfigStore::new(&options.config_dir);
        let mut report = UpdateReport::default();

        if store.exists() {
            let (mut config, warnings) = store.load().into_parts();
            report.warnings.extend(warnings);

            for pin in config.packages.clone() {
                cancel.check()?;
                let latest = match self
                    .feed()
                    .get_latest_version(&pin.name, options.include_prerelease, cancel)
                    .await
                {
                    Ok(latest) => latest,
                    Err(winsdk_core::Error::Cancelled) => {
                        return Err(winsdk_core::Error::Cancelled.into())
                    }
                    Err(e) => {
                        report.warnings.push(Warning::new(&pin.name, e));
                        continue;
                    }
                };

                if compare_versions(&latest, &pin.version).is_eq() {
                    debug!("{} is up to date ({})", pin.name, pin.version);
                    report.unchanged.push(pin.name);
                    continue;
                }

                info!("{}: {} → {}", pin.name, pin.version, latest);
                config.set_version(&pin.name, &latest);
                report.changed.push(PinChange {
                    name: pin.name,
                    from: pin.version,
                    to: latest,
                });
            }

            if !report.changed.is_empty() {
                store.save(&config)?;
                info!("Saved {}", store.path().display());

                let requests: Vec<PackageRequest> = report
                    .changed
                    .iter()
                    .map(|change| PackageRequest::exact(&change.name, &change.to))
                    .collect();
                let installed = self
                    .acquisition(&layout, Some(store.clone()))
                    .install_packages(&requests, &AcquisitionOptions::default(), cancel)
                    .await?;
                report.warnings.extend(installed.warnings);
            }
        } else {
            info!("No {} found, updating BuildTools only", store.path().display());
        }

        let acquisition = Arc::new(self.acquisition(&layout, Some(store.clone())));
        let locator = BuildToolLocator::new(layout, self.host()).with_config(store);
        let build_tools = BuildToolsService::new(locator, acquisition, self.tools().clone());
        report.build_tools_bin = build_tools
            .ensure_build_tools(true, cancel)
            .await?
            .ok_or(Error::BuildToolsUnavailable)?;

        Ok(report)
    }
}
