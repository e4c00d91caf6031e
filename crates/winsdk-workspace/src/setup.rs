//! Workspace setup: `init`, `setup` and `restore`
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! NotInitialized → ConfigResolution → PackageAcquisition → Layout
//!     → ProjectionGeneration → ConfigPersist → ManifestGeneration
//!     → CertificateGeneration → IgnoreFileUpdate → Done
//! ```
//!
//! Manifest and certificate generation only run for `init`. Every stage
//! except the certificate and the ignore-file update aborts the run on
//! failure. Those two, like the per-file layout copies, only add warnings to
//! the report.

use crate::error::{Error, Result};
use crate::gitignore::{add_certificate_to_gitignore, update_gitignore};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use winsdk_core::config::{ConfigStore, WinsdkConfig};
use winsdk_core::paths::WorkspaceLayout;
use winsdk_core::sdk::{BUILD_TOOLS_PACKAGE, SDK_PACKAGES};
use winsdk_core::utils::{default_package_name, default_publisher};
use winsdk_core::{Arch, CancelToken, ConfirmationPort, Outcome, Warning};
use winsdk_packages::{
    AcquisitionOptions, NuGetFeed, PackageAcquisitionService, PackageCache,
    PackageLayoutService, PackageRequest, PackageSet,
};
use winsdk_tools::certificate::{DEFAULT_CERT_FILE, DEFAULT_CERT_PASSWORD, DEFAULT_VALID_DAYS};
use winsdk_tools::manifest::{find_manifest_in, generate_manifest};
use winsdk_tools::{
    infer_publisher, BuildToolLocator, BuildToolsService, CertificateService, ManifestOptions,
    PowerShell, ProjectionGenerator, ToolRunner,
};

/// Stages of a setup run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStage {
    NotInitialized,
    ConfigResolution,
    PackageAcquisition,
    Layout,
    ProjectionGeneration,
    ConfigPersist,
    ManifestGeneration,
    CertificateGeneration,
    IgnoreFileUpdate,
    Done,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotInitialized => "workspace",
            Self::ConfigResolution => "configuration",
            Self::PackageAcquisition => "packages",
            Self::Layout => "layout",
            Self::ProjectionGeneration => "projection",
            Self::ConfigPersist => "save configuration",
            Self::ManifestGeneration => "manifest",
            Self::CertificateGeneration => "certificate",
            Self::IgnoreFileUpdate => "gitignore",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Options shared by `init`, `setup` and `restore`
#[derive(Debug, Clone)]
pub struct WorkspaceSetupOptions {
    /// Directory receiving `.winsdk`
    pub base_dir: PathBuf,

    /// Directory holding `winsdk.yaml`
    pub config_dir: PathBuf,

    /// Consider prerelease versions when resolving latest
    pub include_prerelease: bool,

    /// Do not consult pinned versions
    pub ignore_config: bool,

    /// Leave `.gitignore` untouched
    pub no_gitignore: bool,

    /// Answer the update-pins question with yes without asking
    pub assume_yes: bool,

    /// Install exactly the pinned packages; fail without a configuration
    pub require_existing_config: bool,

    /// Resolve BuildTools to the latest version even when pinned
    pub force_latest_build_tools: bool,

    /// Resolve versions and write the configuration, installing nothing
    pub config_only: bool,

    /// Generate `appxmanifest.xml` and a development certificate
    pub init_assets: bool,

    /// Skip the development certificate
    pub no_cert: bool,
}

impl WorkspaceSetupOptions {
    /// Options for `setup` in `base_dir`, with the configuration next to it
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            config_dir: base_dir.clone(),
            base_dir,
            include_prerelease: false,
            ignore_config: false,
            no_gitignore: false,
            assume_yes: false,
            require_existing_config: false,
            force_latest_build_tools: false,
            config_only: false,
            init_assets: false,
            no_cert: false,
        }
    }

    /// Options for `init`: latest BuildTools, a manifest and a certificate
    pub fn init(base_dir: impl Into<PathBuf>) -> Self {
        let mut options = Self::new(base_dir).with_force_latest_build_tools(true);
        options.init_assets = true;
        options
    }

    /// Options for `restore`: exactly the pins, never prompting
    pub fn restore(base_dir: impl Into<PathBuf>) -> Self {
        let mut options = Self::new(base_dir);
        options.require_existing_config = true;
        options
    }

    /// Read and write the configuration in `dir`
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Include prerelease versions
    pub fn with_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Ignore pinned versions
    pub fn with_ignore_config(mut self, ignore: bool) -> Self {
        self.ignore_config = ignore;
        self
    }

    /// Skip the `.gitignore` update
    pub fn with_no_gitignore(mut self, skip: bool) -> Self {
        self.no_gitignore = skip;
        self
    }

    /// Do not prompt
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Force the latest BuildTools
    pub fn with_force_latest_build_tools(mut self, force: bool) -> Self {
        self.force_latest_build_tools = force;
        self
    }

    /// Only write the configuration
    pub fn with_config_only(mut self, config_only: bool) -> Self {
        self.config_only = config_only;
        self
    }

    /// Do not generate a development certificate
    pub fn with_no_cert(mut self, no_cert: bool) -> Self {
        self.no_cert = no_cert;
        self
    }
}

/// Result of a setup run
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    /// Workspace root
    pub workspace: PathBuf,

    /// Configuration file written or used
    pub config_path: PathBuf,

    /// Every package and version the workspace now uses
    pub packages: PackageSet,

    /// Version each requested package resolved to
    pub requested: PackageSet,

    /// Packages downloaded by this run
    pub installed: Vec<String>,

    /// Stages completed, in order
    pub stages: Vec<SetupStage>,

    /// Manifest generated or reused by `init`
    pub manifest_path: Option<PathBuf>,

    /// Development certificate generated or reused by `init`
    pub certificate_path: Option<PathBuf>,

    /// Whether `.gitignore` was changed
    pub gitignore_updated: bool,

    /// Non-fatal problems
    pub warnings: Vec<Warning>,
}

impl SetupReport {
    fn complete(&mut self, stage: SetupStage) {
        debug!("Stage complete: {}", stage);
        self.stages.push(stage);
    }

    fn absorb<T>(&mut self, outcome: Outcome<T>) -> T {
        let (value, warnings) = outcome.into_parts();
        self.warnings.extend(warnings);
        value
    }
}

/// Decision taken while resolving the configuration
struct ResolvedConfig {
    store: ConfigStore,
    existing: Option<WinsdkConfig>,
    ignore_config: bool,
}

/// Drives a workspace from nothing to generated projection headers
pub struct WorkspaceSetupService {
    /// Package feed
    feed: Arc<dyn NuGetFeed>,

    /// Dependent-package cache shared by every workspace
    cache: PackageCache,

    /// Runs cppwinrt and the BuildTools executables
    tools: ToolRunner,

    /// Answers the update-pins question
    confirm: Arc<dyn ConfirmationPort>,

    /// Architecture BuildTools are resolved for
    host: Arch,

    layout_service: PackageLayoutService,
}

impl WorkspaceSetupService {
    /// Create a setup service
    pub fn new(
        feed: Arc<dyn NuGetFeed>,
        cache: PackageCache,
        tools: ToolRunner,
        confirm: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            feed,
            cache,
            tools,
            confirm,
            host: Arch::host(),
            layout_service: PackageLayoutService::new(),
        }
    }

    /// Resolve BuildTools for `host` instead of the running machine
    pub fn with_host(mut self, host: Arch) -> Self {
        self.host = host;
        self
    }

    pub(crate) fn feed(&self) -> &Arc<dyn NuGetFeed> {
        &self.feed
    }

    pub(crate) fn tools(&self) -> &ToolRunner {
        &self.tools
    }

    pub(crate) fn host(&self) -> Arch {
        self.host
    }

    pub(crate) fn acquisition(
        &self,
        layout: &WorkspaceLayout,
        store: Option<ConfigStore>,
    ) -> PackageAcquisitionService {
        let service =
            PackageAcquisitionService::new(self.feed.clone(), layout.clone(), self.cache.clone());
        match store {
            Some(store) => service.with_config(store),
            None => service,
        }
    }

    /// Run the setup stages
    pub async fn setup(
        &self,
        options: &WorkspaceSetupOptions,
        cancel: &CancelToken,
    ) -> Result<SetupReport> {
        let layout = WorkspaceLayout::discover(&options.base_dir);
        let mut report = SetupReport {
            workspace: layout.root().to_path_buf(),
            ..Default::default()
        };

        // NotInitialized
        cancel.check()?;
        layout.ensure_created()?;
        info!("Workspace: {}", layout.root().display());
        report.complete(SetupStage::NotInitialized);

        let config = self.resolve_config(options, &mut report)?;
        report.config_path = config.store.path().to_path_buf();
        report.complete(SetupStage::ConfigResolution);

        let requests = self.package_requests(options, &config, cancel).await?;
        let acquisition = self.acquisition(&layout, Some(config.store.clone()));
        let acquisition_options = AcquisitionOptions {
            include_prerelease: options.include_prerelease,
            ignore_config: config.ignore_config,
        };

        if options.config_only {
            let resolved = acquisition
                .resolve_versions(&requests, &acquisition_options, cancel)
                .await?;
            report.requested = report.absorb(resolved);
            report.complete(SetupStage::PackageAcquisition);
            self.persist_config(options, &config, &requests, &mut report)?;
            report.complete(SetupStage::Done);
            return Ok(report);
        }

        info!("Installing {} packages", requests.len());
        let installed = acquisition
            .install_packages(&requests, &acquisition_options, cancel)
            .await?;
        report.warnings.extend(installed.warnings);
        report.packages = installed.packages;
        report.requested = installed.requested;
        report.installed = installed.installed;
        report.complete(SetupStage::PackageAcquisition);

        self.lay_out(&layout, &mut report);
        report.complete(SetupStage::Layout);

        self.generate_projection(&layout, &report.packages, cancel)
            .await?;
        report.complete(SetupStage::ProjectionGeneration);

        self.persist_config(options, &config, &requests, &mut report)?;

        if options.init_assets {
            let manifest = self.ensure_manifest(&layout)?;
            report.manifest_path = Some(manifest.clone());
            report.complete(SetupStage::ManifestGeneration);

            if options.no_cert {
                debug!("Skipping development certificate");
            } else {
                self.ensure_certificate(&layout, &config.store, &manifest, &mut report, cancel)
                    .await?;
                report.complete(SetupStage::CertificateGeneration);
            }
        }

        if options.no_gitignore {
            debug!("Skipping .gitignore update");
        } else if let Some(project_dir) = layout.project_dir() {
            report.gitignore_updated = report.absorb(update_gitignore(project_dir));
            let cert_file = report
                .certificate_path
                .as_ref()
                .filter(|path| path.parent() == Some(project_dir))
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().to_string());
            if let Some(cert_file) = cert_file {
                let added = report.absorb(add_certificate_to_gitignore(project_dir, &cert_file));
                report.gitignore_updated |= added;
            }
        }
        report.complete(SetupStage::IgnoreFileUpdate);

        info!("Workspace ready: {}", layout.root().display());
        report.complete(SetupStage::Done);
        Ok(report)
    }

    /// Load the configuration and settle whether its pins apply
    fn resolve_config(
        &self,
        options: &WorkspaceSetupOptions,
        report: &mut SetupReport,
    ) -> Result<ResolvedConfig> {
        let store = ConfigStore::new(&options.config_dir);
        let display_path = store.path().display().to_string();

        if !store.exists() {
            if options.require_existing_config {
                return Err(Error::config_required(display_path));
            }
            debug!("No configuration at {}", display_path);
            return Ok(ResolvedConfig {
                store,
                existing: None,
                ignore_config: options.ignore_config,
            });
        }

        let existing = report.absorb(store.load());
        if options.require_existing_config {
            if !existing.has_pins() {
                return Err(Error::no_pinned_packages(display_path));
            }
            return Ok(ResolvedConfig {
                store,
                existing: Some(existing),
                ignore_config: false,
            });
        }

        let mut ignore_config = options.ignore_config;
        if existing.has_pins() && !ignore_config {
            let prompt = format!(
                "{} pins {} package versions. Update them to the latest versions?",
                display_path,
                existing.packages.len()
            );
            ignore_config = options.assume_yes || self.confirm.confirm(&prompt);
            if ignore_config {
                info!("Updating pinned packages to the latest versions");
            } else {
                info!("Using pinned versions from {}", display_path);
            }
        }

        Ok(ResolvedConfig {
            store,
            existing: Some(existing),
            ignore_config,
        })
    }

    async fn package_requests(
        &self,
        options: &WorkspaceSetupOptions,
        config: &ResolvedConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<PackageRequest>> {
        if options.require_existing_config {
            let pins = config
                .existing
                .as_ref()
                .map(|c| c.packages.as_slice())
                .unwrap_or_default();
            return Ok(pins
                .iter()
                .map(|pin| PackageRequest::exact(&pin.name, &pin.version))
                .collect());
        }

        let mut requests = Vec::with_capacity(SDK_PACKAGES.len());
        for name in SDK_PACKAGES {
            if options.force_latest_build_tools && name == BUILD_TOOLS_PACKAGE {
                let latest = self
                    .feed
                    .get_latest_version(name, options.include_prerelease, cancel)
                    .await?;
                requests.push(PackageRequest::exact(name, latest));
            } else {
                requests.push(PackageRequest::new(name));
            }
        }
        Ok(requests)
    }

    /// Copy headers, libraries, runtimes and the license into the workspace
    fn lay_out(&self, layout: &WorkspaceLayout, report: &mut SetupReport) {
        let packages_dir = layout.packages_dir();

        let headers = report.absorb(
            self.layout_service
                .copy_includes(&packages_dir, &layout.include_dir()),
        );
        let libs = report.absorb(
            self.layout_service
                .copy_libs_all_arch(&packages_dir, &layout.lib_dir()),
        );
        let runtimes = report.absorb(
            self.layout_service
                .copy_runtimes_all_arch(&packages_dir, &layout.bin_dir()),
        );
        let license = self.layout_service.copy_license(
            &packages_dir,
            &report.packages,
            &layout.share_dir(),
        );
        if let Some(path) = report.absorb(license) {
            debug!("License copied to {}", path.display());
        }

        info!(
            "Laid out {} headers, {} libraries, {} runtime files",
            headers, libs, runtimes
        );
    }

    async fn generate_projection(
        &self,
        layout: &WorkspaceLayout,
        used: &PackageSet,
        cancel: &CancelToken,
    ) -> Result<()> {
        let packages_dir = layout.packages_dir();
        let generator = ProjectionGenerator::new(self.tools.clone());
        let exe = generator
            .find_cppwinrt_exe(&packages_dir, used)
            .ok_or_else(|| winsdk_tools::Error::CppWinRtNotFound {
                packages_dir: packages_dir.display().to_string(),
            })?;

        let winmds = self.layout_service.find_winmds(&packages_dir, used);
        info!("Generating C++/WinRT projection from {} metadata files", winmds.len());
        generator
            .generate(
                &exe,
                &winmds,
                &layout.include_dir(),
                working_dir(layout),
                cancel,
            )
            .await?;
        Ok(())
    }

    /// The project's manifest, generated when neither the project folder nor
    /// the workspace holds one
    fn ensure_manifest(&self, layout: &WorkspaceLayout) -> Result<PathBuf> {
        let project_dir = working_dir(layout);
        let existing = find_manifest_in(project_dir).or_else(|| find_manifest_in(layout.root()));
        if let Some(existing) = existing {
            info!("Using existing manifest {}", existing.display());
            return Ok(existing);
        }

        let options = ManifestOptions::new(default_package_name(project_dir), default_publisher());
        let path = generate_manifest(project_dir, &options)?;
        info!("Generated {}", path.display());
        Ok(path)
    }

    /// Generate `devcert.pfx` in the project folder for the manifest's publisher
    ///
    /// An existing certificate is kept. A failed generation is a warning;
    /// only cancellation aborts the run.
    async fn ensure_certificate(
        &self,
        layout: &WorkspaceLayout,
        store: &ConfigStore,
        manifest: &Path,
        report: &mut SetupReport,
        cancel: &CancelToken,
    ) -> Result<()> {
        let project_dir = working_dir(layout);
        let output = project_dir.join(DEFAULT_CERT_FILE);
        if output.is_file() {
            info!("Using existing certificate {}", output.display());
            report.certificate_path = Some(output);
            return Ok(());
        }

        let publisher = infer_publisher(None, Some(manifest), project_dir);
        let generated = self
            .certificates(layout, store)
            .generate_dev_certificate(
                &publisher,
                &output,
                DEFAULT_CERT_PASSWORD,
                DEFAULT_VALID_DAYS,
                cancel,
            )
            .await;
        match generated {
            Ok(cert) => {
                info!("Generated development certificate for {}", cert.publisher);
                report.certificate_path = Some(cert.path);
            }
            Err(e) if e.is_cancelled() => return Err(e.into()),
            Err(e) => report.warnings.push(Warning::new("development certificate", e)),
        }
        Ok(())
    }

    fn certificates(&self, layout: &WorkspaceLayout, store: &ConfigStore) -> CertificateService {
        let acquisition = Arc::new(self.acquisition(layout, Some(store.clone())));
        let locator = BuildToolLocator::new(layout.clone(), self.host).with_config(store.clone());
        let build_tools = BuildToolsService::new(locator, acquisition, self.tools.clone());
        CertificateService::new(PowerShell::new(self.tools.clone()), build_tools)
    }

    /// Save the resolved top-level versions unless replaying pins
    fn persist_config(
        &self,
        options: &WorkspaceSetupOptions,
        config: &ResolvedConfig,
        requests: &[PackageRequest],
        report: &mut SetupReport,
    ) -> Result<()> {
        if options.require_existing_config {
            debug!("Restore leaves {} unchanged", config.store.path().display());
        } else {
            let mut updated = config.existing.clone().unwrap_or_default();
            for request in requests {
                if let Some(version) = report.requested.get(&request.name) {
                    updated.set_version(&request.name, version);
                }
            }
            config.store.save(&updated)?;
            info!("Saved {}", config.store.path().display());
        }
        report.complete(SetupStage::ConfigPersist);
        Ok(())
    }
}

fn working_dir(layout: &WorkspaceLayout) -> &Path {
    layout.project_dir().unwrap_or_else(|| layout.root())
}
