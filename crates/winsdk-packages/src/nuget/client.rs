//! HTTP client for NuGet v3 flat-container feeds
//!
//! - `GET {feed}/{id}/index.json` lists published versions
//! - `GET {feed}/{id}/{version}/{id}.{version}.nupkg` downloads a package
//!
//! Ids and versions are lowercased in feed URLs, as the protocol requires.
//! Package folders keep the casing they were requested with.

use super::extract;
use super::nuspec::{normalize_version, parse_dependencies};
use super::NuGetFeed;
use crate::PackageSet;
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use winsdk_core::config::NetworkConfig;
use winsdk_core::paths::{package_folder_name, WorkspaceLayout};
use winsdk_core::version::{is_prerelease, latest};
use winsdk_core::{CancelToken, Error, Result};

/// File name of the NuGet command-line executable
pub const NUGET_EXE: &str = "nuget.exe";

/// Response of the flat-container version index
#[derive(Debug, Deserialize)]
struct VersionIndex {
    #[serde(default)]
    versions: Vec<String>,
}

/// NuGet feed client backed by reqwest
pub struct NuGetClient {
    /// HTTP client
    client: reqwest::Client,

    /// Feed and download settings
    config: NetworkConfig,

    /// Render download progress bars
    show_progress: bool,
}

impl NuGetClient {
    /// Create a client for the configured feed
    pub fn new(config: NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::network(&config.feed_url, e))?;

        Ok(Self {
            client,
            config,
            show_progress: false,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Base URL of the feed
    pub fn feed_url(&self) -> &str {
        self.config.feed_url.trim_end_matches('/')
    }

    fn index_url(&self, package: &str) -> String {
        format!("{}/{}/index.json", self.feed_url(), package.to_lowercase())
    }

    fn package_url(&self, package: &str, version: &str) -> String {
        let id = package.to_lowercase();
        let ver = normalize_version(version);
        format!("{}/{}/{}/{}.{}.nupkg", self.feed_url(), id, ver, id, ver)
    }

    /// Every version of a package published on the feed
    pub async fn list_versions(&self, package: &str, cancel: &CancelToken) -> Result<Vec<String>> {
        let url = self.index_url(package);
        debug!("Querying versions of {} from {}", package, url);

        let response = cancel
            .run(self.client.get(&url).send())
            .await?
            .map_err(|e| Error::network(&url, e))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(Error::package_not_found(package)),
            status => {
                return Err(Error::network(
                    &url,
                    format!("unexpected status {}", status),
                ))
            }
        }

        let index: VersionIndex = cancel
            .run(response.json())
            .await?
            .map_err(|e| Error::network(&url, e))?;
        Ok(index.versions)
    }

    /// Download `url` into `dest`, returning the number of bytes written
    ///
    /// The body is streamed into a temporary sibling file that is renamed
    /// into place once complete.
    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        label: &str,
        cancel: &CancelToken,
    ) -> Result<u64> {
        let response = cancel
            .run(self.client.get(url).send())
            .await?
            .map_err(|e| Error::network(url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::package_not_found(label));
        }
        if !response.status().is_success() {
            return Err(Error::network(
                url,
                format!("download failed with status: {}", response.status()),
            ));
        }

        let total_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.parse::<u64>().ok())
            .unwrap_or(0);

        let progress = if self.show_progress {
            let pb = ProgressBar::new(total_size);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(format!("Downloading {}", label));
            Some(pb)
        } else {
            None
        };

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "download".to_string());
        let temp_path = dest.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        let result = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            let mut downloaded = 0u64;
            let mut stream = response.bytes_stream();

            while let Some(chunk_result) = cancel.run(stream.next()).await? {
                let chunk: bytes::Bytes = chunk_result.map_err(|e| Error::network(url, e))?;
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
                if let Some(pb) = &progress {
                    pb.set_position(downloaded);
                }
            }
            file.flush().await?;
            drop(file);

            tokio::fs::rename(&temp_path, dest).await?;
            Ok::<u64, Error>(downloaded)
        }
        .await;

        match &result {
            Ok(_) => {
                if let Some(pb) = progress {
                    pb.finish_with_message(format!("Downloaded {}", label));
                }
            }
            Err(_) => {
                if let Some(pb) = progress {
                    pb.abandon();
                }
                let _ = tokio::fs::remove_file(&temp_path).await;
            }
        }
        result
    }

    /// Download and extract one package version into `target`
    async fn fetch_package(
        &self,
        package: &str,
        version: &str,
        target: &Path,
        cancel: &CancelToken,
    ) -> Result<Option<String>> {
        let url = self.package_url(package, version);
        info!("Installing {} {}", package, version);

        let parent = target
            .parent()
            .ok_or_else(|| Error::archive(target.display().to_string(), "no parent directory"))?;
        let nupkg = parent.join(format!(
            ".{}.{}.nupkg",
            package_folder_name(package, version),
            uuid::Uuid::new_v4()
        ));

        match self
            .download_to(&url, &nupkg, &format!("{} {}", package, version), cancel)
            .await
        {
            Ok(bytes) => debug!("Downloaded {} bytes from {}", bytes, url),
            Err(Error::PackageNotFound { .. }) => {
                return Err(Error::version_not_resolved(
                    package,
                    format!("version {} is not published on {}", version, self.feed_url()),
                ));
            }
            Err(e) => return Err(e),
        }

        cancel.check()?;
        let target_owned = target.to_path_buf();
        let nupkg_owned = nupkg.clone();
        let extracted = tokio::task::spawn_blocking(move || {
            extract::extract_package(&nupkg_owned, &target_owned)
        })
        .await
        .map_err(|e| Error::archive(nupkg.display().to_string(), e));

        let _ = tokio::fs::remove_file(&nupkg).await;
        extracted?
    }
}

#[async_trait]
impl NuGetFeed for NuGetClient {
    async fn ensure_tool_available(
        &self,
        workspace_root: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        let exe = WorkspaceLayout::new(workspace_root)
            .tools_dir()
            .join(NUGET_EXE);
        if exe.is_file() {
            debug!("{} already present at {}", NUGET_EXE, exe.display());
            return Ok(exe);
        }

        cancel.check()?;
        info!("Downloading {} to {}", NUGET_EXE, exe.display());
        let url = self.config.nuget_exe_url.clone();
        self.download_to(&url, &exe, NUGET_EXE, cancel).await?;
        Ok(exe)
    }

    async fn get_latest_version(
        &self,
        package: &str,
        include_prerelease: bool,
        cancel: &CancelToken,
    ) -> Result<String> {
        let versions = self.list_versions(package, cancel).await?;
        let candidates = versions
            .iter()
            .map(String::as_str)
            .filter(|v| include_prerelease || !is_prerelease(v));

        latest(candidates).map(str::to_string).ok_or_else(|| {
            Error::version_not_resolved(
                package,
                if include_prerelease {
                    "the feed lists no versions"
                } else {
                    "the feed lists no stable versions"
                },
            )
        })
    }

    async fn install_package(
        &self,
        _workspace_root: &Path,
        package: &str,
        version: &str,
        output_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<PackageSet> {
        tokio::fs::create_dir_all(output_dir).await?;

        let mut installed = PackageSet::new();
        let mut pending = VecDeque::from([(package.to_string(), version.to_string())]);

        while let Some((id, ver)) = pending.pop_front() {
            if contains_package(&installed, &id) {
                continue;
            }
            cancel.check()?;

            let target = output_dir.join(package_folder_name(&id, &ver));
            let nuspec = if extract::is_complete(&target) {
                debug!("{} {} already extracted", id, ver);
                extract::read_nuspec(&target)
            } else {
                self.fetch_package(&id, &ver, &target, cancel).await?
            };
            installed.insert(id, ver);

            for dep in nuspec.as_deref().map(parse_dependencies).unwrap_or_default() {
                if contains_package(&installed, &dep.id)
                    || pending.iter().any(|(p, _)| p.eq_ignore_ascii_case(&dep.id))
                {
                    continue;
                }
                let dep_version = match dep.version {
                    Some(v) => v,
                    None => self.get_latest_version(&dep.id, false, cancel).await?,
                };
                pending.push_back((dep.id, dep_version));
            }
        }

        Ok(installed)
    }
}

fn contains_package(set: &PackageSet, name: &str) -> bool {
    set.keys().any(|k| k.eq_ignore_ascii_case(name))
}
