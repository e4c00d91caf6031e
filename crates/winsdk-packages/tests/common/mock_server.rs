//! Mock feed helpers
//!
//! Mirrors the NuGet v3 flat-container routes with lowercase ids.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use winsdk_core::config::NetworkConfig;
use winsdk_packages::NuGetClient;

/// Serve `{id}/index.json` listing `versions`
pub async fn mock_version_index(server: &MockServer, id: &str, versions: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/index.json", id.to_lowercase())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "versions": versions })))
        .mount(server)
        .await;
}

/// Serve `{id}/{version}/{id}.{version}.nupkg`
pub async fn mock_nupkg(server: &MockServer, id: &str, version: &str, content: Vec<u8>) {
    let id = id.to_lowercase();
    let version = version.to_lowercase();
    Mock::given(method("GET"))
        .and(path(format!("/{id}/{version}/{id}.{version}.nupkg")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(server)
        .await;
}

/// Serve the NuGet command-line executable
pub async fn mock_nuget_exe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/nuget.exe"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MZ fake nuget".to_vec()))
        .mount(server)
        .await;
}

/// A client pointed at the mock server
pub fn client_for(server: &MockServer) -> NuGetClient {
    let config = NetworkConfig::default()
        .with_feed_url(server.uri())
        .with_nuget_exe_url(format!("{}/nuget.exe", server.uri()));
    NuGetClient::new(config).unwrap()
}
