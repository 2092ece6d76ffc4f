//! Release lookup
//!
//! Both the dashboard and the sensor firmware publish GitHub releases. The
//! lookups run as background tasks and report through `UpdateMessage`;
//! a failed lookup is logged and never surfaces as an error to the views.

pub mod download;
pub mod progress;

pub use download::{spawn_download, DownloadEvent};
pub use progress::{DownloadProgress, DownloadState};

use crate::config::UpdatesConfig;
use crate::constants::{APP_VERSION, RELEASE_CHECK_TIMEOUT_SECS};
use crate::error::{DashError, Result};
use crate::version::parse_version;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Tag without its `v` prefix
    pub fn version(&self) -> String {
        firmware_version_from_tag(&self.tag_name)
    }

    /// Asset built for this platform, or the first one
    pub fn platform_asset(&self) -> Option<&Asset> {
        let os = std::env::consts::OS;
        self.assets
            .iter()
            .find(|a| a.name.to_lowercase().contains(os))
            .or_else(|| self.assets.first())
    }
}

/// Results of background release lookups
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateMessage {
    /// `Some` when a newer dashboard release exists
    AppUpdate(Option<Release>),
    AppUpdateFailed(String),
    /// Latest firmware version string (tag without `v`)
    FirmwareVersion(String),
    FirmwareLookupFailed(String),
}

/// Strip the `v` prefix from a release tag
pub fn firmware_version_from_tag(tag: &str) -> String {
    let tag = tag.trim();
    tag.strip_prefix('v').unwrap_or(tag).to_string()
}

pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| DashError::http("client", e))
}

/// Fetch a GitHub "latest release" document
pub async fn fetch_latest_release(url: &str) -> Result<Release> {
    debug!("Fetching latest release from {}", url);
    let client = http_client(Some(Duration::from_secs(RELEASE_CHECK_TIMEOUT_SECS)))?;

    let response = client
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| DashError::http(url, e))?;

    response
        .json::<Release>()
        .await
        .map_err(|e| DashError::http(url, e))
}

/// `Some(release)` iff the latest release is newer than `current`
pub async fn check_app_update(url: &str, current: &str) -> Result<Option<Release>> {
    let release = fetch_latest_release(url).await?;
    newer_release(release, current)
}

fn newer_release(release: Release, current: &str) -> Result<Option<Release>> {
    let current = parse_version(current)?;
    let latest = parse_version(&release.tag_name)?;
    if latest > current {
        debug!("Update available: {} > {}", latest, current);
        Ok(Some(release))
    } else {
        debug!("Running latest version: {}", current);
        Ok(None)
    }
}

/// Look up app and firmware releases in the background
pub fn spawn_check(config: UpdatesConfig, tx: mpsc::Sender<UpdateMessage>) {
    tokio::spawn(async move {
        let app = match check_app_update(&config.app_release_url, APP_VERSION).await {
            Ok(update) => {
                if let Some(release) = &update {
                    info!("Dashboard update available: {}", release.tag_name);
                }
                UpdateMessage::AppUpdate(update)
            }
            Err(e) => {
                warn!("Dashboard update check failed: {}", e);
                UpdateMessage::AppUpdateFailed(e.to_string())
            }
        };
        let firmware = match fetch_latest_release(&config.firmware_release_url).await {
            Ok(release) => UpdateMessage::FirmwareVersion(release.version()),
            Err(e) => {
                warn!("Firmware release lookup failed: {}", e);
                UpdateMessage::FirmwareLookupFailed(e.to_string())
            }
        };

        for message in [app, firmware] {
            if tx.send(message).await.is_err() {
                // Receiver gone, app is shutting down
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.into(),
            name: None,
            html_url: None,
            assets: vec![],
        }
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(firmware_version_from_tag("v0.6.5"), "0.6.5");
        assert_eq!(firmware_version_from_tag("0.6.5"), "0.6.5");
        assert_eq!(firmware_version_from_tag(" v1.0.0 "), "1.0.0");
    }

    #[test]
    fn test_newer_release() {
        assert!(newer_release(release("v0.2.0"), "0.1.0").unwrap().is_some());
        assert!(newer_release(release("v0.1.0"), "0.1.0").unwrap().is_none());
        assert!(newer_release(release("v0.0.9"), "0.1.0").unwrap().is_none());
        assert!(newer_release(release("nightly"), "0.1.0").is_err());
    }

    #[test]
    fn test_current_version_is_valid_semver() {
        assert!(parse_version(APP_VERSION).is_ok());
    }

    #[test]
    fn test_release_json() {
        let json = r#"{
            "tag_name": "v0.6.5",
            "name": "Firmware 0.6.5",
            "assets": [
                {"name": "pulse-dash-windows.zip", "browser_download_url": "https://example.com/w", "size": 10},
                {"name": "pulse-dash-linux.tar.gz", "browser_download_url": "https://example.com/l", "size": 12}
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.version(), "0.6.5");
        assert_eq!(release.assets.len(), 2);
        assert!(release.platform_asset().is_some());
    }

    #[test]
    fn test_release_without_assets() {
        let release: Release = serde_json::from_str(r#"{"tag_name":"v1.0.0"}"#).unwrap();
        assert!(release.platform_asset().is_none());
    }
}
