//! Release checks and application downloads

use super::App;
use crate::logging::LogEntry;
use crate::store::AppUpdate;
use crate::updates::{self, DownloadEvent, DownloadProgress, UpdateMessage};
use tracing::info;

impl App {
    /// Look up dashboard and firmware releases in the background
    pub fn check_updates(&mut self) {
        updates::spawn_check(self.config.updates.clone(), self.update_tx.clone());
        self.set_status("Checking for updates...");
    }

    /// Download the newer dashboard release for this platform. Installing is left to the user.
    pub fn download_app_update(&mut self) {
        if self.download.is_running() {
            self.set_status("Download already running");
            return;
        }
        let Some(release) = &self.app_release else {
            self.set_status("No application update available");
            return;
        };
        let tag = release.tag_name.clone();
        let asset = release
            .platform_asset()
            .map(|a| (a.name.clone(), a.browser_download_url.clone()));
        let Some((name, url)) = asset else {
            self.set_status(format!("Release {} has no assets", tag));
            return;
        };
        let Some(dest) = self.paths.downloads.as_ref().map(|dir| dir.join(&name)) else {
            self.set_status("No download directory");
            return;
        };

        self.log(LogEntry::info(format!("Downloading {}", name)));
        self.download = DownloadProgress::new();
        updates::spawn_download(url, dest, self.download_tx.clone());
    }

    pub(super) fn on_update_message(&mut self, message: UpdateMessage) {
        match message {
            UpdateMessage::AppUpdate(Some(release)) => {
                let version = release.version();
                self.log(LogEntry::info(format!("GUI update available: {}", version)));
                self.store.set_app_update(AppUpdate::Available { version });
                self.app_release = Some(release);
            }
            UpdateMessage::AppUpdate(None) => {
                self.log(LogEntry::info("No GUI updates available"));
                self.store.set_app_update(AppUpdate::UpToDate);
                self.app_release = None;
            }
            UpdateMessage::AppUpdateFailed(reason) => {
                self.log(LogEntry::warn(format!("GUI update check failed: {}", reason)));
                self.store.set_app_update(AppUpdate::Unavailable);
            }
            UpdateMessage::FirmwareVersion(version) => {
                self.log(LogEntry::info(format!("Found firmware version: {}", version)));
                self.store.set_firmware_available(Some(version));
            }
            UpdateMessage::FirmwareLookupFailed(reason) => {
                self.log(LogEntry::error(format!(
                    "Failed to fetch firmware version: {}",
                    reason
                )));
                // A stale version must not stay eligible for OTA
                self.store.set_firmware_available(None);
            }
        }
    }

    pub(super) fn on_download_event(&mut self, event: DownloadEvent) {
        self.download.apply(&event);
        match event {
            DownloadEvent::Started { content_length } => {
                let size = content_length
                    .map(|n| format!("{} bytes", n))
                    .unwrap_or_else(|| "unknown size".to_string());
                self.log(LogEntry::info(format!("Started downloading {}", size)));
            }
            DownloadEvent::Progress { .. } => {}
            DownloadEvent::Finished { path } => {
                info!("Update saved to {:?}", path);
                self.log(LogEntry::info(format!(
                    "Download finished: {}",
                    path.display()
                )));
                self.set_status("Download finished");
            }
            DownloadEvent::Failed(reason) => {
                self.log(LogEntry::error(format!("Download failed: {}", reason)));
                self.set_status("Download failed");
            }
        }
    }
}
