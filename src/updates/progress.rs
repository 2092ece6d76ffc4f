//! Download progress tracking

use super::download::DownloadEvent;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Running,
    Finished(PathBuf),
    Failed(String),
}

/// Progress of one asset download, folded from `DownloadEvent`s
#[derive(Debug, Clone, Default)]
pub struct DownloadProgress {
    content_length: Option<u64>,
    downloaded: u64,
    state: DownloadState,
}

impl DownloadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { content_length } => {
                self.content_length = *content_length;
                self.downloaded = 0;
                self.state = DownloadState::Running;
            }
            DownloadEvent::Progress { chunk_len } => {
                self.downloaded += *chunk_len as u64;
            }
            DownloadEvent::Finished { path } => {
                self.state = DownloadState::Finished(path.clone());
            }
            DownloadEvent::Failed(reason) => {
                self.state = DownloadState::Failed(reason.clone());
            }
        }
    }

    /// Completed fraction in `[0, 1]`.
    ///
    /// `None` means indeterminate: the server sent no length, or a zero length.
    pub fn fraction(&self) -> Option<f64> {
        match self.content_length {
            Some(total) if total > 0 => {
                Some((self.downloaded as f64 / total as f64).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DownloadState::Running
    }
}
