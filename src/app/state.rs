//! Application state types
//!
//! Contains the state snapshot used for rendering and the tab enum.

use crate::store::AppStore;
use crate::updates::{DownloadProgress, Release};
use std::net::SocketAddr;

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Status,
    Plot,
    Logs,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Status, Tab::Plot, Tab::Logs];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Status => "Status",
            Tab::Plot => "Data Plot",
            Tab::Logs => "Logs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Status => 0,
            Tab::Plot => 1,
            Tab::Logs => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Status => Tab::Plot,
            Tab::Plot => Tab::Logs,
            Tab::Logs => Tab::Status,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Status => Tab::Logs,
            Tab::Plot => Tab::Status,
            Tab::Logs => Tab::Plot,
        }
    }
}

/// Listener state of the sensor link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Listening { port: u16 },
    /// Bind failed or link not started
    Down,
}

/// Application state snapshot for rendering (zero-copy)
///
/// This is a borrowed view of the application state, designed for
/// efficient UI rendering without cloning data.
#[derive(Clone)]
pub struct AppState<'a> {
    pub tab: Tab,
    pub store: &'a AppStore,

    // Networking
    pub link: LinkState,
    pub command_target: Option<SocketAddr>,
    pub packet_rate: f64,
    pub rx_packets: u64,
    pub decode_errors: u64,

    // Updates
    pub download: &'a DownloadProgress,
    pub app_release: Option<&'a Release>,
    pub custom_update_url: &'a str,

    // UI state
    pub paused: bool,
    pub status_message: Option<&'a str>,
}
