//! Configuration management
//!
//! Config file is stored next to the executable as `config.toml`.
//! Log files go to the `logs/` directory beside it.

use crate::constants::{
    DEFAULT_APP_RELEASE_URL, DEFAULT_COMMAND_PORT, DEFAULT_CONNECTION_TIMEOUT_SECS,
    DEFAULT_FIRMWARE_RELEASE_URL, DEFAULT_LOG_FILE_MAX_BYTES, DEFAULT_LOG_FILE_MAX_FILES,
    DEFAULT_SAMPLING_RATE_HZ,
    DEFAULT_STREAM_PORT, DEFAULT_WINDOW_CAPACITY,
};
use crate::error::{DashError, Result};
use crate::plot::XAxis;
use crate::store::validate_port;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorConfig,
    pub plot: PlotConfig,
    pub updates: UpdatesConfig,
    pub logs: LogsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Sensor IPv4 address for commands (empty = not configured)
    pub ip: String,
    /// Local UDP port the sensor streams to
    pub stream_port: u16,
    /// Sensor UDP port accepting commands
    pub command_port: u16,
    /// Silence after which the sensor counts as disconnected
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Device sampling rate, used to label chart durations
    pub sampling_rate_hz: u32,
    /// Samples kept by the processed heartbeat chart
    pub heartbeat_window: usize,
    /// Samples kept by the raw signal chart
    pub raw_window: usize,
    pub heartbeat_x_axis: XAxis,
    pub raw_x_axis: XAxis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatesConfig {
    /// Look for application and firmware releases at startup
    pub check_on_startup: bool,
    /// GitHub "latest release" endpoint of the sensor firmware
    pub firmware_release_url: String,
    /// GitHub "latest release" endpoint of this dashboard
    pub app_release_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Maximum log entries in memory
    pub max_entries: usize,
    /// Maximum log entries when exporting
    pub export_max: usize,
    /// Rotate the log file past this size
    pub file_max_bytes: u64,
    /// Rotated log files to keep
    pub file_max_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default filter: "Sensor", "App", or "All"
    pub default_filter: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ip: String::new(),
            stream_port: DEFAULT_STREAM_PORT,
            command_port: DEFAULT_COMMAND_PORT,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: DEFAULT_SAMPLING_RATE_HZ,
            heartbeat_window: DEFAULT_WINDOW_CAPACITY,
            raw_window: DEFAULT_WINDOW_CAPACITY,
            heartbeat_x_axis: XAxis::CaptureTime,
            raw_x_axis: XAxis::CaptureTime,
        }
    }
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            check_on_startup: true,
            firmware_release_url: DEFAULT_FIRMWARE_RELEASE_URL.to_string(),
            app_release_url: DEFAULT_APP_RELEASE_URL.to_string(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            max_entries: 200,
            export_max: 2000,
            file_max_bytes: DEFAULT_LOG_FILE_MAX_BYTES,
            file_max_files: DEFAULT_LOG_FILE_MAX_FILES,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_filter: "All".to_string(),
        }
    }
}

impl SensorConfig {
    /// Configured sensor address, if set and well-formed
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        if self.ip.trim().is_empty() {
            return None;
        }
        match self.ip.trim().parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!("Ignoring invalid sensor ip '{}' in config", self.ip);
                None
            }
        }
    }

    /// Where commands are sent
    pub fn command_addr(&self) -> Option<SocketAddr> {
        self.ip_addr()
            .map(|ip| SocketAddr::V4(SocketAddrV4::new(ip, self.command_port)))
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs.max(1))
    }

    /// Replace ports outside 1024..=65535 with the defaults
    pub fn sanitize(&mut self) {
        self.stream_port = checked_port("stream_port", self.stream_port, DEFAULT_STREAM_PORT);
        self.command_port = checked_port("command_port", self.command_port, DEFAULT_COMMAND_PORT);
    }
}

fn checked_port(field: &str, port: u16, default: u16) -> u16 {
    match validate_port(i64::from(port)) {
        Ok(port) => port,
        Err(e) => {
            warn!("Ignoring {} in config ({}), using {}", field, e, default);
            default
        }
    }
}

// =============================================================================
// Paths
// =============================================================================

/// Get the project root directory
///
/// Searches in order:
/// 1. Next to executable (production deployment)
/// 2. Up from target/release or target/debug (dev builds)
fn find_project_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| DashError::Io {
        path: PathBuf::from("executable"),
        source: e,
    })?;
    let exe_dir = exe.parent().ok_or_else(|| DashError::Validation {
        field: "exe_path",
        reason: "no parent directory".into(),
    })?;

    if exe_dir.join("config.toml").exists() {
        return Ok(exe_dir.to_path_buf());
    }

    // exe_dir = .../pulse-dash/target/release, we want .../pulse-dash
    if let Some(target_dir) = exe_dir.parent() {
        if target_dir
            .file_name()
            .map(|n| n == "target")
            .unwrap_or(false)
        {
            if let Some(project_root) = target_dir.parent() {
                if project_root.join("Cargo.toml").exists() {
                    return Ok(project_root.to_path_buf());
                }
            }
        }
    }

    Ok(exe_dir.to_path_buf())
}

/// Get the config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(find_project_root()?.join("config.toml"))
}

/// Directory holding the rotating log files
pub fn log_dir() -> Result<PathBuf> {
    Ok(find_project_root()?.join("logs"))
}

/// Directory receiving downloaded release assets
pub fn download_dir() -> Result<PathBuf> {
    Ok(find_project_root()?.join("downloads"))
}

// =============================================================================
// Load / Save
// =============================================================================

/// Load config from the default location, or create it if missing
pub fn load() -> Config {
    match config_path() {
        Ok(path) => load_from(&path),
        Err(e) => {
            warn!("Failed to determine config path: {}, using defaults", e);
            Config::default()
        }
    }
}

/// Load config from `path`, falling back to defaults on any error
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        let config = Config::default();
        if let Err(e) = save_to(&config, path) {
            warn!("Failed to create default config: {}", e);
        }
        return config;
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(mut config) => {
                config.sensor.sanitize();
                config
            }
            Err(e) => {
                warn!("Config parse error in {:?}: {}, using defaults", path, e);
                Config::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config {:?}: {}, using defaults", path, e);
            Config::default()
        }
    }
}

/// Save config to `path`
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| DashError::Validation {
        field: "config",
        reason: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| DashError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Open a config file in the default editor, creating it first if missing
pub fn open_in_editor(path: &Path) -> Result<()> {
    if !path.exists() {
        save_to(&Config::default(), path)?;
    }

    crate::platform::open_file(path)
}

// ============================================================================
// Tests
// ============================================================================
