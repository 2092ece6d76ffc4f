//! Application state store
//!
//! Single owned state object for everything the views display. Setters are
//! the only way to mutate it; views receive it by reference.

use crate::config::Config;
use crate::constants::{DEFAULT_STREAM_PORT, MIN_USER_PORT};
use crate::error::{DashError, Result};
use crate::version::{update_available, FirmwareVersion};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

// =============================================================================
// Device status
// =============================================================================

/// Status snapshot reported by the sensor. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub version: FirmwareVersion,
    #[serde(default)]
    pub sensor_ok: bool,
    #[serde(default)]
    pub display_ok: bool,
    #[serde(default)]
    pub motor_ok: bool,
    #[serde(default)]
    pub motor_amplitude: u8,
    #[serde(default)]
    pub led_amplitude: u8,
    #[serde(default)]
    pub i2c_addresses: Vec<u8>,
}

/// Availability of a newer build of this application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppUpdate {
    /// Not checked yet
    #[default]
    Unknown,
    UpToDate,
    Available { version: String },
    /// Lookup failed; treated as "no update" by the controls
    Unavailable,
}

/// Firmware update eligibility derived from status and available version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareUpdate {
    /// No status snapshot or no available version yet
    Unknown,
    UpToDate,
    Available(String),
    /// The available version string could not be parsed
    Invalid(String),
}

// =============================================================================
// Validation
// =============================================================================

/// Parse a dotted IPv4 address
pub fn validate_ip(input: &str) -> Result<Ipv4Addr> {
    input
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| DashError::Validation {
            field: "ip",
            reason: format!("'{}' is not an IPv4 address", input.trim()),
        })
}

/// Accept ports in 1024..=65535
pub fn validate_port(value: i64) -> Result<u16> {
    if value < i64::from(MIN_USER_PORT) || value > i64::from(u16::MAX) {
        return Err(DashError::Validation {
            field: "udp_port",
            reason: format!("{} is outside {}..={}", value, MIN_USER_PORT, u16::MAX),
        });
    }
    Ok(value as u16)
}

/// Accept amplitudes in 0..=255
pub fn validate_amplitude(value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| DashError::Validation {
        field: "amplitude",
        reason: format!("{} is outside 0..=255", value),
    })
}

/// Accept absolute http(s) URLs for a firmware image
pub fn validate_update_url(input: &str) -> Result<String> {
    let url = input.trim();
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(DashError::Validation {
            field: "update_url",
            reason: format!("'{}' is not an http(s) URL", url),
        }),
    }
}

/// Parse a numeric text field before range validation
pub fn parse_number(field: &'static str, input: &str) -> Result<i64> {
    input.trim().parse::<i64>().map_err(|_| DashError::Validation {
        field,
        reason: format!("'{}' is not a number", input.trim()),
    })
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct AppStore {
    app_version: String,
    connected: bool,
    sensor_status: Option<SensorStatus>,
    app_update: AppUpdate,
    firmware_available: Option<String>,
    sensor_ip: Option<Ipv4Addr>,
    udp_port: u16,
    amplitude: u8,
    dummy_data: bool,
}

impl AppStore {
    /// An out-of-range `udp_port` is replaced by the default stream port
    pub fn new(app_version: impl Into<String>, sensor_ip: Option<Ipv4Addr>, udp_port: u16) -> Self {
        let udp_port = validate_port(i64::from(udp_port)).unwrap_or(DEFAULT_STREAM_PORT);
        Self {
            app_version: app_version.into(),
            connected: false,
            sensor_status: None,
            app_update: AppUpdate::Unknown,
            firmware_available: None,
            sensor_ip,
            udp_port,
            amplitude: 0,
            dummy_data: false,
        }
    }

    /// Store seeded from the persisted network settings
    pub fn from_config(app_version: impl Into<String>, config: &Config) -> Self {
        Self::new(app_version, config.sensor.ip_addr(), config.sensor.stream_port)
    }

    // === Read access ===

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn sensor_status(&self) -> Option<&SensorStatus> {
        self.sensor_status.as_ref()
    }

    pub fn app_update(&self) -> &AppUpdate {
        &self.app_update
    }

    pub fn firmware_available(&self) -> Option<&str> {
        self.firmware_available.as_deref()
    }

    pub fn sensor_ip(&self) -> Option<Ipv4Addr> {
        self.sensor_ip
    }

    pub fn udp_port(&self) -> u16 {
        self.udp_port
    }

    pub fn amplitude(&self) -> u8 {
        self.amplitude
    }

    pub fn dummy_data(&self) -> bool {
        self.dummy_data
    }

    /// Compare the reported firmware with the latest available release
    pub fn firmware_update(&self) -> FirmwareUpdate {
        let (Some(status), Some(available)) = (&self.sensor_status, &self.firmware_available)
        else {
            return FirmwareUpdate::Unknown;
        };
        match update_available(status.version, available) {
            Ok(true) => FirmwareUpdate::Available(available.clone()),
            Ok(false) => FirmwareUpdate::UpToDate,
            Err(_) => FirmwareUpdate::Invalid(available.clone()),
        }
    }

    pub fn can_update_firmware(&self) -> bool {
        self.connected && matches!(self.firmware_update(), FirmwareUpdate::Available(_))
    }

    // === Setters ===

    pub fn set_app_version(&mut self, version: impl Into<String>) {
        self.app_version = version.into();
    }

    /// Update connection state. Disconnecting drops the status snapshot.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        if !connected {
            self.sensor_status = None;
        }
    }

    pub fn set_sensor_status(&mut self, status: SensorStatus) {
        self.sensor_status = Some(status);
    }

    pub fn set_app_update(&mut self, update: AppUpdate) {
        self.app_update = update;
    }

    pub fn set_firmware_available(&mut self, version: Option<String>) {
        self.firmware_available = version;
    }

    pub fn toggle_dummy_data(&mut self) -> bool {
        self.dummy_data = !self.dummy_data;
        self.dummy_data
    }

    pub fn set_sensor_ip(&mut self, input: &str) -> Result<Ipv4Addr> {
        let ip = validate_ip(input)?;
        self.sensor_ip = Some(ip);
        Ok(ip)
    }

    pub fn set_udp_port(&mut self, value: i64) -> Result<u16> {
        let port = validate_port(value)?;
        self.udp_port = port;
        Ok(port)
    }

    pub fn set_amplitude(&mut self, value: i64) -> Result<u8> {
        let amplitude = validate_amplitude(value)?;
        self.amplitude = amplitude;
        Ok(amplitude)
    }
}
