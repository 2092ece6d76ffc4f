//! Firmware version parsing and OTA eligibility

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Firmware version reported by the sensor as `[major, minor, patch]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 3]", into = "[u32; 3]")]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FirmwareVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl From<[u32; 3]> for FirmwareVersion {
    fn from([major, minor, patch]: [u32; 3]) -> Self {
        Self::new(major, minor, patch)
    }
}

impl From<FirmwareVersion> for [u32; 3] {
    fn from(v: FirmwareVersion) -> Self {
        [v.major, v.minor, v.patch]
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse `major.minor.patch`, optionally prefixed with `v` (release tags)
pub fn parse_version(input: &str) -> Result<FirmwareVersion> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let parsed = bare
        .parse::<semver::Version>()
        .map_err(|e| DashError::Version {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

    let component = |value: u64, name: &str| {
        u32::try_from(value).map_err(|_| DashError::Version {
            input: input.to_string(),
            reason: format!("{} component out of range", name),
        })
    };

    Ok(FirmwareVersion::new(
        component(parsed.major, "major")?,
        component(parsed.minor, "minor")?,
        component(parsed.patch, "patch")?,
    ))
}

/// True iff `available` is strictly newer than `current`.
///
/// Ordering is major, then minor, then patch, each numeric. Pre-release and
/// build metadata do not take part in the comparison.
pub fn update_available(current: FirmwareVersion, available: &str) -> Result<bool> {
    Ok(parse_version(available)? > current)
}
