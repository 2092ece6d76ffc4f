//! Centralized error types for the dashboard
//!
//! All dashboard errors are represented by the `DashError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, DashError>`.

use std::fmt;
use std::path::PathBuf;

/// All dashboard errors
#[derive(Debug)]
pub enum DashError {
    // === Network ===
    /// Failed to bind the sensor stream socket
    UdpBind { port: u16, source: std::io::Error },
    /// No sensor address configured for outgoing commands
    NoSensorAddress,
    /// Background task channel was closed
    ChannelClosed { what: &'static str },
    /// Background task queue is full; the item was dropped
    QueueFull { what: &'static str },
    /// HTTP request for release metadata or assets failed
    Http {
        url: String,
        source: Box<reqwest::Error>,
    },

    // === Input ===
    /// User or config value rejected before use
    Validation { field: &'static str, reason: String },
    /// Version string is not a `major.minor.patch` triple
    Version { input: String, reason: String },
    /// Datagram from the sensor could not be decoded
    Decode { len: usize, reason: String },

    // === IO ===
    /// File system operation failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // === OS Commands ===
    /// Failed to spawn an OS command
    OsCommand {
        program: &'static str,
        source: std::io::Error,
    },

    // === Runtime ===
    /// Terminal or tokio runtime setup failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for DashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UdpBind { source, .. }
            | Self::Io { source, .. }
            | Self::OsCommand { source, .. }
            | Self::Runtime { source } => Some(source),
            Self::Http { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UdpBind { port, .. } => write!(f, "Cannot bind UDP port {}", port),
            Self::NoSensorAddress => write!(f, "No sensor IP address configured"),
            Self::ChannelClosed { what } => write!(f, "{} channel closed", what),
            Self::QueueFull { what } => write!(f, "{} queue full, dropped", what),
            Self::Http { url, source } => write!(f, "Request to {} failed: {}", url, source),
            Self::Validation { field, reason } => write!(f, "Invalid {}: {}", field, reason),
            Self::Version { input, reason } => {
                write!(f, "Invalid version '{}': {}", input, reason)
            }
            Self::Decode { len, reason } => {
                write!(f, "Cannot decode {} byte datagram: {}", len, reason)
            }
            Self::Io { path, .. } => write!(f, "IO error: {}", path.display()),
            Self::OsCommand { program, source } => {
                write!(f, "Command failed: {}: {}", program, source)
            }
            Self::Runtime { .. } => write!(f, "Failed to set up runtime"),
        }
    }
}

impl DashError {
    pub(crate) fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

/// Alias for Result with DashError
pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_validation_display() {
        let err = DashError::Validation {
            field: "udp_port",
            reason: "must be between 1024 and 65535".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid udp_port: must be between 1024 and 65535"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_has_source() {
        let err = DashError::Io {
            path: PathBuf::from("config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("config.toml"));
    }
}
