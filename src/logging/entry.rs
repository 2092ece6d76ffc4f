//! Log entry types
//!
//! Core types for representing dashboard log entries.

use serde::{Deserialize, Serialize};

/// Severity of application messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Direction of sensor traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    In,  // Sensor -> Host
    Out, // Host -> Sensor
}

/// Type of log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogKind {
    /// Sensor traffic worth showing (status snapshots, commands, connection changes)
    Sensor {
        direction: Direction,
        message_name: String,
        detail: String,
    },
    /// Message from the dashboard itself
    App { level: LogLevel, message: String },
    /// Lifecycle message (startup, link rebinds)
    System { message: String },
}

/// One line of the log view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String, // HH:MM:SS.mmm
    pub kind: LogKind,
}

impl LogEntry {
    /// Current timestamp as HH:MM:SS.mmm
    #[inline]
    fn now() -> String {
        chrono::Local::now().format("%H:%M:%S%.3f").to_string()
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            timestamp: Self::now(),
            kind: LogKind::System {
                message: message.into(),
            },
        }
    }

    pub fn sensor_in(message_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Self::now(),
            kind: LogKind::Sensor {
                direction: Direction::In,
                message_name: message_name.into(),
                detail: detail.into(),
            },
        }
    }

    pub fn sensor_out(message_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Self::now(),
            kind: LogKind::Sensor {
                direction: Direction::Out,
                message_name: message_name.into(),
                detail: detail.into(),
            },
        }
    }

    pub fn app(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Self::now(),
            kind: LogKind::App {
                level,
                message: message.into(),
            },
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::app(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::app(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::app(LogLevel::Error, message)
    }

    /// Plain text rendering used for export and the log file
    pub fn to_text(&self) -> String {
        match &self.kind {
            LogKind::Sensor {
                direction,
                message_name,
                detail,
            } => {
                let dir = match direction {
                    Direction::In => "IN",
                    Direction::Out => "OUT",
                };
                if detail.is_empty() {
                    format!("{} [SENSOR] {} {}", self.timestamp, dir, message_name)
                } else {
                    format!(
                        "{} [SENSOR] {} {} {}",
                        self.timestamp, dir, message_name, detail
                    )
                }
            }
            LogKind::App { level, message } => {
                format!("{} {} {}", self.timestamp, level.tag(), message)
            }
            LogKind::System { message } => format!("{} [SYS] {}", self.timestamp, message),
        }
    }
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let entry = LogEntry::system("x");
        // HH:MM:SS.mmm
        assert_eq!(entry.timestamp.len(), 12);
        assert_eq!(&entry.timestamp[2..3], ":");
        assert_eq!(&entry.timestamp[8..9], ".");
    }

    #[test]
    fn test_text_rendering() {
        let entry = LogEntry::sensor_out("set_amplitude", "70");
        assert!(entry.to_text().ends_with("[SENSOR] OUT set_amplitude 70"));

        let entry = LogEntry::sensor_in("connection", "");
        assert!(entry.to_text().ends_with("[SENSOR] IN connection"));

        let entry = LogEntry::warn("Invalid udp_port");
        assert!(entry.to_text().ends_with("[WARN] Invalid udp_port"));
    }
}
