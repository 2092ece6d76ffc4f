//! Log filtering
//!
//! Filter configuration for displaying logs in the UI.

use super::{Direction, LogEntry, LogKind, LogLevel};

/// Active filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Show all logs (sensor, app, system)
    All,
    /// Show only sensor traffic
    Sensor,
    /// Show only application messages
    App,
}

impl FilterMode {
    /// Parse the `ui.default_filter` config value (unknown values mean All)
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sensor" => FilterMode::Sensor,
            "app" => FilterMode::App,
            _ => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Sensor => "Sensor",
            FilterMode::App => "App",
        }
    }
}

/// Log filter configuration
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub show_sensor: bool,
    pub show_app: bool,
    pub show_system: bool,
    pub show_direction_in: bool,
    pub show_direction_out: bool,
    /// `None` = all levels, `Some(X)` = X and above
    pub min_level: Option<LogLevel>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            show_sensor: true,
            show_app: true,
            show_system: true,
            show_direction_in: true,
            show_direction_out: true,
            min_level: None,
        }
    }
}

impl LogFilter {
    /// Check if a log entry passes the filter
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match &entry.kind {
            LogKind::Sensor { direction, .. } => {
                if !self.show_sensor {
                    return false;
                }
                match direction {
                    Direction::In => self.show_direction_in,
                    Direction::Out => self.show_direction_out,
                }
            }
            LogKind::App { level, .. } => {
                self.show_app
                    && self
                        .min_level
                        .map_or(true, |min| level_rank(*level) >= level_rank(min))
            }
            LogKind::System { .. } => self.show_system,
        }
    }
}

fn level_rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Debug => 0,
        LogLevel::Info => 1,
        LogLevel::Warn => 2,
        LogLevel::Error => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_all() {
        let filter = LogFilter::default();

        assert!(filter.matches(&LogEntry::sensor_in("sensor_status", "0.6.5")));
        assert!(filter.matches(&LogEntry::sensor_out("restart", "")));
        assert!(filter.matches(&LogEntry::app(LogLevel::Debug, "x")));
        assert!(filter.matches(&LogEntry::system("started")));
    }

    #[test]
    fn test_sensor_disabled() {
        let filter = LogFilter {
            show_sensor: false,
            ..Default::default()
        };

        assert!(!filter.matches(&LogEntry::sensor_in("connection", "")));
        assert!(filter.matches(&LogEntry::info("still here")));
    }

    #[test]
    fn test_direction_out_only() {
        let filter = LogFilter {
            show_direction_in: false,
            ..Default::default()
        };

        assert!(!filter.matches(&LogEntry::sensor_in("connection", "")));
        assert!(filter.matches(&LogEntry::sensor_out("restart", "")));
    }

    #[test]
    fn test_min_level() {
        let filter = LogFilter {
            min_level: Some(LogLevel::Warn),
            ..Default::default()
        };

        assert!(!filter.matches(&LogEntry::info("quiet")));
        assert!(filter.matches(&LogEntry::warn("loud")));
        assert!(filter.matches(&LogEntry::error("louder")));
    }

    #[test]
    fn test_mode_from_config() {
        assert_eq!(FilterMode::from_config("Sensor"), FilterMode::Sensor);
        assert_eq!(FilterMode::from_config("app"), FilterMode::App);
        assert_eq!(FilterMode::from_config("All"), FilterMode::All);
        assert_eq!(FilterMode::from_config("bogus"), FilterMode::All);
    }
}
