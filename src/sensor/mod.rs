//! Sensor I/O
//!
//! - **link**: UDP listener turning sensor datagrams into bus events
//! - **sink**: fire-and-forget commands towards the sensor
//! - **dummy**: synthetic pulse source for running without hardware
//! - **protocol**: datagram decoding and command encoding
//! - **stats**: traffic counters for the networking view

pub mod dummy;
pub mod link;
pub mod protocol;
pub mod sink;
pub mod stats;

pub use dummy::DummySource;
pub use link::{LinkHandle, SensorLink};
pub use sink::{CommandSink, UdpCommandSink};
pub use stats::LinkStats;

use std::fmt;
use std::net::Ipv4Addr;

/// Where the sensor should fetch a firmware image from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    /// Release version, resolved by the sensor against its release feed
    Version(String),
    /// Direct firmware image URL
    Url(String),
}

/// Command understood by the sensor firmware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorCommand {
    Restart,
    SetAmplitude(u8),
    SetPort(u16),
    SetIp(Ipv4Addr),
    Update(UpdateTarget),
}

impl SensorCommand {
    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            SensorCommand::Restart => "restart",
            SensorCommand::SetAmplitude(_) => "set_amplitude",
            SensorCommand::SetPort(_) => "set_port",
            SensorCommand::SetIp(_) => "set_ip",
            SensorCommand::Update(_) => "update",
        }
    }

    /// Argument sent alongside the command name
    pub fn data(&self) -> Option<String> {
        match self {
            SensorCommand::Restart => None,
            SensorCommand::SetAmplitude(v) => Some(v.to_string()),
            SensorCommand::SetPort(p) => Some(p.to_string()),
            SensorCommand::SetIp(ip) => Some(ip.to_string()),
            SensorCommand::Update(UpdateTarget::Version(v)) => Some(v.clone()),
            SensorCommand::Update(UpdateTarget::Url(u)) => Some(u.clone()),
        }
    }
}

impl fmt::Display for SensorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{} {}", self.name(), data),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        assert_eq!(SensorCommand::Restart.to_string(), "restart");
        assert_eq!(SensorCommand::SetAmplitude(70).to_string(), "set_amplitude 70");
        assert_eq!(
            SensorCommand::Update(UpdateTarget::Version("0.6.5".into())).to_string(),
            "update 0.6.5"
        );
    }
}
