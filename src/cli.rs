//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.
//! Numeric and address arguments go through the same validators as the
//! settings popup.

use crate::store::{
    parse_number, validate_amplitude, validate_ip, validate_port, validate_update_url,
};
use clap::{ArgGroup, Parser, Subcommand};
use std::net::Ipv4Addr;

// =============================================================================
// CLI Definition
// =============================================================================

/// Terminal dashboard for the esp-pulser heart-rate sensor
#[derive(Parser, Debug, Default)]
#[command(name = "pulse-dash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print sensor events to stdout instead of running the TUI
    #[arg(long)]
    pub headless: bool,

    /// Local UDP port the sensor streams to (overrides config)
    #[arg(long, value_name = "PORT", value_parser = parse_port)]
    pub udp_port: Option<u16>,

    /// Sensor IPv4 address for commands (overrides config)
    #[arg(long, value_name = "ADDR", value_parser = parse_ip)]
    pub ip: Option<Ipv4Addr>,

    /// Start with the synthetic pulse source enabled
    #[arg(long)]
    pub dummy: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot commands sent to the sensor
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Restart the sensor
    Restart,

    /// Flash new firmware over the air; the sensor reboots afterwards
    #[command(group(ArgGroup::new("source").required(true).args(["version", "url"])))]
    Update {
        /// Release version to fetch from the firmware release feed
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,

        /// Direct firmware image URL (http or https)
        #[arg(long, value_name = "URL", value_parser = parse_url)]
        url: Option<String>,
    },

    /// Set the motor amplitude (0-255)
    SetAmplitude {
        #[arg(value_parser = parse_amplitude)]
        amplitude: u8,
    },

    /// Point the sensor's stream at another UDP port (1024-65535)
    SetPort {
        #[arg(value_parser = parse_port)]
        port: u16,
    },

    /// Change the sensor's own IPv4 address
    SetIp {
        #[arg(value_parser = parse_ip)]
        address: Ipv4Addr,
    },

    /// Look up the latest dashboard and firmware releases
    Check,
}

// =============================================================================
// Value parsers
// =============================================================================

fn parse_port(input: &str) -> Result<u16, String> {
    parse_number("udp_port", input)
        .and_then(validate_port)
        .map_err(|e| e.to_string())
}

fn parse_amplitude(input: &str) -> Result<u8, String> {
    parse_number("amplitude", input)
        .and_then(validate_amplitude)
        .map_err(|e| e.to_string())
}

fn parse_ip(input: &str) -> Result<Ipv4Addr, String> {
    validate_ip(input).map_err(|e| e.to_string())
}

fn parse_url(input: &str) -> Result<String, String> {
    validate_update_url(input).map_err(|e| e.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["pulse-dash"]);
        assert!(!cli.verbose);
        assert!(!cli.headless);
        assert!(!cli.dummy);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["pulse-dash", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["pulse-dash", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from(["pulse-dash", "--udp-port", "4000", "--ip", "10.0.0.7"]);
        assert_eq!(cli.udp_port, Some(4000));
        assert_eq!(cli.ip, Some(Ipv4Addr::new(10, 0, 0, 7)));
    }

    #[test]
    fn test_cli_rejects_privileged_port() {
        assert!(Cli::try_parse_from(["pulse-dash", "--udp-port", "80"]).is_err());
        assert!(Cli::try_parse_from(["pulse-dash", "set-port", "70000"]).is_err());
    }

    #[test]
    fn test_cli_parse_set_amplitude() {
        let cli = Cli::parse_from(["pulse-dash", "set-amplitude", "255"]);
        assert_eq!(cli.command, Some(Command::SetAmplitude { amplitude: 255 }));
        assert!(Cli::try_parse_from(["pulse-dash", "set-amplitude", "256"]).is_err());
        assert!(Cli::try_parse_from(["pulse-dash", "set-amplitude", "loud"]).is_err());
    }

    #[test]
    fn test_cli_parse_update_needs_source() {
        assert!(Cli::try_parse_from(["pulse-dash", "update"]).is_err());
        assert!(
            Cli::try_parse_from(["pulse-dash", "update", "--version", "1.0.0", "--url", "x"])
                .is_err()
        );

        let cli = Cli::parse_from(["pulse-dash", "update", "--version", "0.6.5"]);
        assert_eq!(
            cli.command,
            Some(Command::Update {
                version: Some("0.6.5".into()),
                url: None
            })
        );
    }

    #[test]
    fn test_cli_update_url_must_be_http() {
        let cli = Cli::parse_from(["pulse-dash", "update", "--url", "http://10.0.0.9/fw.bin"]);
        assert_eq!(
            cli.command,
            Some(Command::Update {
                version: None,
                url: Some("http://10.0.0.9/fw.bin".into())
            })
        );
        assert!(Cli::try_parse_from(["pulse-dash", "update", "--url", "fw.bin"]).is_err());
        assert!(
            Cli::try_parse_from(["pulse-dash", "update", "--url", "file:///tmp/fw.bin"]).is_err()
        );
    }

    #[test]
    fn test_cli_parse_set_ip() {
        let cli = Cli::parse_from(["pulse-dash", "set-ip", "192.168.4.20"]);
        assert_eq!(
            cli.command,
            Some(Command::SetIp {
                address: Ipv4Addr::new(192, 168, 4, 20)
            })
        );
        assert!(Cli::try_parse_from(["pulse-dash", "set-ip", "256.1.1.1"]).is_err());
    }
}
