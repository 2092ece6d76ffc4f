//! Pulse Dash - terminal dashboard for the esp-pulser heart-rate sensor
//!
//! The sensor streams samples over UDP; the dashboard plots them, shows the
//! device status and sends commands back (restart, amplitude, port, OTA).

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod input;
pub mod logging;
pub mod platform;
pub mod plot;
pub mod sensor;
pub mod store;
pub mod ui;
pub mod updates;
pub mod version;
pub mod window;
