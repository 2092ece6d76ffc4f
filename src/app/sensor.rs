//! Sensor control
//!
//! Commands towards the sensor and the network settings that shape the link.
//! Rejected input never reaches the sensor: it is reported in the status
//! line and the log, and the previous value stays in place.

use super::App;
use crate::config;
use crate::error::DashError;
use crate::logging::LogEntry;
use crate::sensor::{DummySource, SensorCommand, SensorLink, UpdateTarget};
use crate::store::{parse_number, validate_update_url, FirmwareUpdate};
use tracing::{debug, error, info, warn};

impl App {
    /// Own a sensor link on the configured stream port. Port changes rebind it.
    /// Must be called within a tokio runtime.
    pub fn listen(&mut self) {
        self.networking = true;
        self.bind_link();
    }

    /// (Re)bind the stream port from the store. The old listener is dropped first.
    pub(super) fn bind_link(&mut self) {
        if let Some(old) = self.link.take() {
            old.stop();
        }

        let port = self.store.udp_port();
        let link = SensorLink::new(port, self.config.sensor.connection_timeout());
        match link.spawn(self.bus.clone(), self.stats.clone()) {
            Ok(handle) => {
                self.log(LogEntry::system(format!("Listening on UDP:{}", handle.port())));
                self.link = Some(handle);
            }
            Err(e) => {
                error!("Sensor link failed: {}", e);
                self.log(LogEntry::error(e.to_string()));
                self.set_status(e.to_string());
            }
        }
    }

    /// Queue a command for the sensor. Returns false if it could not be queued.
    pub(super) fn send_command(&mut self, command: SensorCommand) -> bool {
        let entry = LogEntry::sensor_out(command.name(), command.data().unwrap_or_default());
        match self.sink.send(command) {
            Ok(()) => {
                self.log(entry);
                true
            }
            Err(e) => {
                warn!("Command not sent: {}", e);
                self.log(LogEntry::error(format!("Command not sent: {}", e)));
                self.set_status(e.to_string());
                false
            }
        }
    }

    /// Report input that failed validation
    pub(super) fn reject(&mut self, err: DashError) {
        debug!("Rejected input: {}", err);
        self.log(LogEntry::warn(err.to_string()));
        self.set_status(err.to_string());
    }

    fn require_connection(&mut self) -> bool {
        if !self.store.connected() {
            self.set_status("Sensor not connected");
        }
        self.store.connected()
    }

    // =========================================================================
    // Board commands
    // =========================================================================

    pub fn restart_sensor(&mut self) {
        if !self.require_connection() {
            return;
        }
        if self.send_command(SensorCommand::Restart) {
            self.set_status("Restart sent");
        }
    }

    /// OTA update to the latest firmware release
    pub fn firmware_update(&mut self) {
        if !self.require_connection() {
            return;
        }
        match self.store.firmware_update() {
            FirmwareUpdate::Available(version) => {
                self.start_ota(UpdateTarget::Version(version));
            }
            FirmwareUpdate::UpToDate => self.set_status("Firmware is up to date"),
            FirmwareUpdate::Unknown => self.set_status("Firmware release unknown (N to check)"),
            FirmwareUpdate::Invalid(v) => {
                self.set_status(format!("Cannot compare firmware version '{}'", v))
            }
        }
    }

    /// OTA update from a user-provided URL (fallback for broken releases)
    pub fn custom_firmware_update(&mut self, input: &str) {
        let url = match validate_update_url(input) {
            Ok(url) => url,
            Err(e) => {
                self.reject(e);
                return;
            }
        };
        self.custom_update_url = url.clone();
        if !self.require_connection() {
            return;
        }
        self.start_ota(UpdateTarget::Url(url));
    }

    fn start_ota(&mut self, target: UpdateTarget) {
        info!("Issuing OTA firmware update command. The board will restart.");
        self.log(LogEntry::info(
            "Issuing OTA firmware update command. The board will restart.",
        ));
        if self.send_command(SensorCommand::Update(target)) {
            // The board goes silent while flashing. The link forgets the
            // session too, so a board that keeps streaming reconnects.
            if let Some(link) = &self.link {
                link.reset_connection();
            }
            self.store.set_connected(false);
            self.set_status("Firmware update started");
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Returns the accepted value for display
    pub fn apply_amplitude(&mut self, input: &str) -> Option<String> {
        let amplitude = match parse_number("amplitude", input)
            .and_then(|n| self.store.set_amplitude(n))
        {
            Ok(a) => a,
            Err(e) => {
                self.reject(e);
                return None;
            }
        };

        if self.store.connected() {
            if self.send_command(SensorCommand::SetAmplitude(amplitude)) {
                self.set_status(format!("Amplitude set to {}", amplitude));
            }
        } else {
            self.set_status(format!("Amplitude {} kept, sensor not connected", amplitude));
        }
        Some(amplitude.to_string())
    }

    /// Change the stream port: persist it, tell the sensor, rebind the listener
    pub fn apply_port(&mut self, input: &str) -> Option<String> {
        let port = match parse_number("udp_port", input).and_then(|n| self.store.set_udp_port(n)) {
            Ok(p) => p,
            Err(e) => {
                self.reject(e);
                return None;
            }
        };

        self.config.sensor.stream_port = port;
        self.persist_config();

        if self.store.connected() {
            self.send_command(SensorCommand::SetPort(port));
        }
        if self.networking {
            self.bind_link();
        }
        self.set_status(format!("UDP port set to {}", port));
        Some(port.to_string())
    }

    /// Change the sensor address commands go to. Locked while connected.
    pub fn apply_ip(&mut self, input: &str) -> Option<String> {
        if self.store.connected() {
            self.reject(DashError::Validation {
                field: "ip",
                reason: "cannot change the sensor address while connected".into(),
            });
            return None;
        }
        let ip = match self.store.set_sensor_ip(input) {
            Ok(ip) => ip,
            Err(e) => {
                self.reject(e);
                return None;
            }
        };

        self.config.sensor.ip = ip.to_string();
        self.persist_config();
        self.sink.retarget(self.command_target());
        self.log(LogEntry::system(format!("Sensor address set to {}", ip)));
        self.set_status(format!("Sensor IP set to {}", ip));
        Some(ip.to_string())
    }

    fn persist_config(&mut self) {
        let Some(path) = self.paths.config.clone() else {
            return;
        };
        match config::save_to(&self.config, &path) {
            Ok(()) => debug!("Config saved to {:?}", path),
            Err(e) => self.log(LogEntry::error(format!("Failed to save config: {}", e))),
        }
    }

    /// Start or stop the synthetic data source. Must run within a tokio runtime.
    pub fn toggle_dummy_data(&mut self) {
        if self.store.toggle_dummy_data() {
            self.dummy = Some(DummySource::spawn(
                self.bus.clone(),
                self.config.plot.sampling_rate_hz,
            ));
            self.log(LogEntry::system("Dummy data on"));
            self.set_status("Dummy data on");
        } else {
            self.dummy = None;
            self.log(LogEntry::system("Dummy data off"));
            self.set_status("Dummy data off");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{status, test_app};
    use crate::events::SensorEvent;
    use crate::logging::LogKind;
    use crate::sensor::{SensorCommand, UpdateTarget};
    use std::net::Ipv4Addr;

    fn connect(app: &mut crate::app::App, bus: &crate::events::EventBus) {
        bus.publish(SensorEvent::Connection(true));
        bus.publish(SensorEvent::Status(status([0, 6, 5])));
        app.poll();
    }

    #[test]
    fn test_restart_requires_connection() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        app.restart_sensor();
        assert!(sink.sent.lock().is_empty());
        assert_eq!(app.state().status_message, Some("Sensor not connected"));

        connect(&mut app, &bus);
        app.restart_sensor();
        assert_eq!(*sink.sent.lock(), vec![SensorCommand::Restart]);
    }

    #[test]
    fn test_ota_sends_version_and_disconnects() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        connect(&mut app, &bus);
        app.store.set_firmware_available(Some("0.7.0".into()));

        app.firmware_update();
        assert_eq!(
            *sink.sent.lock(),
            vec![SensorCommand::Update(UpdateTarget::Version("0.7.0".into()))]
        );
        assert!(!app.store().connected());
        assert!(app.store().sensor_status().is_none());
    }

    #[test]
    fn test_ota_not_sent_when_up_to_date() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        connect(&mut app, &bus);
        app.store.set_firmware_available(Some("0.6.5".into()));
        app.firmware_update();
        assert!(sink.sent.lock().is_empty());
        assert!(app.store().connected());
    }

    #[test]
    fn test_custom_update_url_validation() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        connect(&mut app, &bus);

        app.custom_firmware_update("not a url");
        assert!(sink.sent.lock().is_empty());
        assert!(app.store().connected());

        app.custom_firmware_update("http://192.168.4.2/firmware.bin");
        assert_eq!(
            *sink.sent.lock(),
            vec![SensorCommand::Update(UpdateTarget::Url(
                "http://192.168.4.2/firmware.bin".into()
            ))]
        );
        assert!(!app.store().connected());
    }

    #[test]
    fn test_rejected_amplitude_is_reported_not_sent() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        connect(&mut app, &bus);

        assert_eq!(app.apply_amplitude("256"), None);
        assert!(sink.sent.lock().is_empty());
        assert!(app
            .state()
            .status_message
            .is_some_and(|m| m.contains("amplitude")));
        assert!(app.logs().iter().any(|e| matches!(
            &e.kind,
            LogKind::App { message, .. } if message.contains("0..=255")
        )));

        assert_eq!(app.apply_amplitude("70"), Some("70".into()));
        assert_eq!(*sink.sent.lock(), vec![SensorCommand::SetAmplitude(70)]);
        assert_eq!(app.store().amplitude(), 70);
    }

    #[test]
    fn test_amplitude_kept_while_disconnected() {
        let (mut app, _, sink) = test_app("192.168.4.1");
        assert_eq!(app.apply_amplitude("12"), Some("12".into()));
        assert_eq!(app.store().amplitude(), 12);
        assert!(sink.sent.lock().is_empty());
    }

    #[test]
    fn test_port_validation_and_forwarding() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        assert_eq!(app.apply_port("70"), None);
        assert_eq!(app.apply_port("abc"), None);
        assert_eq!(app.store().udp_port(), 34254);

        connect(&mut app, &bus);
        assert_eq!(app.apply_port("9000"), Some("9000".into()));
        assert_eq!(app.store().udp_port(), 9000);
        assert_eq!(app.config.sensor.stream_port, 9000);
        assert_eq!(*sink.sent.lock(), vec![SensorCommand::SetPort(9000)]);
    }

    #[test]
    fn test_ip_change_retargets_sink() {
        let (mut app, _, sink) = test_app("");
        assert_eq!(app.apply_ip("10.0.0.300"), None);
        assert!(sink.target.lock().is_none());

        assert_eq!(app.apply_ip("10.0.0.7"), Some("10.0.0.7".into()));
        assert_eq!(app.store().sensor_ip(), Some(Ipv4Addr::new(10, 0, 0, 7)));
        assert_eq!(*sink.target.lock(), Some("10.0.0.7:34255".parse().unwrap()));
    }

    #[test]
    fn test_ip_locked_while_connected() {
        let (mut app, bus, sink) = test_app("192.168.4.1");
        connect(&mut app, &bus);
        assert_eq!(app.apply_ip("10.0.0.7"), None);
        assert_eq!(app.store().sensor_ip(), Some(Ipv4Addr::new(192, 168, 4, 1)));
        assert_eq!(
            *sink.target.lock(),
            Some("192.168.4.1:34255".parse().unwrap())
        );
    }

    #[test]
    fn test_send_without_address_is_reported() {
        let (mut app, bus, sink) = test_app("");
        // Connected via datagrams but no address to answer to
        connect(&mut app, &bus);
        app.restart_sensor();
        assert!(sink.sent.lock().is_empty());
        assert_eq!(
            app.state().status_message,
            Some("No sensor IP address configured")
        );
    }

    #[tokio::test]
    async fn test_dummy_toggle() {
        let (mut app, _, _) = test_app("");
        app.toggle_dummy_data();
        assert!(app.store().dummy_data());
        assert!(app.dummy.is_some());
        app.toggle_dummy_data();
        assert!(!app.store().dummy_data());
        assert!(app.dummy.is_none());
    }
}
