//! Settings popup
//!
//! Open, close, and submit operations for the sensor settings popup.

use super::settings::{SettingsField, SettingsPopup};
use super::App;

impl App {
    /// Open settings popup with the current values
    pub fn open_settings(&mut self) {
        self.settings = Some(SettingsPopup::new(
            self.store
                .sensor_ip()
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            self.store.udp_port(),
            self.store.amplitude(),
            self.custom_update_url.clone(),
        ));
    }

    /// Close settings popup
    pub fn close_settings(&mut self) {
        self.settings = None;
    }

    /// Validate and apply one edited field. The popup stays open either way.
    pub fn submit_setting(&mut self, field: SettingsField, value: &str) {
        let accepted = match field {
            SettingsField::SensorIp => self.apply_ip(value),
            SettingsField::UdpPort => self.apply_port(value),
            SettingsField::Amplitude => self.apply_amplitude(value),
            SettingsField::UpdateUrl => {
                self.custom_firmware_update(value);
                Some(self.custom_update_url.clone())
            }
        };

        if let (Some(popup), Some(value)) = (self.settings.as_mut(), accepted) {
            popup.set_value(field, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app};
    use crate::app::SettingsField;
    use crossterm::event::KeyCode;

    fn type_text(app: &mut crate::app::App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_edit_port_through_popup() {
        let (mut app, _, _) = test_app("192.168.4.1");
        app.open_settings();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Backspace));
        }
        type_text(&mut app, "9000");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.store().udp_port(), 9000);
        assert_eq!(app.settings().map(|p| p.udp_port.as_str()), Some("9000"));
    }

    #[test]
    fn test_rejected_value_keeps_previous_display() {
        let (mut app, _, _) = test_app("192.168.4.1");
        app.open_settings();
        app.submit_setting(SettingsField::UdpPort, "80");

        assert_eq!(app.store().udp_port(), 34254);
        assert_eq!(app.settings().map(|p| p.udp_port.as_str()), Some("34254"));
        assert!(app.state().status_message.is_some());
    }

    #[test]
    fn test_popup_shows_current_values() {
        let (mut app, _, _) = test_app("192.168.4.1");
        app.open_settings();
        let popup = app.settings().unwrap();
        assert_eq!(popup.sensor_ip, "192.168.4.1");
        assert_eq!(popup.amplitude, "0");
        app.close_settings();
        assert!(app.settings().is_none());
    }
}
