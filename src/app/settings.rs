//! Sensor settings popup state and logic

use crossterm::event::KeyCode;

/// Action returned by handle_key for App to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// No action needed
    None,
    /// Close the popup
    Close,
    /// An edited value was confirmed and should be validated and applied
    Submit { field: SettingsField, value: String },
}

/// Which field is currently selected in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    SensorIp,
    UdpPort,
    Amplitude,
    UpdateUrl,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::SensorIp => SettingsField::UdpPort,
            SettingsField::UdpPort => SettingsField::Amplitude,
            SettingsField::Amplitude => SettingsField::UpdateUrl,
            SettingsField::UpdateUrl => SettingsField::SensorIp,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::SensorIp => SettingsField::UpdateUrl,
            SettingsField::UdpPort => SettingsField::SensorIp,
            SettingsField::Amplitude => SettingsField::UdpPort,
            SettingsField::UpdateUrl => SettingsField::Amplitude,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::SensorIp => "Sensor IP",
            SettingsField::UdpPort => "UDP Port",
            SettingsField::Amplitude => "Amplitude",
            SettingsField::UpdateUrl => "Update URL",
        }
    }
}

/// State for the settings popup
#[derive(Debug, Clone)]
pub struct SettingsPopup {
    pub sensor_ip: String,
    pub udp_port: String,
    pub amplitude: String,
    pub update_url: String,

    // UI state
    pub selected_field: SettingsField,
    pub editing: bool,
    pub input_buffer: String,
}

impl SettingsPopup {
    pub fn new(sensor_ip: String, udp_port: u16, amplitude: u8, update_url: String) -> Self {
        Self {
            sensor_ip,
            udp_port: udp_port.to_string(),
            amplitude: amplitude.to_string(),
            update_url,
            selected_field: SettingsField::SensorIp,
            editing: false,
            input_buffer: String::new(),
        }
    }

    pub fn value(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::SensorIp => &self.sensor_ip,
            SettingsField::UdpPort => &self.udp_port,
            SettingsField::Amplitude => &self.amplitude,
            SettingsField::UpdateUrl => &self.update_url,
        }
    }

    /// Store an accepted value for display
    pub fn set_value(&mut self, field: SettingsField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SettingsField::SensorIp => self.sensor_ip = value,
            SettingsField::UdpPort => self.udp_port = value,
            SettingsField::Amplitude => self.amplitude = value,
            SettingsField::UpdateUrl => self.update_url = value,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> SettingsAction {
        if self.editing {
            return self.handle_edit_key(key);
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => SettingsAction::Close,
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.selected_field = self.selected_field.prev();
                SettingsAction::None
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected_field = self.selected_field.next();
                SettingsAction::None
            }
            KeyCode::Enter => {
                self.editing = true;
                self.input_buffer = self.value(self.selected_field).to_string();
                SettingsAction::None
            }
            _ => SettingsAction::None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode) -> SettingsAction {
        match key {
            KeyCode::Esc => {
                self.editing = false;
                self.input_buffer.clear();
                SettingsAction::None
            }
            KeyCode::Enter => {
                self.editing = false;
                SettingsAction::Submit {
                    field: self.selected_field,
                    value: std::mem::take(&mut self.input_buffer),
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                SettingsAction::None
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                SettingsAction::None
            }
            _ => SettingsAction::None,
        }
    }
}
