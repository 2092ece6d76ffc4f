//! Settings popup widget
//!
//! Modal for the sensor address, the UDP stream port, the motor amplitude
//! and a custom firmware URL. Values are applied one field at a time.

use crate::app::{SettingsField, SettingsPopup};
use crate::ui::theme::{
    style_title, COLOR_ACCENT, COLOR_BRIGHT, COLOR_VALUE, STYLE_BRIGHT, STYLE_LABEL, STYLE_MUTED,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const FIELDS: [SettingsField; 4] = [
    SettingsField::SensorIp,
    SettingsField::UdpPort,
    SettingsField::Amplitude,
    SettingsField::UpdateUrl,
];

pub struct SettingsWidget<'a> {
    popup: &'a SettingsPopup,
}

impl<'a> SettingsWidget<'a> {
    pub fn new(popup: &'a SettingsPopup) -> Self {
        Self { popup }
    }

    fn popup_area(area: Rect) -> Rect {
        let width = 56.min(area.width.saturating_sub(4));
        let height = 11.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for SettingsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = Self::popup_area(area);
        Clear.render(popup_area, buf);

        let selected = self.popup.selected_field;
        let editing = self.popup.editing;

        let mut content = vec![Line::from("")];
        for field in FIELDS {
            content.push(build_field_line(
                field.label(),
                self.popup.value(field),
                selected == field,
                editing && selected == field,
                &self.popup.input_buffer,
            ));
        }

        // Enter on the URL field starts an OTA from that URL
        let hint = if selected == SettingsField::UpdateUrl {
            "  Enter flashes the firmware at this URL"
        } else {
            ""
        };
        content.push(Line::from(Span::styled(hint, STYLE_MUTED)));
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("  ↑↓", STYLE_BRIGHT),
            Span::styled(" nav  ", STYLE_MUTED),
            Span::styled("Enter", STYLE_BRIGHT),
            Span::styled(if editing { " apply  " } else { " edit  " }, STYLE_MUTED),
            Span::styled("Esc", STYLE_BRIGHT),
            Span::styled(if editing { " cancel" } else { " close" }, STYLE_MUTED),
        ]));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::new().fg(COLOR_ACCENT))
            .title(Span::styled(" Sensor Settings ", style_title()))
            .title_alignment(Alignment::Center);

        Paragraph::new(content).block(block).render(popup_area, buf);
    }
}

/// Build a line for a field with optional editing state
fn build_field_line<'a>(
    label: &'a str,
    value: &'a str,
    selected: bool,
    editing: bool,
    input: &'a str,
) -> Line<'a> {
    let selector = if selected { "▶ " } else { "  " };
    let selector_style = if selected {
        Style::new().fg(COLOR_ACCENT)
    } else {
        Style::new()
    };

    let value_text = if editing {
        format!("{}_", input)
    } else if value.is_empty() {
        "–".to_string()
    } else {
        value.to_string()
    };

    let value_style = if editing {
        Style::new().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    } else if selected {
        Style::new().fg(COLOR_BRIGHT)
    } else {
        Style::new().fg(COLOR_VALUE)
    };

    Line::from(vec![
        Span::styled(selector, selector_style),
        Span::styled(format!("{:<12}", label), STYLE_LABEL),
        Span::styled(value_text, value_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(popup: &SettingsPopup) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 70, 16));
        SettingsWidget::new(popup).render(buf.area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_all_fields() {
        let popup = SettingsPopup::new("192.168.4.1".into(), 34254, 120, String::new());
        let text = render_to_string(&popup);
        assert!(text.contains("Sensor IP"));
        assert!(text.contains("192.168.4.1"));
        assert!(text.contains("34254"));
        assert!(text.contains("120"));
    }

    #[test]
    fn test_editing_shows_cursor() {
        let mut popup = SettingsPopup::new(String::new(), 34254, 0, String::new());
        popup.editing = true;
        popup.input_buffer = "10.0".into();
        let text = render_to_string(&popup);
        assert!(text.contains("10.0_"));
    }
}
