//! Device widget - firmware and application versions, connection state

use crate::app::AppState;
use crate::ui::theme::{
    COLOR_CONNECTED, COLOR_DISCONNECTED, STYLE_BORDER, STYLE_LABEL, STYLE_MUTED, STYLE_VALUE,
    SYMBOL_CONNECTED, SYMBOL_DISCONNECTED,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct DeviceWidget<'a> {
    state: &'a AppState<'a>,
}

impl<'a> DeviceWidget<'a> {
    pub fn new(state: &'a AppState<'a>) -> Self {
        Self { state }
    }
}

impl Widget for DeviceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let store = self.state.store;

        let firmware = match store.sensor_status() {
            Some(status) => Span::styled(format!("v{}", status.version), STYLE_VALUE),
            None => Span::styled("–", STYLE_MUTED),
        };

        let connected = if store.connected() {
            Span::styled(
                format!("{} Yes", SYMBOL_CONNECTED),
                Style::new().fg(COLOR_CONNECTED),
            )
        } else {
            Span::styled(
                format!("{} No", SYMBOL_DISCONNECTED),
                Style::new().fg(COLOR_DISCONNECTED),
            )
        };

        let lines = vec![
            Line::from(vec![Span::styled("  Firmware   ", STYLE_LABEL), firmware]),
            Line::from(vec![
                Span::styled("  App        ", STYLE_LABEL),
                Span::styled(format!("v{}", store.app_version()), STYLE_VALUE),
            ]),
            Line::from(vec![Span::styled("  Connected  ", STYLE_LABEL), connected]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_BORDER)
            .title(Span::styled(" Device ", STYLE_LABEL));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
