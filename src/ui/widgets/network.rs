//! Network widget - UDP link, traffic counters and sensor health

use crate::app::{AppState, LinkState};
use crate::ui::theme::{
    COLOR_ERROR, COLOR_SUCCESS, STYLE_BORDER, STYLE_LABEL, STYLE_MUTED, STYLE_VALUE, SYMBOL_FAIL,
    SYMBOL_IN, SYMBOL_OK,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct NetworkWidget<'a> {
    state: &'a AppState<'a>,
}

impl<'a> NetworkWidget<'a> {
    pub fn new(state: &'a AppState<'a>) -> Self {
        Self { state }
    }
}

impl Widget for NetworkWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let store = self.state.store;

        let link = match self.state.link {
            LinkState::Listening { port } => Span::styled(format!("UDP:{}", port), STYLE_VALUE),
            LinkState::Down => Span::styled(
                format!("UDP:{} (not listening)", store.udp_port()),
                Style::new().fg(COLOR_ERROR),
            ),
        };

        let target = match self.state.command_target {
            Some(addr) => Span::styled(addr.to_string(), STYLE_VALUE),
            None => Span::styled("No sensor IP (s to set)", STYLE_MUTED),
        };

        let traffic = format!(
            "{} {:.1} pkt/s   {} packets   {} bad",
            SYMBOL_IN, self.state.packet_rate, self.state.rx_packets, self.state.decode_errors
        );

        let mut lines = vec![
            Line::from(vec![Span::styled("  Listening  ", STYLE_LABEL), link]),
            Line::from(vec![Span::styled("  Commands   ", STYLE_LABEL), target]),
            Line::from(vec![
                Span::styled("  Traffic    ", STYLE_LABEL),
                Span::styled(traffic, STYLE_VALUE),
            ]),
            Line::from(vec![
                Span::styled("  Amplitude  ", STYLE_LABEL),
                Span::styled(store.amplitude().to_string(), STYLE_VALUE),
            ]),
        ];

        match store.sensor_status() {
            Some(status) => {
                lines.push(Line::from(vec![
                    Span::styled("  Health     ", STYLE_LABEL),
                    health("sensor", status.sensor_ok),
                    health("display", status.display_ok),
                    health("motor", status.motor_ok),
                ]));
                let addresses = if status.i2c_addresses.is_empty() {
                    "none".to_string()
                } else {
                    status
                        .i2c_addresses
                        .iter()
                        .map(|a| format!("0x{:02X}", a))
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                lines.push(Line::from(vec![
                    Span::styled("  I2C        ", STYLE_LABEL),
                    Span::styled(addresses, STYLE_VALUE),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("  Outputs    ", STYLE_LABEL),
                    Span::styled(
                        format!(
                            "motor {}   led {}",
                            status.motor_amplitude, status.led_amplitude
                        ),
                        STYLE_VALUE,
                    ),
                ]));
            }
            None => lines.push(Line::from(vec![
                Span::styled("  Health     ", STYLE_LABEL),
                Span::styled("–", STYLE_MUTED),
            ])),
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_BORDER)
            .title(Span::styled(" Network ", STYLE_LABEL));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn health(name: &'static str, ok: bool) -> Span<'static> {
    if ok {
        Span::styled(format!("{} {}  ", SYMBOL_OK, name), Style::new().fg(COLOR_SUCCESS))
    } else {
        Span::styled(format!("{} {}  ", SYMBOL_FAIL, name), Style::new().fg(COLOR_ERROR))
    }
}
