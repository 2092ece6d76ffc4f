//! Header widget - title, tab bar and connection indicator

use crate::app::{AppState, Tab};
use crate::constants::APP_VERSION;
use crate::ui::theme::{
    style_bold, style_title, COLOR_ACCENT, COLOR_CONNECTED, COLOR_DISCONNECTED, COLOR_WARNING,
    STYLE_BORDER, STYLE_MUTED, SYMBOL_CONNECTED, SYMBOL_DISCONNECTED,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Widget},
};

pub struct HeaderWidget<'a> {
    state: &'a AppState<'a>,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(state: &'a AppState<'a>) -> Self {
        Self { state }
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(STYLE_BORDER);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::horizontal([
            Constraint::Length(20),
            Constraint::Min(30),
            Constraint::Length(30),
        ])
        .split(inner);

        let title = Line::from(vec![
            Span::styled(" PULSE DASH ", style_title()),
            Span::styled(format!("v{}", APP_VERSION), STYLE_MUTED),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        Tabs::new(titles)
            .select(self.state.tab.index())
            .style(STYLE_MUTED)
            .highlight_style(style_bold(COLOR_ACCENT))
            .divider(Span::styled("│", STYLE_BORDER))
            .render(chunks[1], buf);

        let (symbol, label, color) = if self.state.store.connected() {
            (SYMBOL_CONNECTED, "Connected", COLOR_CONNECTED)
        } else {
            (SYMBOL_DISCONNECTED, "Disconnected", COLOR_DISCONNECTED)
        };
        let mut spans = Vec::new();
        if self.state.store.dummy_data() {
            spans.push(Span::styled("DUMMY  ", Style::new().fg(COLOR_WARNING)));
        }
        spans.push(Span::styled(format!("{} ", symbol), Style::new().fg(color)));
        spans.push(Span::styled(label, Style::new().fg(color)));
        spans.push(Span::raw(" "));
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Right)
            .render(chunks[2], buf);
    }
}
