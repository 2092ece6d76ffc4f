//! Actions widget - displays keyboard shortcuts bar
//!
//! Shows the commands of the current tab, or the latest status message.

use crate::app::{AppState, Tab};
use crate::ui::theme::{STYLE_ACTION, STYLE_BRIGHT, STYLE_DIM, STYLE_KEY};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct ActionsWidget<'a> {
    state: &'a AppState<'a>,
}

impl<'a> ActionsWidget<'a> {
    pub fn new(state: &'a AppState<'a>) -> Self {
        Self { state }
    }

    fn tab_actions(&self) -> Vec<(&'static str, &'static str)> {
        match self.state.tab {
            Tab::Status => {
                let mut actions = vec![("N", "Check updates")];
                if self.state.store.can_update_firmware() {
                    actions.push(("U", "Flash firmware"));
                }
                if self.state.app_release.is_some() {
                    actions.push(("G", "Download app"));
                }
                actions
            }
            Tab::Plot => vec![],
            Tab::Logs => vec![
                ("P", if self.state.paused { "Resume" } else { "Pause" }),
                ("V", "Filter"),
                ("C", "Copy"),
                ("X", "Cut"),
                ("E", "Export"),
                ("L", "Files"),
                ("⌫", "Clear"),
            ],
        }
    }
}

impl Widget for ActionsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let global = [
            ("1-3", "Tabs"),
            ("S", "Settings"),
            ("R", "Restart sensor"),
            ("D", if self.state.store.dummy_data() { "Dummy off" } else { "Dummy on" }),
            ("F", "Config"),
            ("Q", "Quit"),
        ];

        let line1 = match self.state.status_message {
            Some(message) => Line::from(vec![
                Span::raw("  "),
                Span::styled(message.to_string(), STYLE_BRIGHT),
            ]),
            None => key_line(&self.tab_actions()),
        };
        let line2 = key_line(&global);

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(STYLE_DIM);

        Paragraph::new(vec![line1, line2])
            .block(block)
            .render(area, buf);
    }
}

fn key_line(actions: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (key, label) in actions {
        spans.push(Span::styled(*key, STYLE_KEY));
        spans.push(Span::styled(format!(" {}  ", label), STYLE_ACTION));
    }
    Line::from(spans)
}
