//! Log widget - displays scrollable message log with responsive filter sidebar
//!
//! Wide mode: logs on left, filter sidebar on right
//! Narrow mode: filter bar above logs

use crate::constants::{SIDEBAR_WIDTH, WIDE_THRESHOLD};
use crate::logging::{Direction, FilterMode, LogEntry, LogFilter, LogKind, LogLevel};
use crate::ui::theme::{
    style_bold, COLOR_BRIGHT, COLOR_ERROR, COLOR_LOG_IN, COLOR_LOG_OUT, COLOR_LOG_SYSTEM,
    COLOR_MUTED, COLOR_WARNING, STYLE_BORDER, STYLE_BRIGHT, STYLE_DIM, STYLE_KEY, STYLE_LABEL,
    STYLE_MUTED, STYLE_TEXT, SYMBOL_IN, SYMBOL_OUT,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};
use std::collections::VecDeque;

const MODES: [FilterMode; 3] = [FilterMode::All, FilterMode::Sensor, FilterMode::App];

pub struct LogWidget<'a> {
    entries: &'a VecDeque<LogEntry>,
    filter: &'a LogFilter,
    filter_mode: FilterMode,
    scroll: usize,
    paused: bool,
}

impl<'a> LogWidget<'a> {
    pub fn new(
        entries: &'a VecDeque<LogEntry>,
        filter: &'a LogFilter,
        filter_mode: FilterMode,
        scroll: usize,
        paused: bool,
    ) -> Self {
        Self {
            entries,
            filter,
            filter_mode,
            scroll,
            paused,
        }
    }

    fn is_wide(&self, width: u16) -> bool {
        width > WIDE_THRESHOLD
    }
}

impl Widget for LogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let is_wide = self.is_wide(area.width);

        if is_wide {
            self.render_wide(area, buf);
        } else {
            self.render_narrow(area, buf);
        }
    }
}

impl LogWidget<'_> {
    /// Render wide layout: logs on left, filter sidebar on right
    fn render_wide(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::horizontal([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);

        self.render_logs(chunks[0], buf);
        self.render_sidebar(chunks[1], buf);
    }

    /// Render narrow layout: filter bar on top, logs below
    fn render_narrow(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);

        self.render_filter_bar(chunks[0], buf);
        self.render_logs(chunks[1], buf);
    }

    /// Render the filter bar (narrow mode)
    fn render_filter_bar(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(" Filter ", STYLE_LABEL),
            Span::styled("v", STYLE_KEY),
            Span::raw(" "),
        ];
        for mode in MODES {
            spans.push(self.filter_button(mode.label(), self.filter_mode == mode));
            spans.push(Span::raw(" "));
        }
        if self.filter_mode == FilterMode::App {
            spans.push(Span::styled(
                format!(" {}", level_label(self.filter.min_level)),
                STYLE_MUTED,
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(STYLE_DIM)
            .render(area, buf);
    }

    /// Render the filter sidebar (wide mode)
    fn render_sidebar(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_DIM)
            .title(Span::styled(" Filter ", STYLE_LABEL));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = MODES
            .iter()
            .map(|mode| self.sidebar_item(mode.label(), self.filter_mode == *mode))
            .collect();
        lines.push(Line::from(vec![
            Span::styled("  v", STYLE_KEY),
            Span::styled(" cycle", STYLE_MUTED),
        ]));

        if self.filter_mode == FilterMode::App {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", level_label(self.filter.min_level)),
                STYLE_TEXT,
            )));
            lines.push(Line::from(vec![
                Span::styled("  i", STYLE_KEY),
                Span::styled(" w", STYLE_KEY),
                Span::styled(" a", STYLE_KEY),
                Span::styled(" level", STYLE_MUTED),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }

    /// Create a filter button span
    fn filter_button(&self, label: &str, active: bool) -> Span<'static> {
        if active {
            Span::styled(format!("[{}]", label), style_bold(COLOR_BRIGHT))
        } else {
            Span::styled(format!(" {} ", label), STYLE_MUTED)
        }
    }

    /// Create a sidebar filter item line
    fn sidebar_item(&self, label: &str, active: bool) -> Line<'static> {
        if active {
            Line::from(vec![
                Span::styled(" ▶ ", STYLE_BRIGHT),
                Span::styled(label.to_string(), style_bold(COLOR_BRIGHT)),
            ])
        } else {
            Line::from(vec![
                Span::raw("   "),
                Span::styled(label.to_string(), STYLE_MUTED),
            ])
        }
    }

    /// Render the main logs area
    fn render_logs(&self, area: Rect, buf: &mut Buffer) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(3) as usize; // -2 for borders, -1 for scrollbar

        // Count filtered entries
        let total_lines = self
            .entries
            .iter()
            .filter(|e| self.filter.matches(e))
            .count();

        let start = self.scroll.saturating_sub(inner_height.saturating_sub(1));
        let end = (start + inner_height).min(total_lines);

        // Format visible lines
        let lines: Vec<Line> = self
            .entries
            .iter()
            .filter(|e| self.filter.matches(e))
            .skip(start)
            .take(end - start)
            .map(|entry| format_log_entry(entry, inner_width))
            .collect();

        // Title with pause hint on the right
        let title_left = " Logs ";
        let title_right = if self.paused {
            Line::from(vec![
                Span::styled("PAUSED ", Style::new().fg(COLOR_WARNING)),
                Span::styled("P Resume ", STYLE_MUTED),
            ])
        } else {
            Line::from(Span::styled("P Pause ", STYLE_DIM))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_BORDER)
            .title(Span::styled(title_left, STYLE_LABEL))
            .title_bottom(title_right);

        let paragraph = Paragraph::new(lines).block(block);
        paragraph.render(area, buf);

        // Render scrollbar if needed
        if total_lines > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));

            let mut scrollbar_state = ScrollbarState::new(total_lines).position(self.scroll);

            let scrollbar_area = Rect {
                x: area.x + area.width - 1,
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };

            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}

/// Format a log entry into a styled Line
fn format_log_entry(entry: &LogEntry, max_width: usize) -> Line<'static> {
    // "  " + timestamp(12) + " " + tag(6) leaves the rest for the message
    let msg_width = max_width.saturating_sub(22);

    match &entry.kind {
        LogKind::Sensor {
            direction,
            message_name,
            detail,
        } => {
            let (symbol, color) = match direction {
                Direction::In => (SYMBOL_IN, COLOR_LOG_IN),
                Direction::Out => (SYMBOL_OUT, COLOR_LOG_OUT),
            };
            let name_width = 16.min(msg_width);

            Line::from(vec![
                Span::styled(format!("  {} ", entry.timestamp), STYLE_MUTED),
                Span::styled(format!(" {}    ", symbol), Style::new().fg(color)),
                Span::styled(pad_or_truncate(message_name, name_width), STYLE_TEXT),
                Span::styled(
                    pad_or_truncate(detail, msg_width.saturating_sub(name_width)),
                    STYLE_MUTED,
                ),
            ])
        }
        LogKind::App { level, message } => {
            let (level_str, color) = match level {
                LogLevel::Debug => ("[DBG]", COLOR_MUTED),
                LogLevel::Info => ("[INF]", COLOR_LOG_OUT),
                LogLevel::Warn => ("[WRN]", COLOR_WARNING),
                LogLevel::Error => ("[ERR]", COLOR_ERROR),
            };

            Line::from(vec![
                Span::styled(format!("  {} ", entry.timestamp), STYLE_MUTED),
                Span::styled(format!("{} ", level_str), Style::new().fg(color)),
                Span::styled(pad_or_truncate(message, msg_width), STYLE_TEXT),
            ])
        }
        LogKind::System { message } => Line::from(vec![
            Span::styled(format!("  {} ", entry.timestamp), STYLE_MUTED),
            Span::raw("      "),
            Span::styled(
                pad_or_truncate(message, msg_width),
                Style::new().fg(COLOR_LOG_SYSTEM),
            ),
        ]),
    }
}

fn level_label(level: Option<LogLevel>) -> &'static str {
    match level {
        Some(LogLevel::Debug) => "DEBUG+",
        Some(LogLevel::Info) => "INFO+",
        Some(LogLevel::Warn) => "WARN+",
        Some(LogLevel::Error) => "ERROR",
        None => "All levels",
    }
}

/// Pad or truncate a string to exactly the given width (in chars)
fn pad_or_truncate(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{:<width$}", s, width = width)
    } else if width > 3 {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(width).collect()
    }
}
