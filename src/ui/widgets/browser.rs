//! Log browser widget - files in the log directory, or one file's content

use crate::app::LogBrowser;
use crate::ui::theme::{
    style_bold, COLOR_BRIGHT, COLOR_ERROR, STYLE_BORDER, STYLE_KEY, STYLE_LABEL, STYLE_MUTED,
    STYLE_TEXT,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct BrowserWidget<'a> {
    browser: &'a LogBrowser,
}

impl<'a> BrowserWidget<'a> {
    pub fn new(browser: &'a LogBrowser) -> Self {
        Self { browser }
    }

    fn file_list(&self, height: usize) -> Vec<Line<'a>> {
        let files = self.browser.files();
        if files.is_empty() {
            return vec![Line::from(Span::styled("  No log files yet", STYLE_MUTED))];
        }

        let selected = self.browser.selected();
        let start = selected.saturating_sub(height.saturating_sub(1));
        files
            .iter()
            .enumerate()
            .skip(start)
            .take(height)
            .map(|(i, file)| {
                let modified = file
                    .modified
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                let (marker, name_style) = if i == selected {
                    ("▶ ", style_bold(COLOR_BRIGHT))
                } else {
                    ("  ", STYLE_TEXT)
                };
                Line::from(vec![
                    Span::styled(marker, STYLE_KEY),
                    Span::styled(format!("{:<36}", file.name), name_style),
                    Span::styled(format!("{:>10}  ", file.size), STYLE_MUTED),
                    Span::styled(modified, STYLE_MUTED),
                ])
            })
            .collect()
    }
}

impl Widget for BrowserWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = area.height.saturating_sub(2) as usize;

        let (title, hint, mut lines) = match self.browser.open_file() {
            Some((name, content)) => {
                let lines: Vec<Line> = content
                    .lines()
                    .skip(self.browser.scroll())
                    .take(height)
                    .map(|l| Line::from(Span::styled(l, STYLE_TEXT)))
                    .collect();
                (
                    format!(" {} ", name),
                    " ↑↓ scroll  C copy  R refresh  Esc back ",
                    lines,
                )
            }
            None => (
                format!(" {} ", self.browser.dir().display()),
                " ↑↓ select  Enter open  R refresh  Esc close ",
                self.file_list(height),
            ),
        };

        if let Some(error) = self.browser.error() {
            lines.insert(
                0,
                Line::from(Span::styled(
                    format!("  {}", error),
                    Style::new().fg(COLOR_ERROR),
                )),
            );
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_BORDER)
            .title(Span::styled(title, STYLE_LABEL))
            .title_bottom(Line::from(Span::styled(hint, STYLE_MUTED)));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
