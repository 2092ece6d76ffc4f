//! Updates widget - dashboard and firmware release state, download gauge

use crate::app::AppState;
use crate::store::{AppUpdate, FirmwareUpdate};
use crate::ui::theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_ERROR, COLOR_SUCCESS, COLOR_WARNING, STYLE_BORDER,
    STYLE_LABEL, STYLE_MUTED, STYLE_VALUE,
};
use crate::updates::{DownloadProgress, DownloadState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

pub struct UpdatesWidget<'a> {
    state: &'a AppState<'a>,
}

impl<'a> UpdatesWidget<'a> {
    pub fn new(state: &'a AppState<'a>) -> Self {
        Self { state }
    }

    fn app_line(&self) -> Line<'static> {
        let value = match self.state.store.app_update() {
            AppUpdate::Unknown => Span::styled("Not checked", STYLE_MUTED),
            AppUpdate::UpToDate => Span::styled("Up to date", Style::new().fg(COLOR_SUCCESS)),
            AppUpdate::Available { version } => Span::styled(
                format!("v{} available (g download)", version),
                Style::new().fg(COLOR_WARNING),
            ),
            AppUpdate::Unavailable => Span::styled("Check failed", STYLE_MUTED),
        };
        Line::from(vec![Span::styled("  Dashboard  ", STYLE_LABEL), value])
    }

    fn firmware_line(&self) -> Line<'static> {
        let store = self.state.store;
        let value = if !store.connected() {
            Span::styled("Sensor not connected", STYLE_MUTED)
        } else {
            match store.firmware_update() {
                FirmwareUpdate::Unknown => Span::styled("Unknown", STYLE_MUTED),
                FirmwareUpdate::UpToDate => {
                    Span::styled("Up to date", Style::new().fg(COLOR_SUCCESS))
                }
                FirmwareUpdate::Available(version) => Span::styled(
                    format!("v{} available (u flash)", version),
                    Style::new().fg(COLOR_WARNING),
                ),
                FirmwareUpdate::Invalid(version) => Span::styled(
                    format!("Bad release version {:?}", version),
                    Style::new().fg(COLOR_ERROR),
                ),
            }
        };
        Line::from(vec![Span::styled("  Firmware   ", STYLE_LABEL), value])
    }

    fn url_line(&self) -> Line<'static> {
        let url = self.state.custom_update_url;
        let value = if url.is_empty() {
            Span::styled("–", STYLE_MUTED)
        } else {
            Span::styled(url.to_string(), STYLE_VALUE)
        };
        Line::from(vec![Span::styled("  Custom URL ", STYLE_LABEL), value])
    }
}

impl Widget for UpdatesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(STYLE_BORDER)
            .title(Span::styled(" Updates ", STYLE_LABEL));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).split(inner);

        Paragraph::new(vec![self.app_line(), self.firmware_line(), self.url_line()])
            .render(chunks[0], buf);

        let gauge_area = Rect {
            x: chunks[1].x + 2,
            width: chunks[1].width.saturating_sub(4),
            ..chunks[1]
        };
        render_download(self.state.download, gauge_area, buf);
    }
}

/// Download gauge. Without a known length the bar stays empty and shows
/// the byte count instead of a percentage.
fn render_download(progress: &DownloadProgress, area: Rect, buf: &mut Buffer) {
    let (ratio, label, color) = match progress.state() {
        DownloadState::Idle => return,
        DownloadState::Running => match progress.fraction() {
            Some(f) => (f, format!("{:.0}%", f * 100.0), COLOR_ACCENT),
            None => (
                0.0,
                format!("{} downloaded", format_bytes(progress.downloaded())),
                COLOR_ACCENT,
            ),
        },
        DownloadState::Finished(path) => (1.0, format!("Saved {}", path.display()), COLOR_SUCCESS),
        DownloadState::Failed(reason) => (0.0, format!("Failed: {}", reason), COLOR_ERROR),
    };

    Gauge::default()
        .gauge_style(Style::new().fg(color).bg(COLOR_BORDER))
        .ratio(ratio)
        .label(label)
        .render(area, buf);
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::DownloadEvent;

    fn gauge_text(progress: &DownloadProgress) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 1));
        render_download(progress, buf.area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_unknown_length_shows_bytes() {
        let mut progress = DownloadProgress::new();
        progress.apply(&DownloadEvent::Started {
            content_length: None,
        });
        progress.apply(&DownloadEvent::Progress { chunk_len: 2048 });
        assert!(gauge_text(&progress).contains("2.0 KB downloaded"));
    }

    #[test]
    fn test_known_length_shows_percent() {
        let mut progress = DownloadProgress::new();
        progress.apply(&DownloadEvent::Started {
            content_length: Some(200),
        });
        progress.apply(&DownloadEvent::Progress { chunk_len: 50 });
        assert!(gauge_text(&progress).contains("25%"));
    }

    #[test]
    fn test_idle_draws_nothing() {
        let text = gauge_text(&DownloadProgress::new());
        assert!(text.trim().is_empty());
    }
}
