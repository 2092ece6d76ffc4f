//! Plot widget - heartbeat and raw signal charts with BPM/IBI readouts

use crate::app::PlotView;
use crate::plot::{Series, XAxis};
use crate::ui::theme::{
    style_bold, COLOR_ACCENT, COLOR_DIM, COLOR_PULSE, STYLE_BORDER, STYLE_LABEL, STYLE_MUTED,
    SYMBOL_HEART,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

pub struct PlotWidget<'a> {
    view: &'a PlotView,
}

impl<'a> PlotWidget<'a> {
    pub fn new(view: &'a PlotView) -> Self {
        Self { view }
    }

    fn readout_line(&self) -> Line<'static> {
        let bpm = self.view.bpm();
        let bpm_text = if bpm > 0.0 {
            format!("{:.0}", bpm)
        } else {
            "–".to_string()
        };
        Line::from(vec![
            Span::styled(format!("  {} ", SYMBOL_HEART), style_bold(COLOR_PULSE)),
            Span::styled("BPM ", STYLE_LABEL),
            Span::styled(format!("{:<6}", bpm_text), style_bold(COLOR_PULSE)),
            Span::styled("IBI ", STYLE_LABEL),
            Span::styled(format!("{:.0} ms", self.view.ibi_display()), STYLE_MUTED),
            Span::styled(
                format!("   window {:.0}s", self.view.window_secs()),
                STYLE_MUTED,
            ),
        ])
    }
}

impl Widget for PlotWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Percentage(60),
            Constraint::Min(5),
        ])
        .split(area);

        Paragraph::new(self.readout_line()).render(chunks[0], buf);

        let heartbeat = self.view.heartbeat_series();
        render_chart(
            " Heartbeat ",
            &heartbeat,
            self.view.heartbeat_axis(),
            COLOR_PULSE,
            chunks[1],
            buf,
        );

        let raw = self.view.raw_series();
        render_chart(
            " Raw signal ",
            &raw,
            self.view.raw_axis(),
            COLOR_ACCENT,
            chunks[2],
            buf,
        );
    }
}

fn render_chart(
    title: &str,
    series: &Series,
    axis: XAxis,
    color: Color,
    area: Rect,
    buf: &mut Buffer,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(STYLE_BORDER)
        .title(Span::styled(title.to_string(), style_bold(color)));

    if series.is_empty() {
        Paragraph::new(Line::from(Span::styled("  Waiting for samples...", STYLE_MUTED)))
            .block(block)
            .render(area, buf);
        return;
    }

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::new().fg(color))
        .data(&series.points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds(series.x_bounds)
                .labels(x_labels(series, axis))
                .style(Style::new().fg(COLOR_DIM)),
        )
        .y_axis(
            Axis::default()
                .bounds(series.y_bounds)
                .labels(series.y_labels().to_vec())
                .style(Style::new().fg(COLOR_DIM)),
        );

    chart.render(area, buf);
}

fn x_labels(series: &Series, axis: XAxis) -> Vec<String> {
    let [lo, hi] = series.x_bounds;
    match axis {
        XAxis::CaptureTime => vec![format!("{:.1}s", lo), "0s".to_string()],
        XAxis::ArrivalOrder => vec![
            format!("{:.0}", lo),
            format!("{:.0}", (lo + hi) / 2.0),
            format!("{:.0}", hi),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(x_bounds: [f64; 2]) -> Series {
        Series {
            points: vec![(x_bounds[0], 1.0), (x_bounds[1], 2.0)],
            x_bounds,
            y_bounds: [0.0, 3.0],
        }
    }

    #[test]
    fn test_time_axis_labels() {
        let labels = x_labels(&series([-7.96, 0.0]), XAxis::CaptureTime);
        assert_eq!(labels, vec!["-8.0s", "0s"]);
    }

    #[test]
    fn test_index_axis_labels() {
        let labels = x_labels(&series([0.0, 200.0]), XAxis::ArrivalOrder);
        assert_eq!(labels, vec!["0", "100", "200"]);
    }
}
