//! Terminal UI using ratatui
//!
//! Thin layer responsible only for terminal I/O. All business logic
//! is delegated to App via handle_key() and handle_scroll().

pub mod theme;
pub mod widgets;

use crate::app::{App, AppState, Tab};
use crate::constants::FRAME_DURATION_MS;
use crate::error::{DashError, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use widgets::{
    actions::ActionsWidget, browser::BrowserWidget, device::DeviceWidget, header::HeaderWidget,
    log::LogWidget, network::NetworkWidget, plot::PlotWidget, settings::SettingsWidget,
    updates::UpdatesWidget,
};

/// Map io::Error to DashError::Runtime
fn map_io_err(e: io::Error) -> DashError {
    DashError::Runtime { source: e }
}

/// Run the TUI event loop
pub async fn run(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode().map_err(map_io_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(map_io_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(map_io_err)?;

    // Main loop
    loop {
        // Apply sensor events and background results
        app.poll();

        // Draw UI
        terminal.draw(|f| draw(f, app)).map_err(map_io_err)?;

        // Handle input with timeout
        if event::poll(std::time::Duration::from_millis(FRAME_DURATION_MS)).map_err(map_io_err)? {
            match event::read().map_err(map_io_err)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_scroll(true),
                    MouseEventKind::ScrollDown => app.handle_scroll(false),
                    _ => {}
                },
                _ => {}
            }
        }

        if app.should_quit() {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode().map_err(map_io_err)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(map_io_err)?;
    terminal.show_cursor().map_err(map_io_err)?;

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(2), // Header + tabs
        Constraint::Min(5),    // Tab body
        Constraint::Length(3), // Actions widget
    ])
    .split(area);

    let state = app.state();

    frame.render_widget(HeaderWidget::new(&state), chunks[0]);

    match state.tab {
        Tab::Status => draw_status(frame, &state, chunks[1]),
        Tab::Plot => {
            if let Some(plot) = app.plot() {
                frame.render_widget(PlotWidget::new(plot), chunks[1]);
            }
        }
        Tab::Logs => match app.browser() {
            Some(browser) => frame.render_widget(BrowserWidget::new(browser), chunks[1]),
            None => {
                let log = LogWidget::new(
                    app.logs(),
                    app.filter(),
                    app.filter_mode(),
                    app.scroll_position(),
                    state.paused,
                );
                frame.render_widget(log, chunks[1]);
            }
        },
    }

    frame.render_widget(ActionsWidget::new(&state), chunks[2]);

    // Settings popup (rendered on top)
    if let Some(settings) = app.settings() {
        frame.render_widget(SettingsWidget::new(settings), area);
    }
}

/// Status tab: device and updates side by side when wide, stacked otherwise
fn draw_status(frame: &mut Frame, state: &AppState, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(7), Constraint::Min(5)]).split(area);

    let top = if area.width > 80 {
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0])
    } else {
        Layout::vertical([Constraint::Length(5), Constraint::Min(2)]).split(rows[0])
    };

    frame.render_widget(DeviceWidget::new(state), top[0]);
    frame.render_widget(UpdatesWidget::new(state), top[1]);
    frame.render_widget(NetworkWidget::new(state), rows[1]);
}
