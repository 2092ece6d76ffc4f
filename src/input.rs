//! Input event handling
//!
//! Translates keyboard events into app commands.

use crate::app::Tab;
use crate::logging::{FilterMode, LogLevel};
use crossterm::event::{KeyCode, KeyEvent};

/// Command to execute on the App
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Quit,

    // Navigation
    NextTab,
    PrevTab,
    SelectTab(Tab),
    OpenSettings,

    // Sensor
    RestartSensor,
    FirmwareUpdate,
    ToggleDummyData,

    // Updates
    CheckUpdates,
    DownloadAppUpdate,

    // Scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,

    // Filtering
    CycleFilter,
    FilterLevel(Option<LogLevel>),

    // Log actions
    TogglePause,
    CopyLogs,
    CutLogs,
    ClearLogs,
    ExportLogs,
    OpenLogBrowser,
    OpenConfig,

    None,
}

/// Translate a key press into an AppCommand
pub fn translate_key(key: KeyEvent, tab: Tab, filter_mode: FilterMode) -> AppCommand {
    // Global keys
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return AppCommand::Quit,
        KeyCode::Tab => return AppCommand::NextTab,
        KeyCode::BackTab => return AppCommand::PrevTab,
        KeyCode::Char('1') => return AppCommand::SelectTab(Tab::Status),
        KeyCode::Char('2') => return AppCommand::SelectTab(Tab::Plot),
        KeyCode::Char('3') => return AppCommand::SelectTab(Tab::Logs),
        KeyCode::Char('s') | KeyCode::Char('S') => return AppCommand::OpenSettings,
        KeyCode::Char('r') | KeyCode::Char('R') => return AppCommand::RestartSensor,
        KeyCode::Char('d') | KeyCode::Char('D') => return AppCommand::ToggleDummyData,
        KeyCode::Char('f') | KeyCode::Char('F') => return AppCommand::OpenConfig,
        _ => {}
    }

    match tab {
        Tab::Status => match key.code {
            KeyCode::Char('u') | KeyCode::Char('U') => AppCommand::FirmwareUpdate,
            KeyCode::Char('n') | KeyCode::Char('N') => AppCommand::CheckUpdates,
            KeyCode::Char('g') | KeyCode::Char('G') => AppCommand::DownloadAppUpdate,
            _ => AppCommand::None,
        },
        Tab::Plot => AppCommand::None,
        Tab::Logs => translate_log_key(key, filter_mode),
    }
}

fn translate_log_key(key: KeyEvent, filter_mode: FilterMode) -> AppCommand {
    match key.code {
        // Scrolling
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => AppCommand::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => AppCommand::ScrollDown,
        KeyCode::PageUp => AppCommand::ScrollPageUp,
        KeyCode::PageDown => AppCommand::ScrollPageDown,
        KeyCode::Home => AppCommand::ScrollToTop,
        KeyCode::End => AppCommand::ScrollToBottom,

        KeyCode::Char('v') | KeyCode::Char('V') => AppCommand::CycleFilter,

        // Clipboard operations
        KeyCode::Char('c') | KeyCode::Char('C') => AppCommand::CopyLogs,
        KeyCode::Char('x') | KeyCode::Char('X') => AppCommand::CutLogs,
        KeyCode::Backspace => AppCommand::ClearLogs,

        KeyCode::Char('p') | KeyCode::Char('P') => AppCommand::TogglePause,
        KeyCode::Char('e') | KeyCode::Char('E') => AppCommand::ExportLogs,
        KeyCode::Char('l') | KeyCode::Char('L') => AppCommand::OpenLogBrowser,

        // Level filters (only in App mode)
        KeyCode::Char('i') if filter_mode == FilterMode::App => {
            AppCommand::FilterLevel(Some(LogLevel::Info))
        }
        KeyCode::Char('w') if filter_mode == FilterMode::App => {
            AppCommand::FilterLevel(Some(LogLevel::Warn))
        }
        KeyCode::Char('a') if filter_mode == FilterMode::App => AppCommand::FilterLevel(None),

        _ => AppCommand::None,
    }
}
