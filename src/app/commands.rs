//! Command execution
//!
//! Translates AppCommand into method calls on App.

use super::App;
use crate::constants::PAGE_SCROLL_LINES;
use crate::input::AppCommand;
use crate::logging::LogLevel;

impl App {
    /// Execute an application command. Returns true if app should quit.
    pub fn execute_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Quit => {
                self.quit();
                return true;
            }
            AppCommand::NextTab => self.select_tab(self.tab().next()),
            AppCommand::PrevTab => self.select_tab(self.tab().prev()),
            AppCommand::SelectTab(tab) => self.select_tab(tab),
            AppCommand::OpenSettings => self.open_settings(),
            AppCommand::RestartSensor => self.restart_sensor(),
            AppCommand::FirmwareUpdate => self.firmware_update(),
            AppCommand::ToggleDummyData => self.toggle_dummy_data(),
            AppCommand::CheckUpdates => self.check_updates(),
            AppCommand::DownloadAppUpdate => self.download_app_update(),
            AppCommand::ScrollUp => self.logs.scroll_up(1),
            AppCommand::ScrollDown => self.logs.scroll_down(1),
            AppCommand::ScrollPageUp => self.logs.scroll_up(PAGE_SCROLL_LINES),
            AppCommand::ScrollPageDown => self.logs.scroll_down(PAGE_SCROLL_LINES),
            AppCommand::ScrollToTop => self.logs.scroll_to_top(),
            AppCommand::ScrollToBottom => self.logs.scroll_to_bottom(),
            AppCommand::CycleFilter => {
                let mode = self.logs.cycle_filter();
                self.set_status(format!("Filter: {}", mode.label()));
            }
            AppCommand::FilterLevel(level) => {
                self.logs.set_min_level(level);
                self.set_status(level_status(level));
            }
            AppCommand::TogglePause => self.toggle_pause(),
            AppCommand::CopyLogs => self.copy_logs(),
            AppCommand::CutLogs => self.cut_logs(),
            AppCommand::ClearLogs => self.clear_logs(),
            AppCommand::ExportLogs => self.export_logs(),
            AppCommand::OpenLogBrowser => self.open_log_browser(),
            AppCommand::OpenConfig => self.open_config(),
            AppCommand::None => {}
        }
        false
    }
}

/// Get status message for level filter
fn level_status(level: Option<LogLevel>) -> &'static str {
    match level {
        Some(LogLevel::Debug) => "App: DEBUG and above",
        Some(LogLevel::Info) => "App: INFO and above",
        Some(LogLevel::Warn) => "App: WARN and above",
        Some(LogLevel::Error) => "App: ERROR only",
        None => "App: All levels",
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_app;
    use crate::app::Tab;
    use crate::input::AppCommand;
    use crate::logging::FilterMode;

    #[test]
    fn test_tab_commands() {
        let (mut app, _, _) = test_app("");
        assert!(!app.execute_command(AppCommand::NextTab));
        assert_eq!(app.tab(), Tab::Plot);
        app.execute_command(AppCommand::PrevTab);
        assert_eq!(app.tab(), Tab::Status);
        app.execute_command(AppCommand::SelectTab(Tab::Logs));
        assert_eq!(app.tab(), Tab::Logs);
    }

    #[test]
    fn test_filter_commands() {
        let (mut app, _, _) = test_app("");
        app.execute_command(AppCommand::CycleFilter);
        assert_eq!(app.filter_mode(), FilterMode::Sensor);
        assert_eq!(app.state().status_message, Some("Filter: Sensor"));
    }

    #[test]
    fn test_quit_command() {
        let (mut app, _, _) = test_app("");
        assert!(app.execute_command(AppCommand::Quit));
        assert!(app.should_quit());
    }
}
