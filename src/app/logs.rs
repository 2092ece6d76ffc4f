//! Log operations
//!
//! Copy, cut, clear, export, and pause operations on the log store, plus the
//! log file browser.

use super::operations::{self, ClipboardResult, ExportResult};
use super::{App, LogBrowser};
use crate::config;

impl App {
    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        let paused = self.logs.toggle_pause();
        self.set_status(if paused { "Paused" } else { "Resumed" });
    }

    /// Copy filtered logs to clipboard
    pub fn copy_logs(&mut self) {
        match operations::copy_logs(&self.logs) {
            ClipboardResult::Success(n) => self.set_status(format!("Copied {} logs", n)),
            ClipboardResult::Error(e) => self.set_status(e),
        }
    }

    /// Clear all logs
    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.set_status("Logs cleared");
    }

    /// Copy logs to clipboard and clear
    pub fn cut_logs(&mut self) {
        match operations::copy_logs(&self.logs) {
            ClipboardResult::Success(n) => {
                self.logs.clear();
                self.set_status(format!("Cut {} logs", n));
            }
            ClipboardResult::Error(e) => self.set_status(e),
        }
    }

    /// Export logs to file and open
    pub fn export_logs(&mut self) {
        let Some(dir) = self.paths.logs.clone() else {
            self.set_status("No log directory");
            return;
        };
        match operations::export_logs(&self.logs, self.config.logs.export_max, &dir) {
            ExportResult::Success {
                path,
                line_count,
                opened,
            } => {
                if opened {
                    self.set_status(format!("Exported {} logs", line_count));
                } else {
                    self.set_status(format!("Exported to {}", path.display()));
                }
            }
            ExportResult::Error(e) => self.set_status(e),
        }
    }

    /// Open config file in default editor
    pub fn open_config(&mut self) {
        let Some(path) = self.paths.config.clone() else {
            self.set_status("No config file");
            return;
        };
        let result = config::open_in_editor(&path);
        match result {
            Ok(_) => self.set_status("Config opened"),
            Err(e) => self.set_status(format!("Cannot open: {}", e)),
        }
    }

    /// Show the log directory browser
    pub fn open_log_browser(&mut self) {
        match self.paths.logs.clone() {
            Some(dir) => self.browser = Some(LogBrowser::new(dir)),
            None => self.set_status("No log directory"),
        }
    }

    /// Copy the file open in the browser
    pub(super) fn copy_open_log_file(&mut self) {
        let Some((_, content)) = self.browser.as_ref().and_then(|b| b.open_file()) else {
            return;
        };
        let result = operations::copy_text(content, content.lines().count());
        match result {
            ClipboardResult::Success(n) => self.set_status(format!("Copied {} lines", n)),
            ClipboardResult::Error(e) => self.set_status(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_app;
    use crate::app::AppPaths;

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _, _) = test_app("");
        app.paths = AppPaths {
            logs: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        app.export_logs();

        let exported: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("pulse-dash-log-"))
            .collect();
        assert_eq!(exported.len(), 1);
        let text = std::fs::read_to_string(exported[0].path()).unwrap();
        assert!(text.contains("ready"));
    }

    #[test]
    fn test_browser_needs_log_dir() {
        let (mut app, _, _) = test_app("");
        app.open_log_browser();
        assert!(app.browser().is_none());

        let dir = tempfile::tempdir().unwrap();
        app.paths.logs = Some(dir.path().to_path_buf());
        app.open_log_browser();
        assert!(app.browser().is_some());
    }

    #[test]
    fn test_pause_and_clear() {
        let (mut app, _, _) = test_app("");
        app.toggle_pause();
        assert!(app.state().paused);
        app.clear_logs();
        assert!(app.logs().is_empty());
    }
}
