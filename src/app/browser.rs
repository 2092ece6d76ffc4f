//! Log file browser state
//!
//! Lists the log directory and shows one file at a time.

use crate::logging::{list_log_files, read_log_file, LogFileInfo};
use crossterm::event::KeyCode;
use std::path::{Path, PathBuf};

/// Action returned by handle_key for App to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    None,
    Close,
    /// Copy the open file to the clipboard
    Copy,
}

pub struct LogBrowser {
    dir: PathBuf,
    files: Vec<LogFileInfo>,
    selected: usize,
    /// Name and content of the open file
    open: Option<(String, String)>,
    scroll: usize,
    error: Option<String>,
}

impl LogBrowser {
    pub fn new(dir: PathBuf) -> Self {
        let mut browser = Self {
            dir,
            files: Vec::new(),
            selected: 0,
            open: None,
            scroll: 0,
            error: None,
        };
        browser.refresh();
        browser
    }

    /// Re-read the directory listing and the open file
    pub fn refresh(&mut self) {
        match list_log_files(&self.dir) {
            Ok(files) => {
                self.files = files;
                self.error = None;
            }
            Err(e) => {
                self.files.clear();
                self.error = Some(e.to_string());
            }
        }
        self.selected = self.selected.min(self.files.len().saturating_sub(1));

        if let Some((name, _)) = self.open.take() {
            let path = self.dir.join(&name);
            self.load(name, &path);
        }
    }

    fn load(&mut self, name: String, path: &Path) {
        match read_log_file(path) {
            Ok(content) => {
                self.open = Some((name, content));
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[LogFileInfo] {
        &self.files
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn open_file(&self) -> Option<(&str, &str)> {
        self.open
            .as_ref()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> BrowserAction {
        match key {
            KeyCode::Esc | KeyCode::Char('l') | KeyCode::Char('L') => {
                if self.open.take().is_some() {
                    self.scroll = 0;
                    BrowserAction::None
                } else {
                    BrowserAction::Close
                }
            }
            KeyCode::Backspace | KeyCode::Left => {
                self.open = None;
                self.scroll = 0;
                BrowserAction::None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh();
                BrowserAction::None
            }
            KeyCode::Char('c') | KeyCode::Char('C') if self.open.is_some() => BrowserAction::Copy,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.open.is_some() {
                    self.scroll = self.scroll.saturating_sub(1);
                } else {
                    self.selected = self.selected.saturating_sub(1);
                }
                BrowserAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some((_, content)) = &self.open {
                    let max = content.lines().count().saturating_sub(1);
                    self.scroll = (self.scroll + 1).min(max);
                } else if self.selected + 1 < self.files.len() {
                    self.selected += 1;
                }
                BrowserAction::None
            }
            KeyCode::Enter | KeyCode::Right if self.open.is_none() => {
                if let Some(info) = self.files.get(self.selected) {
                    let (name, path) = (info.name.clone(), info.path.clone());
                    self.scroll = 0;
                    self.load(name, &path);
                }
                BrowserAction::None
            }
            _ => BrowserAction::None,
        }
    }
}
