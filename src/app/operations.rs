//! Log operations - clipboard and file export

use crate::logging::LogStore;
use crate::platform;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Clipboard
// =============================================================================

/// Result of a clipboard operation
pub enum ClipboardResult {
    Success(usize),
    Error(String),
}

/// Copy filtered logs to clipboard
pub fn copy_logs(logs: &LogStore) -> ClipboardResult {
    copy_text(&logs.to_text(), logs.filtered_count())
}

/// Copy arbitrary text (e.g. a log file) to clipboard
pub fn copy_text(text: &str, line_count: usize) -> ClipboardResult {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(text) {
            Ok(()) => ClipboardResult::Success(line_count),
            Err(e) => ClipboardResult::Error(format!("Clipboard error: {}", e)),
        },
        Err(e) => ClipboardResult::Error(format!("Clipboard error: {}", e)),
    }
}

// =============================================================================
// File Export
// =============================================================================

/// Result of an export operation
pub enum ExportResult {
    Success {
        path: PathBuf,
        line_count: usize,
        opened: bool,
    },
    Error(String),
}

/// Export logs to a timestamped file in `dir` and open it
pub fn export_logs(logs: &LogStore, max_export: usize, dir: &Path) -> ExportResult {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("pulse-dash-log-{}.txt", timestamp));

    let text = logs.to_text_limited(max_export);
    let line_count = text.lines().count();

    if let Err(e) = fs::create_dir_all(dir).and_then(|_| fs::write(&path, &text)) {
        return ExportResult::Error(format!("Export failed: {}", e));
    }
    let opened = platform::open_file(&path).is_ok();
    ExportResult::Success {
        path,
        line_count,
        opened,
    }
}
