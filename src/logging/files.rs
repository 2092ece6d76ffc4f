//! Log file browsing
//!
//! Lists the files in the log directory and reads one for display.

use crate::error::{DashError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// A file in the log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Files in `dir`, newest first. A missing directory yields an empty list.
pub fn list_log_files(dir: &Path) -> Result<Vec<LogFileInfo>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(DashError::Io {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut files: Vec<LogFileInfo> = read_dir
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(LogFileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            })
        })
        .collect();

    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

/// Read a log file as text (lossy for non-UTF-8 content)
pub fn read_log_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DashError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
