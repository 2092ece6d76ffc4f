//! OS integration

use crate::error::{DashError, Result};
use std::path::Path;
use std::process::Command;

/// Open a file with the system's default application
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    let (program, mut cmd) = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        ("cmd", cmd)
    };

    #[cfg(target_os = "macos")]
    let (program, mut cmd) = {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        ("open", cmd)
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let (program, mut cmd) = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        ("xdg-open", cmd)
    };

    cmd.spawn()
        .map(|_| ())
        .map_err(|e| DashError::OsCommand { program, source: e })
}
