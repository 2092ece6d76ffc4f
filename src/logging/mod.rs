//! Unified logging system
//!
//! Centralizes all log-related types and utilities:
//! - `LogEntry` - Individual log entries (sensor, app, system)
//! - `LogStore` - In-memory log storage with filtering
//! - `file` - Rotating log file written from a dedicated thread
//! - `files` - Log directory listing for the log browser

pub mod entry;
pub mod file;
pub mod files;
pub mod filter;
pub mod store;

pub use entry::{Direction, LogEntry, LogKind, LogLevel};
pub use file::{spawn_file_logger, FileLogger, FileLoggerConfig, RotatingFile};
pub use files::{list_log_files, read_log_file, LogFileInfo};
pub use filter::{FilterMode, LogFilter};
pub use store::LogStore;

use crate::constants::{DEFAULT_LOG_FILE_MAX_BYTES, DEFAULT_LOG_FILE_MAX_FILES};
use std::path::Path;

/// Initialize internal tracing
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output. `RUST_LOG` overrides both.
/// With `trace_file`, output goes to that size-capped, rotating file instead of
/// stderr (the TUI owns the terminal).
pub fn init_tracing(verbose: bool, trace_file: Option<&Path>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Capped like the user log so it cannot grow without bound
    let file = trace_file.and_then(|path| {
        RotatingFile::open(path, DEFAULT_LOG_FILE_MAX_BYTES, DEFAULT_LOG_FILE_MAX_FILES).ok()
    });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file))
                        .compact(),
                )
                .with(filter)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .with(filter)
                .try_init();
        }
    }
}
