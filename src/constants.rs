//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Sensor network
// =============================================================================

/// Default UDP port the sensor streams samples to
pub const DEFAULT_STREAM_PORT: u16 = 34254;

/// Default UDP port the sensor listens on for commands
pub const DEFAULT_COMMAND_PORT: u16 = 34255;

/// Lowest port a user may configure (below are privileged/well-known)
pub const MIN_USER_PORT: u16 = 1024;

/// Silence after which the sensor is considered disconnected (seconds)
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 3;

// =============================================================================
// Plot
// =============================================================================

/// Device sampling rate used for display durations (Hz)
pub const DEFAULT_SAMPLING_RATE_HZ: u32 = 25;

/// Samples kept per live chart
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Fraction of the value range added above and below a chart
pub const PLOT_Y_PADDING: f64 = 0.1;

// =============================================================================
// Updates
// =============================================================================

/// Latest firmware release of the sensor
pub const DEFAULT_FIRMWARE_RELEASE_URL: &str =
    "https://api.github.com/repos/krokosik/esp-pulser/releases/latest";

/// Latest release of this dashboard
pub const DEFAULT_APP_RELEASE_URL: &str =
    "https://api.github.com/repos/krokosik/esp-pulser-gui/releases/latest";

/// HTTP timeout for release lookups (seconds)
pub const RELEASE_CHECK_TIMEOUT_SECS: u64 = 5;

/// Running application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timing
// =============================================================================

/// Delay for the stream socket to be released before rebinding (milliseconds)
pub const SOCKET_RELEASE_DELAY_MS: u64 = 150;

/// Status message display timeout (seconds)
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;

/// Minimum interval between rate updates (seconds)
pub const RATE_UPDATE_MIN_INTERVAL_SECS: f64 = 0.1;

/// Receive timeout used to poll the shutdown flag (milliseconds)
pub const RECV_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Retry
// =============================================================================

/// Maximum socket bind retry attempts
pub const MAX_SOCKET_RETRY_ATTEMPTS: u32 = 5;

/// Base delay between retry attempts (milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 200;

// =============================================================================
// UI
// =============================================================================

/// Frame duration for TUI loop (milliseconds)
pub const FRAME_DURATION_MS: u64 = 16;

/// Number of lines to scroll per page (PageUp/PageDown)
pub const PAGE_SCROLL_LINES: usize = 10;

/// Auto-scroll threshold (lines from bottom)
pub const AUTO_SCROLL_THRESHOLD: usize = 5;

/// Width threshold for wide/narrow layout switch
pub const WIDE_THRESHOLD: u16 = 100;

/// Width of filter sidebar in wide mode
pub const SIDEBAR_WIDTH: u16 = 16;

// =============================================================================
// Buffers
// =============================================================================

/// UDP receive buffer size
pub const UDP_BUFFER_SIZE: usize = 512;

/// Channel capacity for async message passing
pub const CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Logs
// =============================================================================

/// Base name of the rotating log file
pub const LOG_FILE_NAME: &str = "pulse-dash.log";

/// Diagnostics file used by tracing while the TUI owns the terminal
pub const TRACE_FILE_NAME: &str = "pulse-dash-trace.log";

/// Rotate the log file once it grows past this size (bytes)
pub const DEFAULT_LOG_FILE_MAX_BYTES: u64 = 50_000;

/// Rotated log files kept beside the active one
pub const DEFAULT_LOG_FILE_MAX_FILES: usize = 5;
