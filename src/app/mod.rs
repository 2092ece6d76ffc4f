//! Application state and orchestration
//!
//! Single source of truth for application state. Background tasks (sensor
//! link, dummy source, release lookups, downloads) only talk to the app
//! through channels; everything is applied in `poll()` on the UI task.

mod browser;
mod commands;
mod logs;
mod operations;
mod popup;
mod sensor;
mod settings;
pub mod state;
mod updates;
pub mod views;

pub use browser::{BrowserAction, LogBrowser};
pub use settings::{SettingsAction, SettingsField, SettingsPopup};
pub use state::{AppState, LinkState, Tab};
pub use views::PlotView;

use crate::config::{self, Config};
use crate::constants::{APP_VERSION, CHANNEL_CAPACITY, LOG_FILE_NAME, STATUS_MESSAGE_TIMEOUT_SECS};
use crate::error::Result;
use crate::events::{EventBus, EventKind, SensorEvent, Subscription};
use crate::input;
use crate::logging::{
    spawn_file_logger, FileLogger, FileLoggerConfig, FilterMode, LogEntry, LogFilter, LogStore,
};
use crate::sensor::{CommandSink, DummySource, LinkHandle, LinkStats, UdpCommandSink};
use crate::store::{AppStore, SensorStatus};
use crate::updates::{DownloadEvent, DownloadProgress, Release, UpdateMessage};
use crossterm::event::KeyEvent;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Filesystem locations the app writes to. `None` disables that feature.
#[derive(Debug, Clone, Default)]
pub struct AppPaths {
    pub config: Option<PathBuf>,
    pub logs: Option<PathBuf>,
    pub downloads: Option<PathBuf>,
}

impl AppPaths {
    /// Locations next to the executable (or the project root in dev builds)
    pub fn discover() -> Self {
        Self {
            config: config::config_path().ok(),
            logs: config::log_dir().ok(),
            downloads: config::download_dir().ok(),
        }
    }
}

/// Main application
pub struct App {
    // Config
    pub(super) config: Config,
    pub(super) paths: AppPaths,

    // State
    pub(super) store: AppStore,
    pub(super) logs: LogStore,
    file_logger: Option<FileLogger>,

    // Sensor plumbing
    pub(super) bus: EventBus,
    pub(super) stats: Arc<LinkStats>,
    pub(super) sink: Box<dyn CommandSink>,
    pub(super) link: Option<LinkHandle>,
    /// True once the link should be listening (rebinds follow port edits)
    pub(super) networking: bool,
    pub(super) dummy: Option<DummySource>,
    connection_sub: Subscription,
    status_sub: Subscription,

    // Background results
    pub(super) update_tx: mpsc::Sender<UpdateMessage>,
    update_rx: mpsc::Receiver<UpdateMessage>,
    pub(super) download_tx: mpsc::Sender<DownloadEvent>,
    download_rx: mpsc::Receiver<DownloadEvent>,
    pub(super) download: DownloadProgress,
    pub(super) app_release: Option<Release>,

    // UI state
    tab: Tab,
    plot: Option<PlotView>,
    pub(super) browser: Option<LogBrowser>,
    pub(super) settings: Option<SettingsPopup>,
    pub(super) custom_update_url: String,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    /// Full application: UDP command sink, sensor link, optional dummy data
    /// and the startup release check. Must be called within a tokio runtime.
    pub fn start(config: Config, dummy: bool) -> Result<Self> {
        let stats = Arc::new(LinkStats::new());
        let sink = UdpCommandSink::spawn(config.sensor.command_addr(), stats.clone())?;

        let mut app = Self::with_sink(
            config,
            AppPaths::discover(),
            EventBus::new(),
            stats,
            Box::new(sink),
        );

        app.listen();
        if dummy {
            app.toggle_dummy_data();
        }
        if app.config.updates.check_on_startup {
            app.check_updates();
        }
        Ok(app)
    }

    /// App around an existing bus and sink, with no network listener
    pub fn with_sink(
        config: Config,
        paths: AppPaths,
        bus: EventBus,
        stats: Arc<LinkStats>,
        sink: Box<dyn CommandSink>,
    ) -> Self {
        let mut logs = LogStore::new(config.logs.max_entries);
        logs.set_filter(FilterMode::from_config(&config.ui.default_filter));

        let file_logger = paths.logs.as_ref().and_then(|dir| {
            let cfg = FileLoggerConfig {
                path: dir.join(LOG_FILE_NAME),
                max_bytes: config.logs.file_max_bytes,
                max_files: config.logs.file_max_files,
                flush_interval: Duration::from_millis(250),
                channel_capacity: CHANNEL_CAPACITY,
            };
            match spawn_file_logger(cfg) {
                Ok(logger) => Some(logger),
                Err(e) => {
                    warn!("File logging disabled: {}", e);
                    None
                }
            }
        });

        let (update_tx, update_rx) = mpsc::channel(8);
        let (download_tx, download_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut app = Self {
            store: AppStore::from_config(APP_VERSION, &config),
            connection_sub: bus.subscribe(EventKind::Connection),
            status_sub: bus.subscribe(EventKind::Status),
            config,
            paths,
            logs,
            file_logger,
            bus,
            stats,
            sink,
            link: None,
            networking: false,
            dummy: None,
            update_tx,
            update_rx,
            download_tx,
            download_rx,
            download: DownloadProgress::new(),
            app_release: None,
            tab: Tab::Status,
            plot: None,
            browser: None,
            settings: None,
            custom_update_url: String::new(),
            status_message: None,
            should_quit: false,
        };

        app.log_welcome_message();
        app
    }

    fn log_welcome_message(&mut self) {
        self.log(LogEntry::system(format!("Pulse Dash v{} ready", APP_VERSION)));
        match self.command_target() {
            Some(addr) => self.log(LogEntry::system(format!("Sensor commands go to {}", addr))),
            None => self.log(LogEntry::system("No sensor IP configured")),
        }
    }

    // =========================================================================
    // State access
    // =========================================================================

    pub fn state(&self) -> AppState<'_> {
        AppState {
            tab: self.tab,
            store: &self.store,
            link: match &self.link {
                Some(link) => LinkState::Listening { port: link.port() },
                None => LinkState::Down,
            },
            command_target: self.command_target(),
            packet_rate: self.stats.update_rate(),
            rx_packets: self.stats.rx_packets(),
            decode_errors: self.stats.decode_errors(),
            download: &self.download,
            app_release: self.app_release.as_ref(),
            custom_update_url: &self.custom_update_url,
            paused: self.logs.is_paused(),
            status_message: self.status_text(),
        }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn plot(&self) -> Option<&PlotView> {
        self.plot.as_ref()
    }

    pub fn settings(&self) -> Option<&SettingsPopup> {
        self.settings.as_ref()
    }

    pub fn browser(&self) -> Option<&LogBrowser> {
        self.browser.as_ref()
    }

    /// Port of the owned sensor link, if one is listening
    pub fn link_port(&self) -> Option<u16> {
        self.link.as_ref().map(|link| link.port())
    }

    /// Address sensor commands are sent to
    pub fn command_target(&self) -> Option<SocketAddr> {
        self.store
            .sensor_ip()
            .map(|ip| SocketAddr::from((ip, self.config.sensor.command_port)))
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Apply everything background tasks reported since the last call
    pub fn poll(&mut self) {
        // Connection changes first: a status that arrived before a
        // disconnect must not survive it
        for event in self.connection_sub.drain() {
            if let SensorEvent::Connection(connected) = event {
                self.on_connection(connected);
            }
        }
        // The owned link has the final say; queued events may come from a
        // listener that was replaced or reset since
        if let Some(connected) = self.link.as_ref().map(|link| link.is_connected()) {
            self.on_connection(connected);
        }
        for event in self.status_sub.drain() {
            if let SensorEvent::Status(status) = event {
                self.on_status(status);
            }
        }

        while let Ok(message) = self.update_rx.try_recv() {
            self.on_update_message(message);
        }
        while let Ok(event) = self.download_rx.try_recv() {
            self.on_download_event(event);
        }

        if let Some(plot) = &mut self.plot {
            plot.poll();
        }
    }

    fn on_connection(&mut self, connected: bool) {
        if connected == self.store.connected() {
            return;
        }
        self.store.set_connected(connected);
        let detail = if connected { "connected" } else { "disconnected" };
        info!("Sensor {}", detail);
        self.log(LogEntry::sensor_in(EventKind::Connection.name(), detail));
    }

    fn on_status(&mut self, status: SensorStatus) {
        // Late snapshot from before an OTA restart or a timeout
        if !self.store.connected() {
            return;
        }
        if self.store.sensor_status() != Some(&status) {
            self.log(LogEntry::sensor_in(
                EventKind::Status.name(),
                format!(
                    "fw v{} sensor:{} display:{} motor:{}",
                    status.version,
                    ok_label(status.sensor_ok),
                    ok_label(status.display_ok),
                    ok_label(status.motor_ok),
                ),
            ));
        }
        self.store.set_sensor_status(status);
    }

    // =========================================================================
    // Logging and status message
    // =========================================================================

    /// Add an entry to the log view and the log file
    pub(super) fn log(&mut self, entry: LogEntry) {
        if let Some(file) = &self.file_logger {
            file.log(entry.clone());
        }
        self.logs.add(entry);
    }

    pub(super) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    fn status_text(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, t)| t.elapsed().as_secs() < STATUS_MESSAGE_TIMEOUT_SECS)
            .map(|(s, _)| s.as_str())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch tabs. The plot view only exists while its tab is shown.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        self.tab = tab;
        self.plot = match tab {
            Tab::Plot => Some(PlotView::mount(&self.bus, &self.config.plot)),
            _ => None,
        };
        if tab != Tab::Logs {
            self.browser = None;
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn quit(&mut self) {
        self.plot = None;
        self.dummy = None;
        if let Some(link) = self.link.take() {
            link.stop();
        }
        self.log(LogEntry::system("Shutting down"));
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // =========================================================================
    // Log access
    // =========================================================================

    pub fn logs(&self) -> &VecDeque<LogEntry> {
        self.logs.entries()
    }

    pub fn log_store(&self) -> &LogStore {
        &self.logs
    }

    pub fn filter(&self) -> &LogFilter {
        self.logs.filter()
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.logs.filter_mode()
    }

    pub fn scroll_position(&self) -> usize {
        self.logs.scroll_position()
    }

    // =========================================================================
    // Input handling
    // =========================================================================

    /// Handle keyboard input. Returns true if app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Route to popup if open
        if let Some(popup) = self.settings.as_mut() {
            match popup.handle_key(key.code) {
                SettingsAction::Close => self.close_settings(),
                SettingsAction::Submit { field, value } => self.submit_setting(field, &value),
                SettingsAction::None => {}
            }
            return false;
        }

        if let Some(browser) = self.browser.as_mut() {
            match browser.handle_key(key.code) {
                BrowserAction::Close => self.browser = None,
                BrowserAction::Copy => self.copy_open_log_file(),
                BrowserAction::None => {}
            }
            return false;
        }

        let cmd = input::translate_key(key, self.tab, self.filter_mode());
        self.execute_command(cmd)
    }

    /// Handle mouse scroll
    pub fn handle_scroll(&mut self, up: bool) {
        if self.tab != Tab::Logs {
            return;
        }
        if up {
            self.logs.scroll_up(1);
        } else {
            self.logs.scroll_down(1);
        }
    }
}

fn ok_label(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DashError;
    use crate::sensor::SensorCommand;
    use crate::version::FirmwareVersion;
    use crossterm::event::{KeyCode, KeyModifiers};
    use parking_lot::Mutex;

    /// Sink recording every command
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub sent: Arc<Mutex<Vec<SensorCommand>>>,
        pub target: Arc<Mutex<Option<SocketAddr>>>,
    }

    impl CommandSink for RecordingSink {
        fn send(&self, command: SensorCommand) -> Result<()> {
            if self.target.lock().is_none() {
                return Err(DashError::NoSensorAddress);
            }
            self.sent.lock().push(command);
            Ok(())
        }

        fn retarget(&self, target: Option<SocketAddr>) {
            *self.target.lock() = target;
        }
    }

    pub(crate) fn test_app(ip: &str) -> (App, EventBus, RecordingSink) {
        let mut config = Config::default();
        config.sensor.ip = ip.to_string();
        let bus = EventBus::new();
        let sink = RecordingSink::default();
        *sink.target.lock() = config.sensor.command_addr();
        let app = App::with_sink(
            config,
            AppPaths::default(),
            bus.clone(),
            Arc::new(LinkStats::new()),
            Box::new(sink.clone()),
        );
        (app, bus, sink)
    }

    pub(crate) fn status(version: [u32; 3]) -> SensorStatus {
        SensorStatus {
            version: version.into(),
            sensor_ok: true,
            display_ok: true,
            motor_ok: true,
            motor_amplitude: 70,
            led_amplitude: 30,
            i2c_addresses: vec![0x36, 0x5A],
        }
    }

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_connection_and_status_flow() {
        let (mut app, bus, _) = test_app("192.168.4.1");
        bus.publish(SensorEvent::Connection(true));
        bus.publish(SensorEvent::Status(status([0, 6, 5])));
        app.poll();

        assert!(app.store().connected());
        assert_eq!(
            app.store().sensor_status().map(|s| s.version),
            Some(FirmwareVersion::new(0, 6, 5))
        );

        bus.publish(SensorEvent::Connection(false));
        app.poll();
        assert!(!app.store().connected());
        assert!(app.store().sensor_status().is_none());
    }

    #[test]
    fn test_status_before_disconnect_is_not_kept() {
        let (mut app, bus, _) = test_app("192.168.4.1");
        bus.publish(SensorEvent::Connection(true));
        bus.publish(SensorEvent::Status(status([0, 6, 5])));
        bus.publish(SensorEvent::Connection(false));
        app.poll();
        assert!(!app.store().connected());
        assert!(app.store().sensor_status().is_none());
    }

    #[test]
    fn test_plot_view_lives_with_its_tab() {
        let (mut app, bus, _) = test_app("");
        assert!(app.plot().is_none());
        assert_eq!(bus.subscriber_count(EventKind::HeartbeatSample), 0);

        app.select_tab(Tab::Plot);
        assert!(app.plot().is_some());
        assert_eq!(bus.subscriber_count(EventKind::HeartbeatSample), 1);

        bus.publish(SensorEvent::HeartbeatSample(crate::window::Sample::now(512.0)));
        app.poll();
        assert_eq!(app.plot().map(|p| p.heartbeat_len()), Some(1));

        app.select_tab(Tab::Logs);
        assert!(app.plot().is_none());
        assert_eq!(bus.subscriber_count(EventKind::HeartbeatSample), 0);
        // Device subscriptions outlive tab changes
        assert_eq!(bus.subscriber_count(EventKind::Connection), 1);
    }

    #[test]
    fn test_dropping_app_releases_subscriptions() {
        let (app, bus, _) = test_app("");
        assert_eq!(bus.subscriber_count(EventKind::Status), 1);
        drop(app);
        assert_eq!(bus.subscriber_count(EventKind::Status), 0);
        assert_eq!(bus.subscriber_count(EventKind::Connection), 0);
    }

    #[test]
    fn test_quit_key() {
        let (mut app, _, _) = test_app("");
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.should_quit());
    }

    #[test]
    fn test_popup_swallows_keys() {
        let (mut app, _, _) = test_app("");
        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.settings().is_some());
        // 'q' closes the popup, not the app
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.settings().is_none());
        assert!(!app.should_quit());
    }
}
