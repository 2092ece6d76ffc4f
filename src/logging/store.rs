//! Log storage with filtering, scrolling, and export
//!
//! Pure data structure for managing log entries with no I/O side effects.

use super::{FilterMode, LogEntry, LogFilter, LogLevel};
use crate::constants::AUTO_SCROLL_THRESHOLD;
use std::collections::VecDeque;

/// Log storage with filtering, scrolling, and text export.
///
/// Uses a ring buffer (`VecDeque`) with configurable maximum capacity.
///
/// # Features
///
/// - **Automatic rotation**: Old entries are dropped when capacity is reached
/// - **Filtering**: By log type (Sensor/App/System) with cached count
/// - **Scrolling**: Manual scroll with auto-scroll to bottom on new entries
/// - **Pause**: Freeze scroll position while still receiving logs
/// - **Export**: Format filtered logs as plain text
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    scroll: usize,
    auto_scroll: bool,
    filter: LogFilter,
    filter_mode: FilterMode,
    /// Cached count of filtered entries (O(1) access)
    filtered_cache: usize,
    paused: bool,
}

impl LogStore {
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            scroll: 0,
            auto_scroll: true,
            filter: LogFilter::default(),
            filter_mode: FilterMode::All,
            filtered_cache: 0,
            paused: false,
        }
    }

    // === Log addition ===

    /// Add a log entry, rotating out old entries if at capacity
    pub fn add(&mut self, entry: LogEntry) {
        let entry_matches_filter = self.filter.matches(&entry);

        if self.entries.len() >= self.max_entries {
            if let Some(removed) = self.entries.pop_front() {
                if self.filter.matches(&removed) {
                    self.filtered_cache = self.filtered_cache.saturating_sub(1);
                    // When paused, keep the visible lines in place
                    if self.paused && self.scroll > 0 {
                        self.scroll -= 1;
                    }
                }
            }
        }
        self.entries.push_back(entry);

        if entry_matches_filter {
            self.filtered_cache += 1;
        }

        if self.auto_scroll && entry_matches_filter && !self.paused {
            self.scroll = self.filtered_cache.saturating_sub(1);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll = 0;
        self.filtered_cache = 0;
    }

    // === Scroll ===

    pub fn scroll_up(&mut self, lines: usize) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let last = self.filtered_count().saturating_sub(1);
        self.scroll = (self.scroll + lines).min(last);
        if self.scroll >= self.filtered_count().saturating_sub(AUTO_SCROLL_THRESHOLD) {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.filtered_count().saturating_sub(1);
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll
    }

    // === Pause ===

    /// Toggle pause state, returns new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if self.paused {
            self.auto_scroll = false;
        } else {
            self.scroll_to_bottom();
        }
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // === Filtering ===

    pub fn set_filter(&mut self, mode: FilterMode) {
        let (sensor, app, system) = match mode {
            FilterMode::Sensor => (true, false, false),
            FilterMode::App => (false, true, true),
            FilterMode::All => (true, true, true),
        };

        self.filter.show_sensor = sensor;
        self.filter.show_app = app;
        self.filter.show_system = system;
        self.filter.show_direction_in = true;
        self.filter.show_direction_out = true;

        self.filter_mode = mode;
        self.recalculate_filtered_cache();
        self.reset_scroll_for_filter();
    }

    /// Cycle All -> Sensor -> App -> All
    pub fn cycle_filter(&mut self) -> FilterMode {
        let next = match self.filter_mode {
            FilterMode::All => FilterMode::Sensor,
            FilterMode::Sensor => FilterMode::App,
            FilterMode::App => FilterMode::All,
        };
        self.set_filter(next);
        next
    }

    pub fn set_min_level(&mut self, level: Option<LogLevel>) {
        self.filter.min_level = level;
        self.recalculate_filtered_cache();
        self.reset_scroll_for_filter();
    }

    fn reset_scroll_for_filter(&mut self) {
        self.scroll = self.filtered_count().saturating_sub(1);
        self.auto_scroll = true;
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    // === Data access ===

    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    /// Entries passing the current filter, oldest first
    pub fn filtered(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| self.filter.matches(e))
    }

    /// Count of entries matching current filter (O(1))
    pub fn filtered_count(&self) -> usize {
        self.filtered_cache
    }

    fn recalculate_filtered_cache(&mut self) {
        self.filtered_cache = self
            .entries
            .iter()
            .filter(|e| self.filter.matches(e))
            .count();
    }

    // === Export (pure methods) ===

    /// Format all filtered logs as text
    pub fn to_text(&self) -> String {
        self.filtered()
            .map(LogEntry::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format filtered logs as text, limited to max entries (most recent)
    pub fn to_text_limited(&self, max: usize) -> String {
        let skip = self.filtered_count().saturating_sub(max);
        self.filtered()
            .skip(skip)
            .map(LogEntry::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogKind;

    #[test]
    fn test_add_rotates_when_full() {
        let mut store = LogStore::new(3);
        for msg in ["1", "2", "3", "4"] {
            store.add(LogEntry::system(msg));
        }
        assert_eq!(store.entries().len(), 3);

        let LogKind::System { message } = &store.entries()[0].kind else {
            panic!("Expected System log");
        };
        assert_eq!(message, "2");
    }

    #[test]
    fn test_filter_modes() {
        let mut store = LogStore::new(10);
        store.add(LogEntry::system("sys"));
        store.add(LogEntry::sensor_in("sensor_status", "0.6.5"));
        store.add(LogEntry::info("checked for updates"));

        store.set_filter(FilterMode::Sensor);
        assert_eq!(store.filtered_count(), 1);

        store.set_filter(FilterMode::App);
        assert_eq!(store.filtered_count(), 2);

        store.set_filter(FilterMode::All);
        assert_eq!(store.filtered_count(), 3);
    }

    #[test]
    fn test_cycle_filter() {
        let mut store = LogStore::new(10);
        assert_eq!(store.cycle_filter(), FilterMode::Sensor);
        assert_eq!(store.cycle_filter(), FilterMode::App);
        assert_eq!(store.cycle_filter(), FilterMode::All);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut store = LogStore::new(10);
        store.add(LogEntry::system("1"));
        store.add(LogEntry::system("2"));
        assert_eq!(store.scroll_position(), 1);

        store.scroll_up(5);
        assert_eq!(store.scroll_position(), 0);
        store.scroll_down(1);
        assert_eq!(store.scroll_position(), 1);
        store.scroll_down(10);
        assert_eq!(store.scroll_position(), 1);
    }

    #[test]
    fn test_to_text_limited() {
        let mut store = LogStore::new(10);
        for msg in ["1", "2", "3"] {
            store.add(LogEntry::system(msg));
        }

        let text = store.to_text_limited(2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[SYS] 2"));
        assert!(lines[1].ends_with("[SYS] 3"));
    }

    #[test]
    fn test_pause_freezes_scroll() {
        let mut store = LogStore::new(10);
        store.add(LogEntry::system("1"));
        assert!(store.toggle_pause());
        let frozen = store.scroll_position();
        store.add(LogEntry::system("2"));
        assert_eq!(store.scroll_position(), frozen);

        assert!(!store.toggle_pause());
        assert_eq!(store.scroll_position(), 1);
    }

    #[test]
    fn test_filtered_cache_rotation() {
        let mut store = LogStore::new(3);
        for msg in ["1", "2", "3", "4"] {
            store.add(LogEntry::system(msg));
        }
        assert_eq!(store.filtered_count(), 3);

        store.clear();
        assert_eq!(store.filtered_count(), 0);
        assert_eq!(store.scroll_position(), 0);
    }
}
