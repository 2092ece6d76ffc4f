//! Traffic statistics for the sensor link
//!
//! Thread-safe counters for the networking view.
//! Uses lock-free atomics for all operations.

use crate::constants::RATE_UPDATE_MIN_INTERVAL_SECS;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Link counters with a packet rate calculation (fully lock-free)
pub struct LinkStats {
    /// Datagrams received from the sensor
    rx_packets: AtomicU64,
    /// Bytes received from the sensor
    rx_bytes: AtomicU64,
    /// Datagrams that failed to decode
    decode_errors: AtomicU64,
    /// Bytes of commands sent to the sensor
    tx_bytes: AtomicU64,
    /// Snapshot of rx_packets at last rate calculation
    rx_snapshot: AtomicU64,
    /// Reference instant for time calculations
    start_time: Instant,
    /// Nanoseconds since start_time at last rate calculation
    last_calc_nanos: AtomicU64,
    /// Cached packet rate in packets/sec (stored as f64 bits)
    rx_rate: AtomicU64,
}

impl LinkStats {
    pub fn new() -> Self {
        Self {
            rx_packets: AtomicU64::new(0),
            rx_bytes: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            tx_bytes: AtomicU64::new(0),
            rx_snapshot: AtomicU64::new(0),
            start_time: Instant::now(),
            last_calc_nanos: AtomicU64::new(0),
            rx_rate: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn add_rx(&self, bytes: usize) {
        self.rx_packets.fetch_add(1, Ordering::Relaxed);
        self.rx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_tx(&self, bytes: usize) {
        self.tx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn rx_packets(&self) -> u64 {
        self.rx_packets.load(Ordering::Relaxed)
    }

    pub fn rx_bytes(&self) -> u64 {
        self.rx_bytes.load(Ordering::Relaxed)
    }

    pub fn decode_errors(&self) -> u64 {
        self.decode_errors.load(Ordering::Relaxed)
    }

    pub fn tx_bytes(&self) -> u64 {
        self.tx_bytes.load(Ordering::Relaxed)
    }

    /// Update the rate calculation and return packets/sec.
    /// Call this periodically from the UI thread.
    pub fn update_rate(&self) -> f64 {
        let now_nanos = self.start_time.elapsed().as_nanos() as u64;
        let last_nanos = self.last_calc_nanos.load(Ordering::Relaxed);
        let elapsed = now_nanos.saturating_sub(last_nanos) as f64 / 1_000_000_000.0;

        if elapsed < RATE_UPDATE_MIN_INTERVAL_SECS {
            return f64::from_bits(self.rx_rate.load(Ordering::Relaxed));
        }

        // Try to claim the update (avoid duplicate calculations)
        if self
            .last_calc_nanos
            .compare_exchange(last_nanos, now_nanos, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            return f64::from_bits(self.rx_rate.load(Ordering::Relaxed));
        }

        let rx_now = self.rx_packets.load(Ordering::Relaxed);
        let rx_prev = self.rx_snapshot.swap(rx_now, Ordering::Relaxed);
        let rate = rx_now.saturating_sub(rx_prev) as f64 / elapsed;

        self.rx_rate.store(rate.to_bits(), Ordering::Relaxed);
        rate
    }
}

impl Default for LinkStats {
    fn default() -> Self {
        Self::new()
    }
}
