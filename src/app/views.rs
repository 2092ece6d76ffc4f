//! Mounted views
//!
//! A view owns its sample windows and bus subscriptions. Mounting subscribes,
//! dropping the view releases everything it holds.

use crate::config::PlotConfig;
use crate::events::{EventBus, EventKind, SensorEvent, Subscription};
use crate::plot::{Series, XAxis};
use crate::window::RollingWindow;

/// Heartbeat plot: processed and raw charts plus BPM/IBI readouts
pub struct PlotView {
    heartbeat: RollingWindow,
    raw: RollingWindow,
    heartbeat_axis: XAxis,
    raw_axis: XAxis,
    sampling_rate_hz: u32,
    bpm: f64,
    ibi: f64,

    heartbeat_sub: Subscription,
    raw_sub: Subscription,
    bpm_sub: Subscription,
    ibi_sub: Subscription,
}

impl PlotView {
    pub fn mount(bus: &EventBus, config: &PlotConfig) -> Self {
        Self {
            heartbeat: RollingWindow::new(config.heartbeat_window),
            raw: RollingWindow::new(config.raw_window),
            heartbeat_axis: config.heartbeat_x_axis,
            raw_axis: config.raw_x_axis,
            sampling_rate_hz: config.sampling_rate_hz.max(1),
            bpm: 0.0,
            ibi: 0.0,
            heartbeat_sub: bus.subscribe(EventKind::HeartbeatSample),
            raw_sub: bus.subscribe(EventKind::RawSample),
            bpm_sub: bus.subscribe(EventKind::Bpm),
            ibi_sub: bus.subscribe(EventKind::Ibi),
        }
    }

    /// Move queued events into the windows. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        for event in self.heartbeat_sub.drain() {
            if let SensorEvent::HeartbeatSample(sample) = event {
                self.heartbeat.push(sample);
                changed = true;
            }
        }
        for event in self.raw_sub.drain() {
            if let SensorEvent::RawSample(sample) = event {
                self.raw.push(sample);
                changed = true;
            }
        }
        // Only the newest readout matters
        if let Some(SensorEvent::Bpm(bpm)) = self.bpm_sub.drain().pop() {
            self.bpm = bpm;
            changed = true;
        }
        if let Some(SensorEvent::Ibi(ibi)) = self.ibi_sub.drain().pop() {
            self.ibi = ibi;
            changed = true;
        }
        changed
    }

    pub fn heartbeat_series(&self) -> Series {
        Series::from_snapshot(&self.heartbeat.snapshot(), self.heartbeat_axis)
    }

    pub fn raw_series(&self) -> Series {
        Series::from_snapshot(&self.raw.snapshot(), self.raw_axis)
    }

    pub fn heartbeat_axis(&self) -> XAxis {
        self.heartbeat_axis
    }

    pub fn raw_axis(&self) -> XAxis {
        self.raw_axis
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// IBI readout; meaningless without a pulse, so shown as 0 then
    pub fn ibi_display(&self) -> f64 {
        if self.bpm > 0.0 {
            self.ibi
        } else {
            0.0
        }
    }

    /// Seconds of signal a full heartbeat window covers
    pub fn window_secs(&self) -> f64 {
        self.heartbeat.capacity() as f64 / f64::from(self.sampling_rate_hz)
    }

    pub fn heartbeat_len(&self) -> usize {
        self.heartbeat.len()
    }

    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }
}
