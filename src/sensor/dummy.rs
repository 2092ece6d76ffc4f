//! Synthetic pulse source
//!
//! Publishes the same four sample channels as a real sensor so the views can
//! be exercised without hardware. The waveform is a narrow systolic peak plus
//! a smaller dicrotic bump on a slowly wandering baseline.

use crate::events::{EventBus, SensorEvent};
use crate::window::Sample;
use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One generated sample frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    pub raw: f64,
    pub heartbeat: f64,
    pub bpm: f64,
    pub ibi: f64,
}

/// Deterministic pulse waveform sampled at a fixed rate
#[derive(Debug, Clone)]
pub struct PulseGenerator {
    sampling_rate_hz: u32,
    bpm: f64,
    tick: u64,
}

impl PulseGenerator {
    pub fn new(sampling_rate_hz: u32, bpm: f64) -> Self {
        Self {
            sampling_rate_hz: sampling_rate_hz.max(1),
            bpm: bpm.clamp(30.0, 220.0),
            tick: 0,
        }
    }

    /// Inter-beat interval in milliseconds
    pub fn ibi_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    pub fn next_frame(&mut self) -> PulseFrame {
        let t = self.tick as f64 / f64::from(self.sampling_rate_hz);
        self.tick += 1;

        let beat_secs = 60.0 / self.bpm;
        let phase = (t % beat_secs) / beat_secs;

        let systolic = gaussian(phase, 0.15, 0.04);
        let dicrotic = 0.35 * gaussian(phase, 0.45, 0.06);
        let heartbeat = 512.0 + 400.0 * (systolic + dicrotic);

        let baseline = 40.0 * (TAU * t / 8.0).sin();
        let raw = 2048.0 + baseline + 0.6 * (heartbeat - 512.0);

        PulseFrame {
            raw: raw.round(),
            heartbeat: heartbeat.round(),
            bpm: self.bpm.round(),
            ibi: self.ibi_ms().round(),
        }
    }
}

fn gaussian(x: f64, mean: f64, width: f64) -> f64 {
    (-((x - mean) * (x - mean)) / (2.0 * width * width)).exp()
}

/// Background task feeding generated frames to the bus
pub struct DummySource {
    shutdown: Arc<AtomicBool>,
}

impl DummySource {
    /// Start publishing at `sampling_rate_hz`. Must be called within a tokio runtime.
    pub fn spawn(bus: EventBus, sampling_rate_hz: u32) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_task = shutdown.clone();
        let mut generator = PulseGenerator::new(sampling_rate_hz, 72.0);
        let period = Duration::from_secs_f64(1.0 / f64::from(sampling_rate_hz.max(1)));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            info!("Dummy data source started at {} Hz", sampling_rate_hz);
            while !shutdown_task.load(Ordering::Relaxed) {
                interval.tick().await;
                let frame = generator.next_frame();
                let now = chrono::Local::now();
                bus.publish(SensorEvent::RawSample(Sample::at(frame.raw, now)));
                bus.publish(SensorEvent::HeartbeatSample(Sample::at(frame.heartbeat, now)));
                bus.publish(SensorEvent::Bpm(frame.bpm));
                bus.publish(SensorEvent::Ibi(frame.ibi));
            }
            info!("Dummy data source stopped");
        });

        Self { shutdown }
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for DummySource {
    fn drop(&mut self) {
        self.stop();
    }
}
