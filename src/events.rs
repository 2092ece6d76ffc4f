//! Push-event bus
//!
//! Named sensor events fan out to per-kind subscriptions. Each subscription
//! owns a bounded queue, so delivery is FIFO per kind and publishing never
//! blocks. Dropping a `Subscription` removes it from the bus.

use crate::constants::CHANNEL_CAPACITY;
use crate::store::SensorStatus;
use crate::window::Sample;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Event channel names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RawSample,
    HeartbeatSample,
    Bpm,
    Ibi,
    Connection,
    Status,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::RawSample => "raw_heartbeat_datum",
            EventKind::HeartbeatSample => "heartbeat_datum",
            EventKind::Bpm => "bpm_datum",
            EventKind::Ibi => "ibi_datum",
            EventKind::Connection => "connection",
            EventKind::Status => "sensor_status",
        }
    }
}

/// Event pushed by the sensor link or the dummy source
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    RawSample(Sample),
    HeartbeatSample(Sample),
    Bpm(f64),
    Ibi(f64),
    Connection(bool),
    Status(SensorStatus),
}

impl SensorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SensorEvent::RawSample(_) => EventKind::RawSample,
            SensorEvent::HeartbeatSample(_) => EventKind::HeartbeatSample,
            SensorEvent::Bpm(_) => EventKind::Bpm,
            SensorEvent::Ibi(_) => EventKind::Ibi,
            SensorEvent::Connection(_) => EventKind::Connection,
            SensorEvent::Status(_) => EventKind::Status,
        }
    }

    /// Scalar payload of sample-like events
    pub fn value(&self) -> Option<f64> {
        match self {
            SensorEvent::RawSample(s) | SensorEvent::HeartbeatSample(s) => Some(s.value),
            SensorEvent::Bpm(v) | SensorEvent::Ibi(v) => Some(*v),
            SensorEvent::Connection(_) | SensorEvent::Status(_) => None,
        }
    }
}

struct Listener {
    id: u64,
    tx: mpsc::Sender<SensorEvent>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<Listener>>,
}

/// Cloneable handle to the event bus
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<Inner>>,
    dropped: Arc<AtomicU64>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    /// Bus whose subscriptions queue at most `capacity` events each
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            dropped: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    /// Register interest in one event kind
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .listeners
            .entry(kind)
            .or_default()
            .push(Listener { id, tx });

        Subscription {
            id,
            kind,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every subscriber of its kind without blocking.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, event: SensorEvent) -> usize {
        let kind = event.kind();
        let mut inner = self.inner.lock();
        let Some(listeners) = inner.listeners.get_mut(&kind) else {
            return 0;
        };

        let mut delivered = 0;
        listeners.retain(|listener| match listener.tx.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            // Receiver gone without unsubscribing (should not happen, Drop handles it)
            Err(TrySendError::Closed(_)) => false,
        });
        delivered
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .lock()
            .listeners
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Events discarded because a subscriber's queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped subscription to one event kind.
///
/// Unregisters itself on drop; nothing is delivered afterwards.
pub struct Subscription {
    id: u64,
    kind: EventKind,
    rx: mpsc::Receiver<SensorEvent>,
    bus: Weak<Mutex<Inner>>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Next queued event, if any
    pub fn try_recv(&mut self) -> Option<SensorEvent> {
        self.rx.try_recv().ok()
    }

    /// All queued events in arrival order
    pub fn drain(&mut self) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event (headless consumers)
    pub async fn recv(&mut self) -> Option<SensorEvent> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            let mut inner = inner.lock();
            if let Some(listeners) = inner.listeners.get_mut(&self.kind) {
                listeners.retain(|l| l.id != self.id);
            }
        }
        self.rx.close();
    }
}
