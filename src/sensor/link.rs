//! UDP sensor link
//!
//! Listens on the stream port for datagrams from the sensor and publishes
//! the decoded events on the bus. The sensor has no session, so connection
//! state is inferred: a datagram while disconnected marks it connected,
//! silence longer than the timeout marks it disconnected. The flag is shared
//! with the handle so an owner can reset it and read it back.
//!
//! Runs as an async tokio task:
//! - RX task: receives datagrams, tracks the sender address, decodes, publishes

use super::protocol::decode_datagram;
use super::stats::LinkStats;
use crate::constants::{
    MAX_SOCKET_RETRY_ATTEMPTS, RECV_POLL_INTERVAL_MS, RETRY_BASE_DELAY_MS, UDP_BUFFER_SIZE,
};
use crate::error::{DashError, Result};
use crate::events::{EventBus, SensorEvent};
use parking_lot::RwLock;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// UDP listener for sensor datagrams
///
/// # Example
///
/// ```ignore
/// let link = SensorLink::new(34254, Duration::from_secs(3));
/// let handle = link.spawn(bus.clone(), stats.clone())?;
///
/// // Events arrive on bus subscriptions until the handle is dropped
/// ```
pub struct SensorLink {
    port: u16,
    timeout: Duration,
}

impl SensorLink {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Bind the stream port and start the RX task. Must be called within a tokio runtime.
    pub fn spawn(self, bus: EventBus, stats: Arc<LinkStats>) -> Result<LinkHandle> {
        let socket = create_reusable_udp_socket(self.port)?;
        let port = socket
            .local_addr()
            .map(|a| a.port())
            .unwrap_or(self.port);

        let shutdown = Arc::new(AtomicBool::new(false));
        let connected = Arc::new(AtomicBool::new(false));
        let peer: Arc<RwLock<Option<SocketAddr>>> = Arc::new(RwLock::new(None));

        let shutdown_rx = shutdown.clone();
        let connected_rx = connected.clone();
        let peer_store = peer.clone();
        let timeout = self.timeout;
        let task = tokio::spawn(async move {
            let mut buf = [0u8; UDP_BUFFER_SIZE];
            let mut last_seen: Option<Instant> = None;

            while !shutdown_rx.load(Ordering::Relaxed) {
                match tokio::time::timeout(
                    Duration::from_millis(RECV_POLL_INTERVAL_MS),
                    socket.recv_from(&mut buf),
                )
                .await
                {
                    Ok(Ok((len, addr))) => {
                        stats.add_rx(len);
                        last_seen = Some(Instant::now());
                        *peer_store.write() = Some(addr);

                        // Flag is set before decoding so any status that
                        // follows is published after the connection change
                        if !connected_rx.swap(true, Ordering::AcqRel) {
                            info!("Sensor connected from {}", addr);
                            bus.publish(SensorEvent::Connection(true));
                        }

                        match decode_datagram(&buf[..len]) {
                            Ok(events) => {
                                for event in events {
                                    bus.publish(event);
                                }
                            }
                            Err(e) => {
                                stats.add_decode_error();
                                debug!("Dropping datagram from {}: {}", addr, e);
                            }
                        }
                    }
                    Ok(Err(e)) => {
                        // Socket recv error - continue polling
                        debug!("UDP recv error: {}", e);
                    }
                    Err(_) => {
                        // Timeout - expected, allows checking shutdown flag
                    }
                }

                if last_seen.is_some_and(|t| t.elapsed() > timeout)
                    && connected_rx
                        .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                {
                    info!("Sensor silent for {:?}, marking disconnected", timeout);
                    bus.publish(SensorEvent::Connection(false));
                }
            }

            if connected_rx.swap(false, Ordering::AcqRel) {
                bus.publish(SensorEvent::Connection(false));
            }
            debug!("Sensor link on port {} stopped", port);
        });

        info!("Listening for sensor datagrams on UDP port {}", port);
        Ok(LinkHandle {
            port,
            shutdown,
            connected,
            peer,
            task: Some(task),
        })
    }
}

/// Running link. Stops the RX task when dropped.
pub struct LinkHandle {
    port: u16,
    shutdown: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    peer: Arc<RwLock<Option<SocketAddr>>>,
    task: Option<JoinHandle<()>>,
}

impl LinkHandle {
    /// Bound local port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address of the last datagram sender
    pub fn peer(&self) -> Option<SocketAddr> {
        *self.peer.read()
    }

    /// Whether the link has heard from the sensor within the timeout
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Forget the current connection without waiting for the timeout.
    ///
    /// No event is published; the next datagram publishes `Connection(true)`
    /// again. Used when the sensor is expected to go away, e.g. for OTA.
    pub fn reset_connection(&self) {
        self.connected.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the RX task to stop (returns immediately)
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop and wait for the RX task to release the socket
    pub async fn join(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for LinkHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Create a UDP socket with SO_REUSEADDR for quick rebind after a port change
///
/// Retries a few times if the socket is still in use (e.g., the previous link
/// has not released it yet).
fn create_reusable_udp_socket(port: u16) -> Result<UdpSocket> {
    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
    let map_err = |e| DashError::UdpBind { port, source: e };

    for attempt in 0..MAX_SOCKET_RETRY_ATTEMPTS {
        let socket =
            Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(map_err)?;
        socket.set_reuse_address(true).map_err(map_err)?;
        socket.set_nonblocking(true).map_err(map_err)?;

        match socket.bind(&addr.into()) {
            Ok(_) => {
                let std_socket: std::net::UdpSocket = socket.into();
                return UdpSocket::from_std(std_socket).map_err(map_err);
            }
            Err(_) if attempt < MAX_SOCKET_RETRY_ATTEMPTS - 1 => {
                // Exponential backoff: 200ms, 400ms, 800ms, 1600ms
                std::thread::sleep(Duration::from_millis(RETRY_BASE_DELAY_MS * (1 << attempt)));
            }
            Err(e) => return Err(map_err(e)),
        }
    }

    Err(DashError::UdpBind {
        port,
        source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "failed after retries"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::sensor::protocol::encode_samples;

    #[tokio::test]
    async fn test_link_publishes_connection_and_samples() {
        let bus = EventBus::new();
        let mut connection = bus.subscribe(EventKind::Connection);
        let mut bpm = bus.subscribe(EventKind::Bpm);
        let stats = Arc::new(LinkStats::new());

        let handle = SensorLink::new(0, Duration::from_secs(5))
            .spawn(bus.clone(), stats.clone())
            .unwrap();
        let port = handle.port();
        assert_ne!(port, 0);

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(&encode_samples(500, 300, 64, 937), ("127.0.0.1", port))
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), connection.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(SensorEvent::Connection(true)));
        let event = tokio::time::timeout(Duration::from_secs(2), bpm.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(SensorEvent::Bpm(64.0)));

        assert_eq!(stats.rx_packets(), 1);
        assert!(handle.peer().is_some());
        handle.join().await;
    }

    #[tokio::test]
    async fn test_link_times_out_to_disconnected() {
        let bus = EventBus::new();
        let mut connection = bus.subscribe(EventKind::Connection);
        let stats = Arc::new(LinkStats::new());

        let handle = SensorLink::new(0, Duration::from_millis(200))
            .spawn(bus.clone(), stats)
            .unwrap();

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[0, 60], ("127.0.0.1", handle.port())).unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), connection.recv())
            .await
            .unwrap();
        assert_eq!(first, Some(SensorEvent::Connection(true)));
        let second = tokio::time::timeout(Duration::from_secs(2), connection.recv())
            .await
            .unwrap();
        assert_eq!(second, Some(SensorEvent::Connection(false)));
        handle.join().await;
    }

    #[tokio::test]
    async fn test_decode_errors_are_counted() {
        let bus = EventBus::new();
        let stats = Arc::new(LinkStats::new());
        let handle = SensorLink::new(0, Duration::from_secs(5))
            .spawn(bus, stats.clone())
            .unwrap();

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(&[1, 2, 3], ("127.0.0.1", handle.port())).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while stats.decode_errors() == 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(stats.decode_errors(), 1);
        handle.join().await;
    }

    #[tokio::test]
    async fn test_reset_connection_reconnects_on_next_datagram() {
        let bus = EventBus::new();
        let mut connection = bus.subscribe(EventKind::Connection);
        let handle = SensorLink::new(0, Duration::from_secs(5))
            .spawn(bus.clone(), Arc::new(LinkStats::new()))
            .unwrap();
        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();

        sender.send_to(&[0, 60], ("127.0.0.1", handle.port())).unwrap();
        let first = tokio::time::timeout(Duration::from_secs(2), connection.recv())
            .await
            .unwrap();
        assert_eq!(first, Some(SensorEvent::Connection(true)));
        assert!(handle.is_connected());

        handle.reset_connection();
        assert!(!handle.is_connected());

        sender.send_to(&[0, 61], ("127.0.0.1", handle.port())).unwrap();
        let again = tokio::time::timeout(Duration::from_secs(2), connection.recv())
            .await
            .unwrap();
        assert_eq!(again, Some(SensorEvent::Connection(true)));
        assert!(handle.is_connected());
        handle.join().await;
    }
}
