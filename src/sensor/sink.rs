//! Command sink towards the sensor
//!
//! Commands are fire-and-forget: `send` only queues the encoded frame and
//! returns. A background TX task writes queued frames to the current target.

use super::protocol::encode_command;
use super::stats::LinkStats;
use super::SensorCommand;
use crate::constants::{CHANNEL_CAPACITY, RECV_POLL_INTERVAL_MS};
use crate::error::{DashError, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Destination for sensor commands
pub trait CommandSink: Send + Sync {
    /// Queue a command. Never waits for the sensor.
    fn send(&self, command: SensorCommand) -> Result<()>;

    /// Point the sink at a new sensor address
    fn retarget(&self, _target: Option<SocketAddr>) {}
}

/// Sends JSON command frames over UDP
pub struct UdpCommandSink {
    tx: mpsc::Sender<(SocketAddr, Bytes)>,
    target: Arc<RwLock<Option<SocketAddr>>>,
    shutdown: Arc<AtomicBool>,
}

impl UdpCommandSink {
    /// Bind an ephemeral socket and start the TX task. Must be called within a tokio runtime.
    pub fn spawn(target: Option<SocketAddr>, stats: Arc<LinkStats>) -> Result<Self> {
        let std_socket = std::net::UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DashError::UdpBind { port: 0, source: e })?;
        std_socket
            .set_nonblocking(true)
            .map_err(|e| DashError::UdpBind { port: 0, source: e })?;
        let socket = UdpSocket::from_std(std_socket)
            .map_err(|e| DashError::UdpBind { port: 0, source: e })?;

        let (tx, mut rx) = mpsc::channel::<(SocketAddr, Bytes)>(CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let shutdown_tx = shutdown.clone();
        tokio::spawn(async move {
            while !shutdown_tx.load(Ordering::Relaxed) {
                match tokio::time::timeout(Duration::from_millis(RECV_POLL_INTERVAL_MS), rx.recv())
                    .await
                {
                    Ok(Some((addr, frame))) => match socket.send_to(&frame, addr).await {
                        Ok(len) => stats.add_tx(len),
                        Err(e) => warn!("Command to {} failed: {}", addr, e),
                    },
                    Ok(None) => {
                        // Channel closed
                        break;
                    }
                    Err(_) => {
                        // Timeout - check shutdown flag
                    }
                }
            }
        });

        Ok(Self {
            tx,
            target: Arc::new(RwLock::new(target)),
            shutdown,
        })
    }

    pub fn target(&self) -> Option<SocketAddr> {
        *self.target.read()
    }
}

impl CommandSink for UdpCommandSink {
    fn send(&self, command: SensorCommand) -> Result<()> {
        let addr = self.target().ok_or(DashError::NoSensorAddress)?;
        let frame = Bytes::from(encode_command(&command));
        debug!("Queueing '{}' for {}", command, addr);

        match self.tx.try_send((addr, frame)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("Command queue full, dropping '{}'", command);
                Err(DashError::QueueFull { what: "command" })
            }
            Err(TrySendError::Closed(_)) => Err(DashError::ChannelClosed { what: "command" }),
        }
    }

    fn retarget(&self, target: Option<SocketAddr>) {
        *self.target.write() = target;
    }
}

impl Drop for UdpCommandSink {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::UpdateTarget;

    #[tokio::test]
    async fn test_send_without_target_fails() {
        let sink = UdpCommandSink::spawn(None, Arc::new(LinkStats::new())).unwrap();
        let err = sink.send(SensorCommand::Restart).unwrap_err();
        assert!(matches!(err, DashError::NoSensorAddress));
    }

    #[tokio::test]
    async fn test_command_reaches_target() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = receiver.local_addr().unwrap();
        let stats = Arc::new(LinkStats::new());

        let sink = UdpCommandSink::spawn(None, stats.clone()).unwrap();
        sink.retarget(Some(addr));
        sink.send(SensorCommand::Update(UpdateTarget::Version("0.6.5".into())))
            .unwrap();

        let mut buf = [0u8; 256];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(value["command"], "update");
        assert_eq!(value["data"], "0.6.5");
    }

    #[tokio::test]
    async fn test_full_queue_is_reported() {
        let sink = UdpCommandSink::spawn(
            Some("127.0.0.1:9".parse().unwrap()),
            Arc::new(LinkStats::new()),
        )
        .unwrap();

        // The TX task cannot run until this test yields
        for _ in 0..CHANNEL_CAPACITY {
            sink.send(SensorCommand::Restart).unwrap();
        }
        let err = sink.send(SensorCommand::Restart).unwrap_err();
        assert!(matches!(err, DashError::QueueFull { what: "command" }));
    }
}
