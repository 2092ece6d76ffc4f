//! Integration tests for the sensor-to-dashboard data flow
//!
//! Drives the real UDP link and command sink over localhost and checks what
//! the app and its plot view end up with.

use pulse_dash::app::{App, AppPaths, Tab};
use pulse_dash::config::Config;
use pulse_dash::events::{EventBus, EventKind, SensorEvent};
use pulse_dash::input::AppCommand;
use pulse_dash::sensor::protocol::encode_samples;
use pulse_dash::sensor::{
    CommandSink, LinkHandle, LinkStats, SensorCommand, SensorLink, UdpCommandSink,
};
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::{Duration, Instant};

const STATUS_JSON: &[u8] = br#"{"version":[0,6,0],"sensor_ok":true,"motor_ok":false,"i2c_addresses":[54]}"#;

// =============================================================================
// Helpers
// =============================================================================

/// Local stand-in for the sensor: receives commands, sends datagrams
struct FakeSensor {
    socket: UdpSocket,
}

impl FakeSensor {
    fn new() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        Self { socket }
    }

    fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    fn send_to_link(&self, link_port: u16, datagram: &[u8]) {
        self.socket
            .send_to(datagram, ("127.0.0.1", link_port))
            .unwrap();
    }

    /// Second handle on the same socket, for receiving on a blocking thread
    fn handle(&self) -> Self {
        Self {
            socket: self.socket.try_clone().unwrap(),
        }
    }

    fn recv_command(&self) -> serde_json::Value {
        let mut buf = [0u8; 512];
        let (len, _) = self.socket.recv_from(&mut buf).unwrap();
        serde_json::from_slice(&buf[..len]).unwrap()
    }
}

fn sensor_config(sensor: &FakeSensor) -> Config {
    let mut config = Config::default();
    config.sensor.ip = "127.0.0.1".into();
    config.sensor.command_port = sensor.port();
    config.sensor.connection_timeout_secs = 1;
    config.updates.check_on_startup = false;
    config
}

/// A currently unused local port (ephemeral range, so never privileged)
fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// App wired to a real UDP sink aimed at `sensor`, plus a link on an ephemeral port
fn app_with_link(sensor: &FakeSensor) -> (App, LinkHandle) {
    let config = sensor_config(sensor);

    let bus = EventBus::new();
    let stats = Arc::new(LinkStats::new());
    let sink = UdpCommandSink::spawn(config.sensor.command_addr(), stats.clone()).unwrap();
    let link = SensorLink::new(0, config.sensor.connection_timeout())
        .spawn(bus.clone(), stats.clone())
        .unwrap();

    let app = App::with_sink(config, AppPaths::default(), bus, stats, Box::new(sink));
    (app, link)
}

/// App that owns its link, listening on a free stream port
fn listening_app(sensor: &FakeSensor) -> App {
    let mut config = sensor_config(sensor);
    config.sensor.stream_port = free_port();

    let stats = Arc::new(LinkStats::new());
    let sink = UdpCommandSink::spawn(config.sensor.command_addr(), stats.clone()).unwrap();
    let mut app = App::with_sink(
        config,
        AppPaths::default(),
        EventBus::new(),
        stats,
        Box::new(sink),
    );
    app.listen();
    app
}

/// Stream status datagrams to the app's link while polling, until it shows a
/// connected sensor with a status snapshot or three seconds pass
async fn stream_until_connected(app: &mut App, sensor: &FakeSensor) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if let Some(port) = app.link_port() {
            sensor.send_to_link(port, STATUS_JSON);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.poll();
        if app.store().connected() && app.store().sensor_status().is_some() {
            return true;
        }
    }
    false
}

/// Poll the app until `done` holds or two seconds pass
async fn poll_until(app: &mut App, done: impl Fn(&App) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        app.poll();
        if done(app) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

// =============================================================================
// Sensor -> App
// =============================================================================

#[tokio::test]
async fn test_samples_reach_plot_view() {
    let sensor = FakeSensor::new();
    let (mut app, link) = app_with_link(&sensor);
    app.select_tab(Tab::Plot);

    for i in 0..5u16 {
        sensor.send_to_link(link.port(), &encode_samples(500 + i, 300 + i, 72, 833));
    }

    let arrived = poll_until(&mut app, |app| {
        app.plot().is_some_and(|plot| plot.heartbeat_len() == 5)
    })
    .await;
    assert!(arrived, "samples never reached the plot view");

    let plot = app.plot().unwrap();
    assert_eq!(plot.raw_len(), 5);
    assert_eq!(plot.bpm(), 72.0);
    assert_eq!(plot.ibi_display(), 833.0);
    let series = plot.heartbeat_series();
    assert_eq!(series.points.len(), 5);
    assert_eq!(series.points.last().map(|(_, y)| *y), Some(304.0));
    assert!(app.store().connected());

    link.join().await;
}

#[tokio::test]
async fn test_status_cleared_after_silence() {
    let sensor = FakeSensor::new();
    let (mut app, link) = app_with_link(&sensor);

    sensor.send_to_link(link.port(), STATUS_JSON);
    let got_status = poll_until(&mut app, |app| app.store().sensor_status().is_some()).await;
    assert!(got_status, "status snapshot never arrived");
    assert_eq!(
        app.store().sensor_status().map(|s| s.version.to_string()),
        Some("0.6.0".to_string())
    );

    // Link timeout is one second
    let cleared = tokio::time::timeout(Duration::from_secs(3), async {
        loop {
            app.poll();
            if !app.store().connected() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    assert!(cleared.is_ok(), "link never reported the disconnect");
    assert!(app.store().sensor_status().is_none());

    link.join().await;
}

#[tokio::test]
async fn test_app_reconnects_after_silence() {
    let sensor = FakeSensor::new();
    let (mut app, link) = app_with_link(&sensor);

    sensor.send_to_link(link.port(), STATUS_JSON);
    assert!(poll_until(&mut app, |app| app.store().connected()).await);

    // Link timeout is one second
    tokio::time::sleep(Duration::from_millis(1500)).await;
    app.poll();
    assert!(!app.store().connected());

    sensor.send_to_link(link.port(), STATUS_JSON);
    let back = poll_until(&mut app, |app| {
        app.store().connected() && app.store().sensor_status().is_some()
    })
    .await;
    assert!(back, "sensor never came back after the timeout");

    link.join().await;
}

#[tokio::test]
async fn test_ota_then_streaming_sensor_reconnects() {
    let sensor = FakeSensor::new();
    let mut app = listening_app(&sensor);
    assert!(stream_until_connected(&mut app, &sensor).await);

    // Sensor ignores the update (bad URL) and keeps streaming
    app.custom_firmware_update("http://10.0.0.9/fw.bin");
    assert!(!app.store().connected());
    assert!(app.store().sensor_status().is_none());

    let back = stream_until_connected(&mut app, &sensor).await;
    assert!(back, "app stayed disconnected while the sensor streamed");

    let commands = sensor.handle();
    let frame = tokio::task::spawn_blocking(move || commands.recv_command())
        .await
        .unwrap();
    assert_eq!(frame["command"], "update");
    assert_eq!(frame["data"], "http://10.0.0.9/fw.bin");
}

#[tokio::test]
async fn test_port_change_while_connected_rebinds_link() {
    let sensor = FakeSensor::new();
    let mut app = listening_app(&sensor);
    let old_port = app.link_port().unwrap();
    assert!(stream_until_connected(&mut app, &sensor).await);

    let new_port = free_port();
    assert_eq!(app.apply_port(&new_port.to_string()), Some(new_port.to_string()));
    assert_eq!(app.link_port(), Some(new_port));
    assert_ne!(old_port, new_port);

    let commands = sensor.handle();
    let frame = tokio::task::spawn_blocking(move || commands.recv_command())
        .await
        .unwrap();
    assert_eq!(frame["command"], "set_port");
    assert_eq!(frame["data"], new_port.to_string());

    // The sensor follows the new port
    assert!(stream_until_connected(&mut app, &sensor).await);

    // A late disconnect from the replaced listener must not stick
    for _ in 0..5 {
        sensor.send_to_link(new_port, STATUS_JSON);
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.poll();
    }
    assert!(app.store().connected());
    assert!(app.store().sensor_status().is_some());
}

#[tokio::test]
async fn test_leaving_plot_tab_releases_subscriptions() {
    let sensor = FakeSensor::new();
    let bus = EventBus::new();
    let mut config = Config::default();
    config.sensor.command_port = sensor.port();
    let stats = Arc::new(LinkStats::new());
    let sink = UdpCommandSink::spawn(None, stats.clone()).unwrap();
    let mut app = App::with_sink(
        config,
        AppPaths::default(),
        bus.clone(),
        stats,
        Box::new(sink),
    );

    app.select_tab(Tab::Plot);
    assert_eq!(bus.subscriber_count(EventKind::HeartbeatSample), 1);
    app.select_tab(Tab::Logs);
    assert_eq!(bus.subscriber_count(EventKind::HeartbeatSample), 0);
    assert!(app.plot().is_none());
}

// =============================================================================
// App -> Sensor
// =============================================================================

#[tokio::test]
async fn test_restart_reaches_sensor_once_connected() {
    let sensor = FakeSensor::new();
    let (mut app, link) = app_with_link(&sensor);

    sensor.send_to_link(link.port(), STATUS_JSON);
    assert!(poll_until(&mut app, |app| app.store().connected()).await);

    app.execute_command(AppCommand::RestartSensor);
    let frame = tokio::task::spawn_blocking(move || sensor.recv_command())
        .await
        .unwrap();
    assert_eq!(frame["command"], "restart");
    assert!(frame.get("data").is_none());

    link.join().await;
}

#[tokio::test]
async fn test_sink_encodes_command_frames() {
    let sensor = FakeSensor::new();
    let target = sensor.socket.local_addr().unwrap();
    let sink = UdpCommandSink::spawn(Some(target), Arc::new(LinkStats::new())).unwrap();

    sink.send(SensorCommand::SetAmplitude(70)).unwrap();
    let frame = tokio::task::spawn_blocking(move || sensor.recv_command())
        .await
        .unwrap();
    assert_eq!(frame["command"], "set_amplitude");
    assert_eq!(frame["data"], "70");
}

#[tokio::test]
async fn test_sink_without_address_errors() {
    let sink = UdpCommandSink::spawn(None, Arc::new(LinkStats::new())).unwrap();
    assert!(sink.send(SensorCommand::Restart).is_err());
}

// =============================================================================
// Bus
// =============================================================================

#[test]
fn test_bus_fanout_to_multiple_subscribers() {
    let bus = EventBus::new();
    let mut first = bus.subscribe(EventKind::Bpm);
    let mut second = bus.subscribe(EventKind::Bpm);
    let mut other = bus.subscribe(EventKind::Ibi);

    assert_eq!(bus.publish(SensorEvent::Bpm(61.0)), 2);
    assert_eq!(first.drain(), vec![SensorEvent::Bpm(61.0)]);
    assert_eq!(second.drain(), vec![SensorEvent::Bpm(61.0)]);
    assert!(other.drain().is_empty());
}
