//! Pulse Dash - terminal dashboard for the esp-pulser heart-rate sensor
//!
//! Usage:
//!   pulse-dash                         Run interactive TUI
//!   pulse-dash --headless              Print sensor events to stdout
//!   pulse-dash restart                 Restart the sensor
//!   pulse-dash update --version 0.6.5  Flash firmware over the air
//!   pulse-dash check                   Look for new releases

use anyhow::{bail, Context, Result};
use clap::Parser;
use pulse_dash::app::App;
use pulse_dash::cli::{Cli, Command};
use pulse_dash::config::{self, Config};
use pulse_dash::constants::{APP_VERSION, TRACE_FILE_NAME};
use pulse_dash::events::{EventBus, EventKind, SensorEvent, Subscription};
use pulse_dash::logging::init_tracing;
use pulse_dash::sensor::{
    CommandSink, DummySource, LinkStats, SensorCommand, SensorLink, UdpCommandSink, UpdateTarget,
};
use pulse_dash::ui;
use pulse_dash::updates::{check_app_update, fetch_latest_release};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Time for the TX task to flush a one-shot command before exit
const COMMAND_FLUSH_DELAY_MS: u64 = 200;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so tracing goes to a file in that mode
    let tui = !cli.headless && cli.command.is_none();
    let trace_file = if tui {
        config::log_dir().ok().map(|dir| dir.join(TRACE_FILE_NAME))
    } else {
        None
    };
    init_tracing(cli.verbose, trace_file.as_deref());

    let mut config = config::load();
    if let Some(port) = cli.udp_port {
        config.sensor.stream_port = port;
    }
    if let Some(ip) = cli.ip {
        config.sensor.ip = ip.to_string();
    }

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Some(command) => rt.block_on(run_command(config, command)),
        None if cli.headless => rt.block_on(run_headless(config, cli.dummy)),
        None => rt.block_on(run_tui(config, cli.dummy)),
    }
}

async fn run_tui(config: Config, dummy: bool) -> Result<()> {
    let mut app = App::start(config, dummy)?;
    ui::run(&mut app).await?;
    Ok(())
}

async fn run_headless(config: Config, dummy: bool) -> Result<()> {
    let bus = EventBus::new();
    let stats = Arc::new(LinkStats::new());

    let mut subs: Vec<Subscription> = [
        EventKind::Connection,
        EventKind::Status,
        EventKind::Bpm,
        EventKind::Ibi,
    ]
    .into_iter()
    .map(|kind| bus.subscribe(kind))
    .collect();

    let link = SensorLink::new(config.sensor.stream_port, config.sensor.connection_timeout())
        .spawn(bus.clone(), stats)?;
    let _dummy = dummy.then(|| DummySource::spawn(bus.clone(), config.plot.sampling_rate_hz));

    eprintln!(
        "Pulse Dash v{} listening on UDP:{} (Ctrl+C to stop)",
        APP_VERSION,
        link.port()
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                for sub in subs.iter_mut() {
                    for event in sub.drain() {
                        print_event(&event);
                    }
                }
            }
        }
    }

    link.join().await;
    Ok(())
}

fn print_event(event: &SensorEvent) {
    let name = event.kind().name();
    match event {
        SensorEvent::Connection(connected) => println!("{} {}", name, connected),
        SensorEvent::Status(status) => match serde_json::to_string(status) {
            Ok(json) => println!("{} {}", name, json),
            Err(_) => println!("{} v{}", name, status.version),
        },
        SensorEvent::Bpm(v) | SensorEvent::Ibi(v) => println!("{} {:.1}", name, v),
        SensorEvent::RawSample(s) | SensorEvent::HeartbeatSample(s) => {
            println!("{} {:.1}", name, s.value)
        }
    }
}

async fn run_command(config: Config, command: Command) -> Result<()> {
    let sensor_command = match command {
        Command::Check => return run_check(&config).await,
        Command::Restart => SensorCommand::Restart,
        Command::SetAmplitude { amplitude } => SensorCommand::SetAmplitude(amplitude),
        Command::SetPort { port } => SensorCommand::SetPort(port),
        Command::SetIp { address } => SensorCommand::SetIp(address),
        Command::Update { version, url } => match (version, url) {
            (Some(version), _) => SensorCommand::Update(UpdateTarget::Version(version)),
            (None, Some(url)) => SensorCommand::Update(UpdateTarget::Url(url)),
            (None, None) => bail!("update needs --version or --url"),
        },
    };

    let Some(target) = config.sensor.command_addr() else {
        bail!("No sensor IP configured; pass --ip or set sensor.ip in config.toml");
    };

    let sink = UdpCommandSink::spawn(Some(target), Arc::new(LinkStats::new()))?;
    sink.send(sensor_command.clone())
        .with_context(|| format!("sending '{}'", sensor_command))?;
    info!("Sent '{}' to {}", sensor_command, target);
    tokio::time::sleep(Duration::from_millis(COMMAND_FLUSH_DELAY_MS)).await;

    println!("Sent '{}' to {}", sensor_command, target);
    if matches!(sensor_command, SensorCommand::Update(_)) {
        println!("The sensor will restart once the update is applied.");
    }
    Ok(())
}

async fn run_check(config: &Config) -> Result<()> {
    match check_app_update(&config.updates.app_release_url, APP_VERSION).await {
        Ok(Some(release)) => println!("Dashboard: {} available", release.tag_name),
        Ok(None) => println!("Dashboard: up to date (v{})", APP_VERSION),
        Err(e) => println!("Dashboard: check failed ({})", e),
    }
    match fetch_latest_release(&config.updates.firmware_release_url).await {
        Ok(release) => println!("Firmware: latest is v{}", release.version()),
        Err(e) => println!("Firmware: lookup failed ({})", e),
    }
    Ok(())
}
