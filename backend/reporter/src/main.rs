//! Device telemetry agent.
//!
//! Samples the host and posts a snapshot to the site's status endpoint on a
//! fixed interval. A failed post is logged and the next tick tries again.
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use payloads::status::{StatusReceipt, StatusSnapshot};
use reqwest::Client;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};
use tokio::time::{interval, sleep};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(
        long,
        env = "STATUS_ENDPOINT",
        default_value = "http://localhost:1111/api/mac-status"
    )]
    endpoint: String,

    /// Defaults to the host name.
    #[arg(long, env = "DEVICE_ID")]
    device_id: Option<String>,

    /// Seconds between snapshots.
    #[arg(long, default_value_t = 60)]
    interval: u64,

    #[arg(long)]
    once: bool,
}

#[derive(Debug, Clone, Default)]
struct Reading {
    hostname: Option<String>,
    os_version: Option<String>,
    hardware_model: Option<String>,
    cpu_count: usize,
    cpu_usage_percent: f32,
    total_memory: u64,
    used_memory: u64,
    free_memory: u64,
    uptime: u64,
}

async fn read_host(system: &mut System) -> Reading {
    system.refresh_cpu();
    sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    system.refresh_cpu();
    system.refresh_memory();

    Reading {
        hostname: System::host_name(),
        os_version: System::long_os_version(),
        hardware_model: System::cpu_arch(),
        cpu_count: system.cpus().len(),
        cpu_usage_percent: system.global_cpu_info().cpu_usage(),
        total_memory: system.total_memory(),
        used_memory: system.used_memory(),
        free_memory: system.free_memory(),
        uptime: System::uptime(),
    }
}

fn snapshot(device_id: &str, reading: Reading, now: DateTime<Utc>) -> StatusSnapshot {
    let memory_usage_percent = (reading.total_memory > 0)
        .then(|| reading.used_memory as f64 / reading.total_memory as f64 * 100.0);

    StatusSnapshot {
        device_id: Some(device_id.to_string()),
        timestamp: Some(now),
        hostname: reading.hostname,
        os_version: reading.os_version,
        hardware_model: reading.hardware_model,
        cpu_count: u32::try_from(reading.cpu_count).ok(),
        cpu_usage_percent: Some(f64::from(reading.cpu_usage_percent)),
        total_memory: Some(reading.total_memory),
        memory_used: Some(reading.used_memory),
        memory_free: Some(reading.free_memory),
        memory_usage_percent,
        uptime: Some(reading.uptime),
        battery_percent: None,
    }
}

async fn report(client: &Client, endpoint: &str, snapshot: &StatusSnapshot) -> anyhow::Result<()> {
    let receipt: StatusReceipt = client
        .post(endpoint)
        .json(snapshot)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    info!("Snapshot accepted as {}", receipt.id);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let device_id = args
        .device_id
        .or_else(System::host_name)
        .unwrap_or_else(|| "unknown-device".to_string());

    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    let mut system = System::new();
    let mut ticker = interval(Duration::from_secs(args.interval.max(1)));

    info!("Reporting {device_id} to {}", args.endpoint);

    loop {
        ticker.tick().await;

        let reading = read_host(&mut system).await;
        let snapshot = snapshot(&device_id, reading, Utc::now());

        match report(&client, &args.endpoint, &snapshot).await {
            Ok(()) => {}
            Err(e) if args.once => return Err(e),
            Err(e) => warn!("Failed to post snapshot: {e}"),
        }

        if args.once {
            return Ok(());
        }
    }
}
