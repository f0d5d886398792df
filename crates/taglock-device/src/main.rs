//! `taglockd` — the lock controller daemon.
//!
//! Bring-up order matters: storage opens and the whitelist loads
//! before any task is spawned, so load-time population runs strictly
//! before the lock-protected phase. External-driver failures (storage,
//! serial) abort startup; everything after that degrades locally and
//! keeps the scan loop alive.

use std::sync::Arc;

use anyhow::Context;
use taglock_bridge::{LogTransport, Reporter, command_queue, run_consumer};
use taglock_core::constants::TOPIC_TOGGLE_TAG;
use taglock_device::config::DeviceConfig;
use taglock_device::tasks::run_scan_loop;
use taglock_hardware::{LogSwitch, RelayDoor, SerialByteSource, SystemClock};
use taglock_rfid::TagDecoder;
use taglock_storage::{Database, DatabaseConfig, SqliteBlobStore, Whitelist};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DeviceConfig::from_env();
    info!(
        serial_port = %config.serial_port,
        database_path = %config.database_path,
        idle_window_ms = config.idle_window_ms,
        "starting taglockd"
    );

    let db = Database::new(DatabaseConfig::new(&config.database_path))
        .await
        .context("storage bring-up failed")?;

    let whitelist = Arc::new(Whitelist::load(SqliteBlobStore::new(db.clone())).await);
    if let Some(e) = whitelist.load_error() {
        warn!(error = %e, "whitelist running degraded: starting empty");
    }
    info!(occupied = whitelist.occupied().await, "whitelist ready");

    let clock = SystemClock::new();

    let source = SerialByteSource::open(&config.serial_port, config.baud_rate)
        .context("reader serial bring-up failed")?;
    let decoder = TagDecoder::with_idle_window(source, clock.clone(), config.idle_window());

    let door = Arc::new(RelayDoor::new(LogSwitch, clock.clone(), config.door_pulse()));
    let reporter = Arc::new(Reporter::new(LogTransport));

    // Inbound management commands flow through this sender; the
    // messaging client glue owns it for the life of the process.
    let (command_sender, command_receiver) = command_queue();
    let consumer = tokio::spawn(run_consumer(command_receiver, Arc::clone(&whitelist)));
    info!(topic = TOPIC_TOGGLE_TAG, "management channel ready");

    let result = run_scan_loop(decoder, whitelist, door, reporter).await;

    drop(command_sender);
    consumer.await.ok();

    result.context("scan loop terminated")
}
