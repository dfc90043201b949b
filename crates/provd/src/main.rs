//! provd — the provgrid command-line daemon.
//!
//! Single binary that assembles the provgrid subsystems:
//! - Record store (redb)
//! - Template-based configuration compute
//! - HTTP device gateway client
//! - Rollout executor
//!
//! # Usage
//!
//! ```text
//! provd import --file inventory.json --data-dir /var/lib/provgrid
//! provd rollout --venue venue-1 --user ops@example.com \
//!     --gateway 127.0.0.1:16002 --data-dir /var/lib/provgrid
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

use provgrid_config::TemplateCompute;
use provgrid_gateway::HttpGateway;
use provgrid_notify::LogSink;
use provgrid_rollout::{FanoutConfig, RolloutJob};
use provgrid_state::{ConfigTemplate, DeviceRecord, RecordStore, VenueRecord};

#[derive(Parser)]
#[command(name = "provd", about = "provgrid daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed venues, devices, and templates from a JSON inventory manifest.
    Import {
        /// Inventory manifest to import.
        #[arg(long)]
        file: PathBuf,

        /// Data directory for persistent state.
        #[arg(long, default_value = "/var/lib/provgrid")]
        data_dir: PathBuf,
    },

    /// Roll the computed configuration out to every device in a venue.
    Rollout {
        /// Venue to update.
        #[arg(long)]
        venue: String,

        /// User to notify on completion.
        #[arg(long, default_value = "system")]
        user: String,

        /// Device gateway address (host:port).
        #[arg(long, default_value = "127.0.0.1:16002")]
        gateway: String,

        /// Maximum number of concurrent device updates.
        #[arg(long, default_value = "16")]
        workers: usize,

        /// Data directory for persistent state.
        #[arg(long, default_value = "/var/lib/provgrid")]
        data_dir: PathBuf,
    },
}

/// Shape of the inventory manifest accepted by `provd import`.
#[derive(Debug, Deserialize)]
struct Inventory {
    #[serde(default)]
    venues: Vec<VenueEntry>,
    #[serde(default)]
    devices: Vec<DeviceEntry>,
    #[serde(default)]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct VenueEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    templates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    id: String,
    serial_number: String,
    device_type: String,
    #[serde(default)]
    venue_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    id: String,
    name: String,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    device_types: Vec<String>,
    document: serde_json::Value,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provd=debug,provgrid=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Import { file, data_dir } => run_import(file, data_dir),
        Command::Rollout {
            venue,
            user,
            gateway,
            workers,
            data_dir,
        } => run_rollout(venue, user, gateway, workers, data_dir).await,
    }
}

fn open_store(data_dir: &Path) -> anyhow::Result<RecordStore> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("provgrid.redb");
    let store = RecordStore::open(&db_path)?;
    info!(path = ?db_path, "record store opened");
    Ok(store)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run_import(file: PathBuf, data_dir: PathBuf) -> anyhow::Result<()> {
    let store = open_store(&data_dir)?;

    let raw = std::fs::read_to_string(&file)?;
    let inventory: Inventory = serde_json::from_str(&raw)?;
    let now = now_secs();

    for venue in &inventory.venues {
        store.put_venue(&VenueRecord {
            id: venue.id.clone(),
            name: venue.name.clone(),
            description: venue.description.clone(),
            devices: Vec::new(),
            templates: venue.templates.clone(),
            created_at: now,
            modified_at: now,
        })?;
    }

    for template in &inventory.templates {
        store.put_template(&ConfigTemplate {
            id: template.id.clone(),
            name: template.name.clone(),
            weight: template.weight,
            device_types: template.device_types.clone(),
            document: template.document.clone(),
            created_at: now,
            modified_at: now,
        })?;
    }

    for device in &inventory.devices {
        store.put_device(&DeviceRecord {
            id: device.id.clone(),
            serial_number: device.serial_number.clone(),
            device_type: device.device_type.clone(),
            venue_id: None,
            created_at: now,
            modified_at: now,
        })?;
        // Membership goes through the store so venue lists stay in sync.
        if let Some(venue_id) = &device.venue_id {
            store.add_device_to_venue(&device.id, venue_id)?;
        }
    }

    info!(
        venues = inventory.venues.len(),
        devices = inventory.devices.len(),
        templates = inventory.templates.len(),
        "inventory imported"
    );
    Ok(())
}

async fn run_rollout(
    venue: String,
    user: String,
    gateway: String,
    workers: usize,
    data_dir: PathBuf,
) -> anyhow::Result<()> {
    let store = open_store(&data_dir)?;

    let compute = Arc::new(TemplateCompute::new(store.clone()));
    let gateway = Arc::new(HttpGateway::new(gateway));
    let sink = Arc::new(LogSink);

    let job = RolloutJob::new(&user, store, compute, gateway, sink)
        .with_config(FanoutConfig { max_workers: workers });
    let job_id = job.job_id().to_string();

    info!(job_id = %job_id, venue = %venue, workers, "rollout starting");
    let report = job.run(&venue).await?;

    info!(
        job_id = %job_id,
        updated = report.updated.len(),
        failed = report.failed.len(),
        bad_config = report.bad_config.len(),
        not_found = report.not_found.len(),
        "rollout finished"
    );
    println!("{}", report.details(&job_id));
    Ok(())
}
