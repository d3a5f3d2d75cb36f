//! Layout Snapshot Tool
//!
//! Inspects and edits a directory of saved graph layouts:
//! - `list`: keys, newest first, with node counts
//! - `show <key>`: the stored record as JSON
//! - `merge <base> <overlay> <target>`: overlay positions win, base fills the rest
//! - `delete <key>`: remove a record
//!
//! ## Configuration
//!
//! Environment variables:
//! - `LAYOUT_SNAPSHOT_DIR`: snapshot directory (default: `snapshot_dir` from the config)
//! - `LAYOUT_CONFIG`: path to a JSON `LayoutConfig` (default: built-in defaults)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! LAYOUT_SNAPSHOT_DIR=./graph-positions cargo run --bin layout_snapshots -- list
//! ```

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use layout_kernel::{FsSnapshotStore, LayoutConfig, SnapshotKey, SnapshotStore, sort_keys_recent_first};

const USAGE: &str = "usage: layout_snapshots <list | show <key> | merge <base> <overlay> <target> | delete <key>>";

/// Initialize the tracing subscriber with JSON or pretty format.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "layout_snapshots=info,layout_kernel=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Config from `LAYOUT_CONFIG`, or defaults.
fn load_config() -> Result<LayoutConfig, Box<dyn std::error::Error>> {
    match std::env::var("LAYOUT_CONFIG") {
        Ok(path) if !path.is_empty() => {
            let text = std::fs::read_to_string(&path)?;
            let config = LayoutConfig::from_json(&text)?;
            info!(path = %path, params_hash = %config.params_hash(), "Config loaded");
            Ok(config)
        }
        _ => Ok(LayoutConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config()?;
    let dir = std::env::var("LAYOUT_SNAPSHOT_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config.snapshot_dir.clone());
    let store = FsSnapshotStore::new(dir);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] => {
            let mut keys = store.list_keys().await?;
            sort_keys_recent_first(&mut keys);
            for key in &keys {
                let nodes = store.load(key.as_str()).await?.len();
                println!("{}\t{}\t{}", key, key.label(), nodes);
            }
            info!(dir = %store.dir().display(), count = keys.len(), "Listed snapshots");
        }
        ["show", key] => {
            let snapshot = store.load(key).await?;
            if snapshot.is_empty() {
                warn!(key = %SnapshotKey::normalize(key), "No snapshot stored under key");
            }
            println!("{}", serde_json::to_string_pretty(&snapshot.to_record())?);
        }
        ["merge", base, overlay, target] => {
            let overlay_positions = store.load(overlay).await?;
            let stored = store.save(target, &overlay_positions, Some(*base)).await?;
            println!("{stored}");
        }
        ["delete", key] => {
            let key = SnapshotKey::normalize(key);
            if store.delete(&key).await? {
                println!("deleted {key}");
            } else {
                warn!(key = %key, "No snapshot stored under key");
            }
        }
        _ => {
            eprintln!("{USAGE}");
            return Err("unrecognized command".into());
        }
    }

    Ok(())
}
