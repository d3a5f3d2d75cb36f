//! # layout-kernel
//!
//! Layout state for interactive node-link graph views.
//!
//! The kernel sits between a force-directed renderer and the user. It owns
//! everything about *where nodes are put on purpose*: named position
//! snapshots, undo/redo history, selection queries, and geometric
//! arrangement of a selection.
//!
//! ## Core Contract
//!
//! 1. The renderer is reached only through [`RendererGateway`]: the kernel
//!    posts fixed-position and simulation commands and never waits for them
//! 2. Every arrangement resolves the selection against live nodes, pins the
//!    planned coordinates, pulses the simulation, and commits a history entry
//! 3. Snapshots persist as id-sorted `{x, y}` records under normalized keys
//!
//! ## Architecture
//!
//! ```text
//! PointerEvent → LayoutSession → SelectionManager
//!                      ↓
//!              ArrangementEngine → RendererGateway
//!                      ↓
//!              DebouncedHistory      SnapshotStore (fs or memory)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same nodes + same spec + same config → identical placements
//! - Snapshot records and exports are id-sorted
//! - Fingerprints quantize coordinates before hashing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod config;
pub mod gateway;
pub mod store;
pub mod history;
pub mod selection;
pub mod arrange;
pub mod clipboard;
pub mod session;

// Re-exports
pub use types::{NodeId, GraphNode, Adjacency, Coordinate, NodePosition, PositionSnapshot, SelectionSet};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use config::{
    LayoutConfig, HistoryConfig, ArrangementConfig, SimulationPulse, ConfigError,
    ConfigHandle, ListenerId,
};
pub use gateway::{PositionCommand, SimulationCommand, RendererGateway, RecordingGateway};
pub use store::{
    SnapshotStore, SnapshotKey, SnapshotRecord, StoreError,
    FsSnapshotStore, InMemorySnapshotStore, sort_keys_recent_first,
};
pub use history::{HistoryStack, DebouncedHistory, DEFAULT_HISTORY_CAPACITY};
pub use selection::{Rect, RegionMode, SelectionManager};
pub use arrange::{
    ArrangementEngine, ArrangementSpec, Axis, CenterPolicy, Extremum, PlacedNode, Ring,
    centroid, plan_align, plan_move, plan_rings, plan_scale,
};
pub use clipboard::{ClipboardError, ExportedNode, ExportedLinks, export_positions, import_positions};
pub use session::{LayoutSession, SessionError, PointerEvent, Modifiers};

/// Default config version identifier.
pub const DEFAULT_CONFIG_VERSION: &str = "layout_config_v1";
