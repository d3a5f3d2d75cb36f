//! One interactive graph view's layout state.
//!
//! [`LayoutSession`] ties the pieces together: it resolves the current
//! selection against the renderer, runs arrangement operations, keeps the
//! undo history, and persists named layouts through a [`SnapshotStore`].
//!
//! ```text
//! PointerEvent ──► handle_pointer ──► SelectionManager
//!                        │
//!                        ▼
//!              ArrangementEngine ──► RendererGateway (pin, pulse)
//!                        │
//!                        ▼
//!               DebouncedHistory     SnapshotStore (save/load)
//! ```
//!
//! Every view owns its own session. Dropping it cancels any pending
//! history commit.

use tokio::runtime::Handle;

use crate::arrange::{resolve, ArrangementEngine, ArrangementSpec, Axis, Extremum, PlacedNode};
use crate::clipboard::{self, ClipboardError};
use crate::config::{ConfigError, LayoutConfig};
use crate::gateway::{PositionCommand, RendererGateway, SimulationCommand};
use crate::history::DebouncedHistory;
use crate::selection::{Rect, SelectionManager};
use crate::store::{sort_keys_recent_first, SnapshotKey, SnapshotStore, StoreError};
use crate::types::{NodeId, PositionSnapshot, SelectionSet};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Snapshot storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Clipboard import or export failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A selection pattern did not compile.
    #[error("Invalid selection pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift: toggle on press, additive on region select.
    pub shift: bool,
    /// Alt: subtractive on region select.
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, alt: false };
    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, alt: false };
    /// Alt only.
    pub const ALT: Self = Self { shift: false, alt: true };
}

/// Pointer input the session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// A node was pressed.
    NodePressed {
        /// Pressed node.
        id: NodeId,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// A pressed node was dragged by `(dx, dy)` since the last delta.
    DragDelta {
        /// Dragged node.
        id: NodeId,
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
    },
    /// The drag gesture finished.
    DragEnded {
        /// Dragged node.
        id: NodeId,
    },
    /// Empty canvas was pressed.
    BackgroundPressed,
    /// A rubber-band region was released.
    RegionReleased {
        /// Region in world coordinates.
        rect: Rect,
        /// Modifiers held.
        modifiers: Modifiers,
    },
}

/// Layout state for one graph view.
#[derive(Debug)]
pub struct LayoutSession<G, S> {
    config: LayoutConfig,
    gateway: G,
    store: S,
    history: DebouncedHistory,
    selection: SelectionManager,
    engine: ArrangementEngine,
    active_key: Option<SnapshotKey>,
}

impl<G: RendererGateway, S: SnapshotStore> LayoutSession<G, S> {
    /// Create a session. History timers run on `runtime`.
    pub fn new(config: LayoutConfig, gateway: G, store: S, runtime: Handle) -> Result<Self, SessionError> {
        config.validate()?;
        let history = DebouncedHistory::new(&config.history, runtime);
        let engine = ArrangementEngine::new(config.arrangement.clone(), config.pulse.clone());
        tracing::debug!(params_hash = %config.params_hash(), "Layout session created");
        Ok(Self {
            config,
            gateway,
            store,
            history,
            selection: SelectionManager::new(),
            engine,
            active_key: None,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Swap in a new configuration.
    ///
    /// Arrangement settings and the simulation pulse apply to the next
    /// operation. History keeps its entries: a smaller capacity evicts the
    /// oldest, and a commit already waiting keeps its deadline. An invalid
    /// config is rejected and the current one stays.
    pub fn reconfigure(&mut self, config: LayoutConfig) -> Result<(), SessionError> {
        config.validate()?;
        self.history.reconfigure(&config.history);
        self.engine = ArrangementEngine::new(config.arrangement.clone(), config.pulse.clone());
        tracing::debug!(params_hash = %config.params_hash(), "Layout session reconfigured");
        self.config = config;
        Ok(())
    }

    /// The renderer.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The snapshot store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Undo history.
    pub fn history(&self) -> &DebouncedHistory {
        &self.history
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionSet {
        self.selection.selection()
    }

    /// Key of the layout last saved or loaded.
    pub fn active_key(&self) -> Option<&SnapshotKey> {
        self.active_key.as_ref()
    }

    // ---- pointer ----

    /// React to one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::NodePressed { id, modifiers } => {
                if modifiers.shift {
                    self.selection.toggle(id);
                } else if !self.selection.selection().contains(&id) {
                    self.selection.set([id]);
                }
            }
            PointerEvent::DragDelta { id, dx, dy } => {
                let ids = if self.selection.selection().contains(&id) {
                    self.selection.selection().ids().to_vec()
                } else {
                    vec![id]
                };
                self.engine.move_nodes(&self.gateway, &mut self.history, &ids, dx, dy);
            }
            PointerEvent::DragEnded { id } => {
                if self.history.flush() {
                    tracing::trace!(id = %id, "Drag committed to history");
                }
            }
            PointerEvent::BackgroundPressed => self.selection.clear(),
            PointerEvent::RegionReleased { rect, modifiers } => {
                let live = self.gateway.live_nodes();
                self.selection.select_by_region(&live, rect, modifiers.shift, modifiers.alt);
            }
        }
    }

    // ---- selection ----

    /// Replace the selection.
    pub fn set_selection<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) -> &SelectionSet {
        self.selection.set(ids)
    }

    /// Flip one node's membership. Returns true if it is now selected.
    pub fn toggle_selected(&mut self, id: NodeId) -> bool {
        self.selection.toggle(id)
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every live node.
    pub fn select_all(&mut self) -> &SelectionSet {
        let live = self.gateway.live_nodes();
        self.selection.select_all(&live)
    }

    /// Select live nodes inside `rect`.
    pub fn select_by_region(&mut self, rect: Rect, additive: bool, subtractive: bool) -> &SelectionSet {
        let live = self.gateway.live_nodes();
        self.selection.select_by_region(&live, rect, additive, subtractive)
    }

    /// Select live nodes whose id matches `pattern`.
    pub fn select_by_regex(&mut self, pattern: &str) -> Result<&SelectionSet, SessionError> {
        let live = self.gateway.live_nodes();
        Ok(self.selection.select_by_regex(&live, pattern)?)
    }

    /// Grow the selection `depth` link hops.
    pub fn select_related(&mut self, depth: usize) -> &SelectionSet {
        self.selection.select_related(&self.gateway, depth)
    }

    /// Add nodes linking to the selection.
    pub fn select_backlinks(&mut self) -> &SelectionSet {
        self.selection.select_backlinks(&self.gateway)
    }

    /// Add nodes the selection links to.
    pub fn select_outgoing_links(&mut self) -> &SelectionSet {
        self.selection.select_outgoing_links(&self.gateway)
    }

    /// Select live nodes that are (`fixed`) or are not recorded in the
    /// active history entry.
    pub fn select_by_position_type(&mut self, fixed: bool) -> &SelectionSet {
        let live = self.gateway.live_nodes();
        let entry = self.history.current();
        self.selection.select_by_position_type(&live, entry.as_ref(), fixed)
    }

    // ---- arrangement ----

    /// Translate the selection.
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> usize {
        let ids = self.selection.selection().ids();
        self.engine.move_nodes(&self.gateway, &mut self.history, ids, dx, dy)
    }

    /// Scale the selection around its centroid.
    pub fn scale_selected(&mut self, ratio: f64) -> usize {
        let ids = self.selection.selection().ids();
        self.engine.scale_around_centroid(&self.gateway, &mut self.history, ids, ratio)
    }

    /// Align the selection on one axis.
    pub fn align_selected(&mut self, axis: Axis, extremum: Extremum) -> usize {
        let ids = self.selection.selection().ids();
        self.engine.align(&self.gateway, &mut self.history, ids, axis, extremum)
    }

    /// Arrange the selection in rings. `radius` overrides the outer radius.
    pub fn arrange_selected_in_rings(&mut self, radius: Option<f64>) -> usize {
        let mut spec = ArrangementSpec::from_config(&self.config.arrangement);
        if let Some(r) = radius {
            spec = spec.with_radius(r);
        }
        let ids = self.selection.selection().ids();
        self.engine.arrange_in_rings(&self.gateway, &mut self.history, ids, &spec)
    }

    /// Unpin the selection.
    pub fn release_selected(&mut self) -> usize {
        let ids = self.selection.selection().ids();
        self.engine.release(&self.gateway, &mut self.history, ids)
    }

    // ---- history ----

    /// Step back and apply the entry. Nothing is committed.
    pub fn undo(&mut self) -> Option<PositionSnapshot> {
        let entry = self.history.undo()?;
        self.restore(&entry);
        Some(entry)
    }

    /// Step forward and apply the entry. Nothing is committed.
    pub fn redo(&mut self) -> Option<PositionSnapshot> {
        let entry = self.history.redo()?;
        self.restore(&entry);
        Some(entry)
    }

    /// Pin live nodes recorded in `entry`; release pinned ones it lacks.
    fn restore(&self, entry: &PositionSnapshot) {
        let mut pinned = 0usize;
        let mut released = 0usize;
        for node in self.gateway.live_nodes() {
            match entry.get(&node.id) {
                Some(pos) => {
                    self.gateway.post_position_command(PositionCommand::pin(node.id, pos.coordinate()));
                    pinned += 1;
                }
                None if node.is_fixed() => {
                    let at = node.coordinate();
                    self.gateway.post_position_command(PositionCommand::release(node.id, at));
                    released += 1;
                }
                None => {}
            }
        }
        self.gateway
            .post_simulation_command(SimulationCommand::pulse(&self.config.pulse));
        tracing::debug!(pinned, released, index = self.history.index(), "History entry restored");
    }

    // ---- snapshots ----

    /// Positions of every live node.
    pub fn capture(&self) -> PositionSnapshot {
        PositionSnapshot::capture(&self.gateway.live_nodes())
    }

    /// Save the live layout under `key` (a fresh timestamp key if `None`).
    ///
    /// Nodes missing from the view keep the coordinates stored under
    /// `previous_key`, or under the active layout when `previous_key` is
    /// `None`.
    pub async fn save_layout(
        &mut self,
        key: Option<&str>,
        previous_key: Option<&str>,
    ) -> Result<SnapshotKey, SessionError> {
        let key = key.map_or_else(SnapshotKey::now, SnapshotKey::normalize);
        let previous = previous_key.or_else(|| self.active_key.as_ref().map(SnapshotKey::as_str));
        let positions = self.capture();
        let stored = self.store.save(key.as_str(), &positions, previous).await?;
        self.active_key = Some(stored.clone());
        Ok(stored)
    }

    /// Pin every live node recorded under `key` and commit.
    ///
    /// Returns the number of nodes placed. Recorded nodes that are not
    /// live are ignored; an unknown key places nothing.
    pub async fn load_layout(&mut self, key: &str) -> Result<usize, SessionError> {
        let snapshot = self.store.load(key).await?;
        let plan: Vec<PlacedNode> = self
            .gateway
            .live_nodes()
            .into_iter()
            .filter_map(|n| snapshot.get(&n.id).map(|p| PlacedNode::new(n.id, p.coordinate())))
            .collect();
        let placed = self.engine.apply_plan(&self.gateway, &mut self.history, plan);
        self.active_key = Some(SnapshotKey::normalize(key));
        tracing::info!(key, recorded = snapshot.len(), placed, "Layout loaded");
        Ok(placed)
    }

    /// Stored layout keys, newest first.
    pub async fn list_layouts(&self) -> Result<Vec<SnapshotKey>, SessionError> {
        let mut keys = self.store.list_keys().await?;
        sort_keys_recent_first(&mut keys);
        Ok(keys)
    }

    /// Delete a stored layout. Returns false if it did not exist.
    pub async fn delete_layout(&mut self, key: &str) -> Result<bool, SessionError> {
        let key = SnapshotKey::normalize(key);
        if self.active_key.as_ref() == Some(&key) {
            self.active_key = None;
        }
        Ok(self.store.delete(&key).await?)
    }

    // ---- clipboard ----

    /// Export the selection as clipboard JSON.
    pub fn export_selected(&self) -> Result<String, SessionError> {
        let nodes = resolve(&self.gateway, self.selection.selection().ids());
        Ok(clipboard::export_positions(&nodes, &self.config.tracked_metadata_fields)?)
    }

    /// Import clipboard JSON, pin the listed nodes, pulse and commit.
    ///
    /// On a malformed entry the error is returned and nothing is committed;
    /// entries before it stay applied.
    pub fn import(&mut self, text: &str) -> Result<usize, SessionError> {
        let applied = clipboard::import_positions(&self.gateway, text)?;
        if !applied.is_empty() {
            self.engine.settle(&self.gateway, &mut self.history, &applied);
        }
        Ok(applied.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::gateway::RecordingGateway;
    use crate::store::InMemorySnapshotStore;
    use crate::types::{Coordinate, GraphNode};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn session(debounce_ms: u64) -> LayoutSession<RecordingGateway, InMemorySnapshotStore> {
        let config = LayoutConfig {
            history: HistoryConfig { capacity: 100, debounce_ms },
            ..LayoutConfig::default()
        };
        let gateway = RecordingGateway::new()
            .with_node(GraphNode::new("a", 0.0, 0.0, 1.0))
            .with_node(GraphNode::new("b", 50.0, 50.0, 1.0))
            .with_node(GraphNode::new("c", 200.0, 200.0, 1.0))
            .with_link("a", "b");
        LayoutSession::new(config, gateway, InMemorySnapshotStore::new(), Handle::current()).unwrap()
    }

    fn at(s: &LayoutSession<RecordingGateway, InMemorySnapshotStore>, name: &str) -> Coordinate {
        s.gateway().node(&id(name)).unwrap().coordinate()
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = LayoutConfig::default();
        config.history.capacity = 0;
        let result = LayoutSession::new(
            config,
            RecordingGateway::new(),
            InMemorySnapshotStore::new(),
            Handle::current(),
        );
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[tokio::test]
    async fn test_press_selects_and_shift_toggles() {
        let mut s = session(0);
        s.handle_pointer(PointerEvent::NodePressed { id: id("a"), modifiers: Modifiers::NONE });
        s.handle_pointer(PointerEvent::NodePressed { id: id("b"), modifiers: Modifiers::SHIFT });
        assert_eq!(s.selection().ids(), &[id("a"), id("b")]);

        // Plain press on a selected node keeps the group for dragging.
        s.handle_pointer(PointerEvent::NodePressed { id: id("a"), modifiers: Modifiers::NONE });
        assert_eq!(s.selection().len(), 2);

        s.handle_pointer(PointerEvent::NodePressed { id: id("c"), modifiers: Modifiers::NONE });
        assert_eq!(s.selection().ids(), &[id("c")]);

        s.handle_pointer(PointerEvent::NodePressed { id: id("c"), modifiers: Modifiers::SHIFT });
        assert!(s.selection().is_empty());
    }

    #[tokio::test]
    async fn test_drag_moves_group_and_commits_on_end() {
        let mut s = session(300);
        s.set_selection([id("a"), id("b")]);
        s.handle_pointer(PointerEvent::DragDelta { id: id("a"), dx: 5.0, dy: 0.0 });
        s.handle_pointer(PointerEvent::DragDelta { id: id("a"), dx: 5.0, dy: 0.0 });
        assert!(s.history().is_empty());
        s.handle_pointer(PointerEvent::DragEnded { id: id("a") });

        assert_eq!(s.history().len(), 1);
        assert_eq!(at(&s, "a"), Coordinate::new(10.0, 0.0));
        assert_eq!(at(&s, "b"), Coordinate::new(60.0, 50.0));
        assert_eq!(at(&s, "c"), Coordinate::new(200.0, 200.0));
    }

    #[tokio::test]
    async fn test_drag_unselected_moves_only_that_node() {
        let mut s = session(0);
        s.set_selection([id("a"), id("b")]);
        s.handle_pointer(PointerEvent::DragDelta { id: id("c"), dx: -10.0, dy: 0.0 });
        assert_eq!(at(&s, "c"), Coordinate::new(190.0, 200.0));
        assert_eq!(at(&s, "a"), Coordinate::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn test_region_and_background() {
        let mut s = session(0);
        let rect = Rect::from_corners(Coordinate::new(0.0, 0.0), Coordinate::new(100.0, 100.0));
        s.handle_pointer(PointerEvent::RegionReleased { rect, modifiers: Modifiers::NONE });
        assert_eq!(s.selection().len(), 2);

        let small = Rect::from_corners(Coordinate::new(-1.0, -1.0), Coordinate::new(1.0, 1.0));
        s.handle_pointer(PointerEvent::RegionReleased { rect: small, modifiers: Modifiers::ALT });
        assert_eq!(s.selection().ids(), &[id("b")]);

        s.handle_pointer(PointerEvent::BackgroundPressed);
        assert!(s.selection().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pattern_keeps_selection() {
        let mut s = session(0);
        s.set_selection([id("a")]);
        assert!(matches!(s.select_by_regex("(unclosed"), Err(SessionError::Pattern(_))));
        assert_eq!(s.selection().ids(), &[id("a")]);
        assert_eq!(s.select_by_regex("^[bc]$").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_undo_restores_and_does_not_commit() {
        let mut s = session(0);
        s.set_selection([id("a")]);
        s.move_selected(10.0, 0.0);
        s.move_selected(10.0, 0.0);
        assert_eq!(s.history().len(), 2);

        let entry = s.undo().unwrap();
        assert_eq!(entry.get(&id("a")).unwrap().coordinate(), Coordinate::new(10.0, 0.0));
        assert_eq!(at(&s, "a"), Coordinate::new(10.0, 0.0));
        assert_eq!(s.history().len(), 2);

        s.redo().unwrap();
        assert_eq!(at(&s, "a"), Coordinate::new(20.0, 0.0));
        assert!(s.redo().is_none());
    }

    #[tokio::test]
    async fn test_undo_releases_nodes_pinned_later() {
        let mut s = session(0);
        s.set_selection([id("a")]);
        s.move_selected(1.0, 1.0);
        s.set_selection([id("b")]);
        s.move_selected(1.0, 1.0);
        assert!(s.gateway().node(&id("b")).unwrap().is_fixed());

        s.undo().unwrap();
        assert!(!s.gateway().node(&id("b")).unwrap().is_fixed());
        assert!(s.gateway().node(&id("a")).unwrap().is_fixed());
    }

    #[tokio::test]
    async fn test_position_type_follows_history() {
        let mut s = session(0);
        assert!(s.select_by_position_type(true).is_empty());
        s.set_selection([id("c")]);
        s.move_selected(1.0, 0.0);
        assert_eq!(s.select_by_position_type(true).ids(), &[id("c")]);
        assert_eq!(s.select_by_position_type(false).len(), 2);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let mut s = session(0);
        let key = s.save_layout(Some("first"), None).await.unwrap();
        assert_eq!(s.active_key(), Some(&key));

        s.select_all();
        s.move_selected(100.0, 100.0);
        let placed = s.load_layout("first").await.unwrap();
        assert_eq!(placed, 3);
        assert_eq!(at(&s, "b"), Coordinate::new(50.0, 50.0));
        assert!(s.gateway().node(&id("b")).unwrap().is_fixed());
        assert_eq!(s.history().len(), 2);
    }

    #[tokio::test]
    async fn test_save_fills_unloaded_from_active_layout() {
        let mut s = session(0);
        s.save_layout(Some("first"), None).await.unwrap();
        s.load_layout("first").await.unwrap();

        s.gateway().unload_node(&id("b"));
        s.select_all();
        s.move_selected(10.0, 0.0);
        let second = s.save_layout(Some("second"), None).await.unwrap();

        let stored = s.store().load(second.as_str()).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored.get(&id("b")).unwrap().coordinate(), Coordinate::new(50.0, 50.0));
        assert_eq!(stored.get(&id("a")).unwrap().coordinate(), Coordinate::new(10.0, 0.0));
        assert_eq!(s.active_key(), Some(&second));
    }

    #[tokio::test]
    async fn test_reconfigure_applies_handle_updates() {
        use crate::config::ConfigHandle;
        use parking_lot::Mutex;
        use std::sync::Arc;

        let mut s = session(0);
        let mut handle = ConfigHandle::new(s.config().clone());
        let latest: Arc<Mutex<Option<LayoutConfig>>> = Arc::default();
        let sink = Arc::clone(&latest);
        handle.subscribe(move |config| *sink.lock() = Some(config.clone()));

        handle.update(|c| c.arrangement.triangle_side = 40.0).unwrap();
        let changed = latest.lock().take().unwrap();
        s.reconfigure(changed).unwrap();
        assert_eq!(s.config().arrangement.triangle_side, 40.0);

        s.select_all();
        s.arrange_selected_in_rings(None);
        let d = at(&s, "a").distance_to(&at(&s, "b"));
        assert!((d - 40.0).abs() < 1e-9, "side {d}");

        let mut invalid = s.config().clone();
        invalid.history.capacity = 0;
        assert!(matches!(s.reconfigure(invalid), Err(SessionError::Config(_))));
        assert_eq!(s.config().arrangement.triangle_side, 40.0);
    }

    #[tokio::test]
    async fn test_load_unknown_key_places_nothing() {
        let mut s = session(0);
        assert_eq!(s.load_layout("nope").await.unwrap(), 0);
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn test_list_layouts_newest_first() {
        let mut s = session(0);
        s.save_layout(Some("2024-01-01T00:00:00Z"), None).await.unwrap();
        s.save_layout(Some("2025-06-01T00:00:00Z"), None).await.unwrap();
        let keys = s.list_layouts().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].timestamp() > keys[1].timestamp());

        assert!(s.delete_layout("2025-06-01T00:00:00Z").await.unwrap());
        assert_eq!(s.list_layouts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clipboard_round_trip() {
        let mut s = session(0);
        s.set_selection([id("a"), id("b")]);
        let text = s.export_selected().unwrap();

        s.select_all();
        s.move_selected(7.0, 7.0);
        assert_eq!(s.import(&text).unwrap(), 2);
        assert_eq!(at(&s, "a"), Coordinate::new(0.0, 0.0));
        assert_eq!(at(&s, "c"), Coordinate::new(207.0, 207.0));
        assert_eq!(s.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_import_does_not_commit() {
        let mut s = session(0);
        let err = s.import(r#"{"a": {"x": 1, "y": 1}, "b": {}}"#).unwrap_err();
        assert!(matches!(err, SessionError::Clipboard(ClipboardError::MalformedEntry { .. })));
        assert_eq!(at(&s, "a"), Coordinate::new(1.0, 1.0));
        assert!(s.history().is_empty());
        assert!(s.gateway().simulation_commands().is_empty());
    }
}
