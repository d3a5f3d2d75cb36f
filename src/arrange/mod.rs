//! Geometric transforms over a node selection.
//!
//! ## Contract
//!
//! Each operation resolves the selection against the renderer's live nodes,
//! plans target coordinates (see [`plan`]), then:
//!
//! 1. posts one fixed-position command per planned node
//! 2. posts a short simulation pulse so the view settles
//! 3. commits the resulting positions to history (debounced)
//!
//! A degenerate input plans nothing, and then nothing is posted or
//! committed.

pub mod plan;

use std::collections::{HashMap, HashSet};

use crate::config::{ArrangementConfig, SimulationPulse};
use crate::gateway::{PositionCommand, RendererGateway, SimulationCommand};
use crate::history::DebouncedHistory;
use crate::types::{GraphNode, NodeId, NodePosition, PositionSnapshot};

pub use plan::{
    ArrangementSpec, Axis, CenterPolicy, Extremum, PlacedNode, Ring,
    centroid, plan_align, plan_move, plan_rings, plan_scale,
};

/// Applies planned placements through a renderer gateway.
#[derive(Debug, Clone, Default)]
pub struct ArrangementEngine {
    config: ArrangementConfig,
    pulse: SimulationPulse,
}

impl ArrangementEngine {
    /// Create an engine.
    pub fn new(config: ArrangementConfig, pulse: SimulationPulse) -> Self {
        Self { config, pulse }
    }

    /// Arrangement settings.
    pub fn config(&self) -> &ArrangementConfig {
        &self.config
    }

    /// Translate the nodes by `(dx, dy)`. Returns the number moved.
    pub fn move_nodes<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        ids: &[NodeId],
        dx: f64,
        dy: f64,
    ) -> usize {
        let nodes = resolve(gateway, ids);
        self.apply_plan(gateway, history, plan_move(&nodes, dx, dy))
    }

    /// Scale the nodes around their centroid. Returns the number moved.
    pub fn scale_around_centroid<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        ids: &[NodeId],
        ratio: f64,
    ) -> usize {
        let nodes = resolve(gateway, ids);
        self.apply_plan(gateway, history, plan_scale(&nodes, ratio))
    }

    /// Align one axis of the nodes to its min or max. Returns the number moved.
    pub fn align<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        ids: &[NodeId],
        axis: Axis,
        extremum: Extremum,
    ) -> usize {
        let nodes = resolve(gateway, ids);
        self.apply_plan(gateway, history, plan_align(&nodes, axis, extremum))
    }

    /// Arrange the nodes in rings around the heaviest one. Returns the
    /// number moved (the center is never moved).
    pub fn arrange_in_rings<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        ids: &[NodeId],
        spec: &ArrangementSpec,
    ) -> usize {
        let nodes = resolve(gateway, ids);
        let plan = plan_rings(&nodes, spec, &self.config);
        tracing::debug!(
            nodes = nodes.len(),
            placed = plan.len(),
            radius = ?spec.radius,
            "Ring arrangement planned"
        );
        self.apply_plan(gateway, history, plan)
    }

    /// Unpin the nodes so the simulation moves them again.
    pub fn release<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        ids: &[NodeId],
    ) -> usize {
        let nodes = resolve(gateway, ids);
        if nodes.is_empty() {
            return 0;
        }
        for n in &nodes {
            gateway.post_position_command(PositionCommand::release(n.id.clone(), n.coordinate()));
        }
        gateway.post_simulation_command(SimulationCommand::pulse(&self.pulse));

        let released: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let snapshot = gateway
            .live_nodes()
            .into_iter()
            .filter(|n| n.is_fixed() && !released.contains(&n.id))
            .map(|n| (n.id, NodePosition { x: n.x, y: n.y, fx: n.fx, fy: n.fy }))
            .collect();
        history.commit(snapshot);
        nodes.len()
    }

    /// Pin every planned node, pulse, and commit. Returns the number placed.
    ///
    /// Shared tail of every transform; also used to apply a loaded layout.
    pub fn apply_plan<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        plan: Vec<PlacedNode>,
    ) -> usize {
        if plan.is_empty() {
            tracing::trace!("Degenerate arrangement input; nothing to do");
            return 0;
        }
        for p in &plan {
            gateway.post_position_command(PositionCommand::pin(p.id.clone(), p.at));
        }
        self.settle(gateway, history, &plan);
        plan.len()
    }

    /// Pulse the simulation and commit the positions `placed` already posted.
    pub fn settle<G: RendererGateway + ?Sized>(
        &self,
        gateway: &G,
        history: &mut DebouncedHistory,
        placed: &[PlacedNode],
    ) {
        gateway.post_simulation_command(SimulationCommand::pulse(&self.pulse));
        history.commit(resulting_snapshot(gateway, placed));
    }
}

/// Live nodes for `ids`, in `ids` order. Unknown ids are dropped.
pub fn resolve<G: RendererGateway + ?Sized>(gateway: &G, ids: &[NodeId]) -> Vec<GraphNode> {
    if ids.is_empty() {
        return Vec::new();
    }
    let mut live: HashMap<NodeId, GraphNode> =
        gateway.live_nodes().into_iter().map(|n| (n.id.clone(), n)).collect();
    ids.iter().filter_map(|id| live.remove(id)).collect()
}

/// Pinned positions after `plan` lands: every node the renderer already
/// reports as fixed, overlaid with the planned placements.
///
/// Built from the plan rather than read back from the renderer, since the
/// renderer applies commands asynchronously. Free nodes are left out; a
/// history entry records explicitly placed nodes only.
fn resulting_snapshot<G: RendererGateway + ?Sized>(gateway: &G, plan: &[PlacedNode]) -> PositionSnapshot {
    let mut snapshot = PositionSnapshot::capture_pinned(&gateway.live_nodes());
    for p in plan {
        snapshot = snapshot.with(p.id.clone(), NodePosition::fixed(p.at.x, p.at.y));
    }
    snapshot
}
