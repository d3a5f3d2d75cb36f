//! The renderer boundary.
//!
//! The kernel never touches sprites, screen transforms or the physics
//! worker directly. Everything it needs from the renderer goes through
//! [`RendererGateway`], implemented by the host-specific view adapter.
//! Commands are fire-and-forget: there is no acknowledgment and the kernel
//! never waits for a command to be applied.

pub mod recording;

use serde::{Deserialize, Serialize};

use crate::config::SimulationPulse;
use crate::types::{Adjacency, Coordinate, GraphNode, NodeId};

pub use recording::RecordingGateway;

/// Request to move a node, optionally pinning it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCommand {
    /// Target node.
    pub id: NodeId,
    /// New x.
    pub x: f64,
    /// New y.
    pub y: f64,
    /// Pinned x (`None` releases the pin).
    pub fx: Option<f64>,
    /// Pinned y (`None` releases the pin).
    pub fy: Option<f64>,
}

impl PositionCommand {
    /// Move `id` to `at` and pin it there.
    pub fn pin(id: NodeId, at: Coordinate) -> Self {
        Self { id, x: at.x, y: at.y, fx: Some(at.x), fy: Some(at.y) }
    }

    /// Leave `id` at `at` but let the simulation move it again.
    pub fn release(id: NodeId, at: Coordinate) -> Self {
        Self { id, x: at.x, y: at.y, fx: None, fy: None }
    }

    /// Target coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }
}

/// Start, stop, or perturb the physics simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationCommand {
    /// Whether the simulation should run.
    pub run: bool,
    /// Alpha (energy) to set.
    pub alpha: f64,
    /// Alpha decay; `None` keeps the simulation's current decay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_decay: Option<f64>,
    /// Alpha the simulation settles towards.
    pub alpha_target: f64,
}

impl SimulationCommand {
    /// A short kick so the renderer settles freshly placed nodes.
    pub fn pulse(pulse: &SimulationPulse) -> Self {
        Self {
            run: true,
            alpha: pulse.alpha,
            alpha_decay: pulse.alpha_decay,
            alpha_target: pulse.alpha_target,
        }
    }

    /// Halt the simulation.
    pub fn stop() -> Self {
        Self { run: false, alpha: 0.0, alpha_decay: None, alpha_target: 0.0 }
    }
}

/// Capabilities the kernel needs from a renderer.
pub trait RendererGateway {
    /// Post a position command. Fire-and-forget.
    fn post_position_command(&self, command: PositionCommand);

    /// Post a simulation control command. Fire-and-forget.
    fn post_simulation_command(&self, command: SimulationCommand);

    /// All nodes currently loaded in the view.
    fn live_nodes(&self) -> Vec<GraphNode>;

    /// Links of `id` in the link graph.
    ///
    /// May name nodes that are not live (unresolved or unloaded). Unknown
    /// ids return an empty adjacency.
    fn adjacency(&self, id: &NodeId) -> Adjacency;

    /// Live lookup of a single node.
    fn node(&self, id: &NodeId) -> Option<GraphNode> {
        self.live_nodes().into_iter().find(|n| &n.id == id)
    }
}
