//! In-memory renderer for tests and headless embedding.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::types::{Adjacency, GraphNode, NodeId};
use super::{PositionCommand, RendererGateway, SimulationCommand};

/// A renderer that applies position commands to its own node table and
/// records every command it receives.
///
/// Nodes iterate in id order. Links may point at ids that have no live node,
/// which is how an unresolved link looks to the kernel.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    nodes: Mutex<BTreeMap<NodeId, GraphNode>>,
    /// Adjacency for every id mentioned by a link, live or not.
    links: Mutex<BTreeMap<NodeId, Adjacency>>,
    position_commands: Mutex<Vec<PositionCommand>>,
    simulation_commands: Mutex<Vec<SimulationCommand>>,
}

impl RecordingGateway {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a live node.
    pub fn add_node(&self, node: GraphNode) {
        let mut links = self.links.lock();
        let adj = links.entry(node.id.clone()).or_default();
        adj.forward.extend(node.forward_links.iter().cloned());
        adj.reverse.extend(node.reverse_links.iter().cloned());
        self.nodes.lock().insert(node.id.clone(), node);
    }

    /// Builder form of [`add_node`](Self::add_node).
    pub fn with_node(self, node: GraphNode) -> Self {
        self.add_node(node);
        self
    }

    /// Remove a live node. Its links stay in the link graph.
    pub fn unload_node(&self, id: &NodeId) -> Option<GraphNode> {
        self.nodes.lock().remove(id)
    }

    /// Record a link `from -> to`. Either end may be a non-live id.
    pub fn add_link(&self, from: impl Into<NodeId>, to: impl Into<NodeId>) {
        let from = from.into();
        let to = to.into();
        {
            let mut links = self.links.lock();
            links.entry(from.clone()).or_default().forward.insert(to.clone());
            links.entry(to.clone()).or_default().reverse.insert(from.clone());
        }
        let mut nodes = self.nodes.lock();
        if let Some(n) = nodes.get_mut(&from) {
            n.forward_links.insert(to.clone());
        }
        if let Some(n) = nodes.get_mut(&to) {
            n.reverse_links.insert(from);
        }
    }

    /// Builder form of [`add_link`](Self::add_link).
    pub fn with_link(self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        self.add_link(from, to);
        self
    }

    /// Drain recorded position commands.
    pub fn take_position_commands(&self) -> Vec<PositionCommand> {
        std::mem::take(&mut *self.position_commands.lock())
    }

    /// Recorded position commands (not drained).
    pub fn position_commands(&self) -> Vec<PositionCommand> {
        self.position_commands.lock().clone()
    }

    /// Recorded simulation commands (not drained).
    pub fn simulation_commands(&self) -> Vec<SimulationCommand> {
        self.simulation_commands.lock().clone()
    }

    /// Forget all recorded commands.
    pub fn clear_commands(&self) {
        self.position_commands.lock().clear();
        self.simulation_commands.lock().clear();
    }

    /// Number of live nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.lock().len()
    }
}

impl RendererGateway for RecordingGateway {
    fn post_position_command(&self, command: PositionCommand) {
        if let Some(node) = self.nodes.lock().get_mut(&command.id) {
            node.x = command.x;
            node.y = command.y;
            node.fx = command.fx;
            node.fy = command.fy;
        }
        self.position_commands.lock().push(command);
    }

    fn post_simulation_command(&self, command: SimulationCommand) {
        self.simulation_commands.lock().push(command);
    }

    fn live_nodes(&self) -> Vec<GraphNode> {
        self.nodes.lock().values().cloned().collect()
    }

    fn adjacency(&self, id: &NodeId) -> Adjacency {
        self.links.lock().get(id).cloned().unwrap_or_default()
    }

    fn node(&self, id: &NodeId) -> Option<GraphNode> {
        self.nodes.lock().get(id).cloned()
    }
}
