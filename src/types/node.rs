//! Node types for the layout kernel.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Unique identifier for a node in the graph view.
///
/// Opaque and stable across sessions (typically a note path). Implements
/// `Ord` so that every ordered structure in the kernel is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Forward and reverse links of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    /// Nodes this node links to.
    pub forward: BTreeSet<NodeId>,
    /// Nodes that link to this node.
    pub reverse: BTreeSet<NodeId>,
}

impl Adjacency {
    /// Iterate over forward then reverse neighbours.
    ///
    /// A node that is both a forward and reverse neighbour is yielded twice;
    /// callers that need uniqueness track visited ids themselves.
    pub fn neighbours(&self) -> impl Iterator<Item = &NodeId> {
        self.forward.iter().chain(self.reverse.iter())
    }

    /// True if the node has no links in either direction.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}

/// A live node as reported by the renderer.
///
/// The kernel never owns node identity; it reads these to compute targets
/// and asks the renderer to move nodes through the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier.
    pub id: NodeId,
    /// Current x coordinate in world space.
    pub x: f64,
    /// Current y coordinate in world space.
    pub y: f64,
    /// Pinned x coordinate, if the node is fixed.
    #[serde(default)]
    pub fx: Option<f64>,
    /// Pinned y coordinate, if the node is fixed.
    #[serde(default)]
    pub fy: Option<f64>,
    /// Node weight (degree or any importance measure).
    pub weight: f64,
    /// Display color as a packed RGB integer.
    #[serde(default)]
    pub color: Option<u32>,
    /// Nodes this node links to.
    #[serde(default)]
    pub forward_links: BTreeSet<NodeId>,
    /// Nodes that link to this node.
    #[serde(default)]
    pub reverse_links: BTreeSet<NodeId>,
    /// Host metadata (frontmatter fields).
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    /// Create a new unlinked node.
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            fx: None,
            fy: None,
            weight,
            color: None,
            forward_links: BTreeSet::new(),
            reverse_links: BTreeSet::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set the display color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Attach a metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Current coordinate.
    pub fn coordinate(&self) -> super::Coordinate {
        super::Coordinate::new(self.x, self.y)
    }

    /// True if the renderer reports the node as pinned on both axes.
    pub fn is_fixed(&self) -> bool {
        self.fx.is_some() && self.fy.is_some()
    }

    /// Links of this node as an [`Adjacency`].
    pub fn adjacency(&self) -> Adjacency {
        Adjacency {
            forward: self.forward_links.clone(),
            reverse: self.reverse_links.clone(),
        }
    }
}
