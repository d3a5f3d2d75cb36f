//! Pure placement planning.
//!
//! Every function here maps an ordered node list to target coordinates and
//! touches nothing else. An empty plan means "degenerate input, do nothing".

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::ArrangementConfig;
use crate::types::{Coordinate, GraphNode, NodeId};

/// A node and the coordinate it should be pinned at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    /// Node to move.
    pub id: NodeId,
    /// Target coordinate.
    pub at: Coordinate,
}

impl PlacedNode {
    /// Create a placement.
    pub fn new(id: NodeId, at: Coordinate) -> Self {
        Self { id, at }
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Which end of the range to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

/// How the center node of a ring arrangement is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CenterPolicy {
    /// Highest weight wins; ties go to the earliest node.
    #[default]
    MaxWeight,
}

/// Ring a peripheral node is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ring {
    /// Close to the center.
    Inner,
    /// Around the inner ring.
    Outer,
}

/// Parameters of one ring arrangement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrangementSpec {
    /// Center selection.
    #[serde(default)]
    pub center_policy: CenterPolicy,
    /// Id substrings that classify a node as inner ring.
    #[serde(default)]
    pub inner_ring_markers: Vec<String>,
    /// Explicit outer radius (triangle side for three nodes).
    #[serde(default)]
    pub radius: Option<f64>,
}

impl ArrangementSpec {
    /// Spec using the markers from config and no explicit radius.
    pub fn from_config(config: &ArrangementConfig) -> Self {
        Self {
            center_policy: CenterPolicy::MaxWeight,
            inner_ring_markers: config.inner_ring_markers.clone(),
            radius: None,
        }
    }

    /// Set an explicit radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the inner ring markers.
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner_ring_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Ring for `id`.
    pub fn classify(&self, id: &NodeId) -> Ring {
        if self.inner_ring_markers.iter().any(|m| !m.is_empty() && id.as_str().contains(m.as_str())) {
            Ring::Inner
        } else {
            Ring::Outer
        }
    }

    /// The explicit radius if it is usable.
    fn explicit_radius(&self) -> Option<f64> {
        self.radius.filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Translate every node by `(dx, dy)`.
pub fn plan_move(nodes: &[GraphNode], dx: f64, dy: f64) -> Vec<PlacedNode> {
    if nodes.is_empty() || !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
        return Vec::new();
    }
    nodes
        .iter()
        .map(|n| PlacedNode::new(n.id.clone(), n.coordinate().offset(dx, dy)))
        .collect()
}

/// Arithmetic mean of the node coordinates.
pub fn centroid(nodes: &[GraphNode]) -> Option<Coordinate> {
    if nodes.is_empty() {
        return None;
    }
    let n = nodes.len() as f64;
    let (sx, sy) = nodes.iter().fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    Some(Coordinate::new(sx / n, sy / n))
}

/// Scale positions around their centroid.
///
/// Empty, single-node, zero and non-finite ratios plan nothing.
pub fn plan_scale(nodes: &[GraphNode], ratio: f64) -> Vec<PlacedNode> {
    if nodes.len() < 2 || !ratio.is_finite() || ratio == 0.0 {
        return Vec::new();
    }
    let Some(c) = centroid(nodes) else {
        return Vec::new();
    };
    nodes
        .iter()
        .map(|n| {
            let at = Coordinate::new(c.x + ratio * (n.x - c.x), c.y + ratio * (n.y - c.y));
            PlacedNode::new(n.id.clone(), at)
        })
        .collect()
}

/// Snap one axis of every node to the min or max of that axis.
pub fn plan_align(nodes: &[GraphNode], axis: Axis, extremum: Extremum) -> Vec<PlacedNode> {
    let values = nodes.iter().map(|n| match axis {
        Axis::X => n.x,
        Axis::Y => n.y,
    });
    let target = match extremum {
        Extremum::Min => values.fold(f64::INFINITY, f64::min),
        Extremum::Max => values.fold(f64::NEG_INFINITY, f64::max),
    };
    if nodes.is_empty() || !target.is_finite() {
        return Vec::new();
    }
    nodes
        .iter()
        .map(|n| {
            let at = match axis {
                Axis::X => Coordinate::new(target, n.y),
                Axis::Y => Coordinate::new(n.x, target),
            };
            PlacedNode::new(n.id.clone(), at)
        })
        .collect()
}

/// Arrange nodes around the heaviest one.
///
/// The center (or triangle apex) is never part of the plan; it stays where
/// it is and everything else is placed relative to it.
pub fn plan_rings(nodes: &[GraphNode], spec: &ArrangementSpec, config: &ArrangementConfig) -> Vec<PlacedNode> {
    match nodes.len() {
        0 | 1 => Vec::new(),
        3 => plan_triangle(nodes, spec, config),
        _ => plan_concentric(nodes, spec, config),
    }
}

/// Index of the heaviest node; the first one wins ties.
fn heaviest(nodes: &[GraphNode]) -> usize {
    let mut best = 0;
    for (i, n) in nodes.iter().enumerate().skip(1) {
        if n.weight > nodes[best].weight {
            best = i;
        }
    }
    best
}

fn sorted_by_id(mut nodes: Vec<&GraphNode>) -> Vec<&GraphNode> {
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    nodes
}

fn plan_triangle(nodes: &[GraphNode], spec: &ArrangementSpec, config: &ArrangementConfig) -> Vec<PlacedNode> {
    let apex_idx = heaviest(nodes);
    let apex = nodes[apex_idx].coordinate();
    let side = spec.explicit_radius().unwrap_or(config.triangle_side);
    let others = sorted_by_id(
        nodes.iter().enumerate().filter(|(i, _)| *i != apex_idx).map(|(_, n)| n).collect(),
    );

    // Base vertices at -30 and +30 degrees from the apex, 60 degrees apart.
    let start = -PI / 6.0;
    others
        .into_iter()
        .enumerate()
        .map(|(i, n)| PlacedNode::new(n.id.clone(), apex.polar(side, start + i as f64 * PI / 3.0)))
        .collect()
}

fn plan_concentric(nodes: &[GraphNode], spec: &ArrangementSpec, config: &ArrangementConfig) -> Vec<PlacedNode> {
    let center_idx = heaviest(nodes);
    let center = nodes[center_idx].coordinate();

    let (inner, outer): (Vec<&GraphNode>, Vec<&GraphNode>) = nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != center_idx)
        .map(|(_, n)| n)
        .partition(|n| spec.classify(&n.id) == Ring::Inner);

    let ring_radius = |members: &[&GraphNode]| -> f64 {
        spec.explicit_radius()
            .unwrap_or_else(|| heuristic_radius(center, members, config))
            .max(config.absolute_min_radius)
    };

    let mut plan = Vec::with_capacity(nodes.len() - 1);
    match (inner.is_empty(), outer.is_empty()) {
        (true, true) => {}
        (true, false) => {
            let r = ring_radius(&outer);
            place_ring(&mut plan, center, sorted_by_id(outer), r, 0.0);
        }
        (false, true) => {
            let r = ring_radius(&inner);
            place_ring(&mut plan, center, sorted_by_id(inner), r, 0.0);
        }
        (false, false) => {
            let outer_r = ring_radius(&outer);
            let inner_r = (outer_r * config.inner_ratio)
                .max(config.min_inner_radius)
                .min(outer_r - config.effective_gap())
                .max(config.absolute_min_radius);
            place_ring(&mut plan, center, sorted_by_id(inner), inner_r, -PI / 2.0);
            place_ring(&mut plan, center, sorted_by_id(outer), outer_r, 0.0);
        }
    }
    plan
}

/// Mean current distance of `members` from `center`, floored.
fn heuristic_radius(center: Coordinate, members: &[&GraphNode], config: &ArrangementConfig) -> f64 {
    let mean = if members.is_empty() {
        0.0
    } else {
        members.iter().map(|n| n.coordinate().distance_to(&center)).sum::<f64>() / members.len() as f64
    };
    mean.max(config.min_outer_radius).max(config.absolute_min_radius)
}

fn place_ring(plan: &mut Vec<PlacedNode>, center: Coordinate, members: Vec<&GraphNode>, radius: f64, base: f64) {
    let step = 2.0 * PI / members.len().max(1) as f64;
    for (i, n) in members.into_iter().enumerate() {
        plan.push(PlacedNode::new(n.id.clone(), center.polar(radius, base + i as f64 * step)));
    }
}
