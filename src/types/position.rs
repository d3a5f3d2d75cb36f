//! Coordinates and position snapshots.
//!
//! ## Float Normalization for Fingerprints
//!
//! Coordinates are quantized (multiplied by 1e3 and rounded to i64) before
//! hashing so that a fingerprint does not depend on the last bits of a float
//! that went through a renderer round trip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_hash_hex;
use super::node::{GraphNode, NodeId};

/// Quantization factor for fingerprint normalization.
const COORD_QUANTIZATION_FACTOR: f64 = 1_000.0;

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Translate by an offset.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Point at `radius` and `angle` (radians) around `self`.
    pub fn polar(&self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    /// True if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A node's position with optional fixed-position overrides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodePosition {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Pinned x, if fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    /// Pinned y, if fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
}

impl NodePosition {
    /// A position pinned at its own coordinate.
    pub fn fixed(x: f64, y: f64) -> Self {
        Self { x, y, fx: Some(x), fy: Some(y) }
    }

    /// A free (unpinned) position.
    pub fn free(x: f64, y: f64) -> Self {
        Self { x, y, fx: None, fy: None }
    }

    /// The plain coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }
}

impl From<Coordinate> for NodePosition {
    fn from(c: Coordinate) -> Self {
        Self::free(c.x, c.y)
    }
}

/// Immutable mapping of node ids to positions.
///
/// Used both for persisted snapshots and in-memory history entries. Backed
/// by a `BTreeMap` so iteration and serialization are id-sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionSnapshot {
    positions: BTreeMap<NodeId, NodePosition>,
}

impl PositionSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current positions of live nodes.
    ///
    /// Pinned nodes keep their `fx`/`fy` so the snapshot records which
    /// nodes were explicitly placed.
    pub fn capture<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>) -> Self {
        let positions = nodes
            .into_iter()
            .map(|n| {
                (
                    n.id.clone(),
                    NodePosition { x: n.x, y: n.y, fx: n.fx, fy: n.fy },
                )
            })
            .collect();
        Self { positions }
    }

    /// Capture only the nodes pinned on both axes.
    pub fn capture_pinned<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>) -> Self {
        Self::capture(nodes.into_iter().filter(|n| n.is_fixed()))
    }

    /// Build from plain coordinates.
    pub fn from_coordinates(coords: impl IntoIterator<Item = (NodeId, Coordinate)>) -> Self {
        Self {
            positions: coords.into_iter().map(|(id, c)| (id, c.into())).collect(),
        }
    }

    /// Insert or replace a node position, returning the updated snapshot.
    pub fn with(mut self, id: impl Into<NodeId>, position: NodePosition) -> Self {
        self.positions.insert(id.into(), position);
        self
    }

    /// Position of a node.
    pub fn get(&self, id: &NodeId) -> Option<&NodePosition> {
        self.positions.get(id)
    }

    /// True if the snapshot records a position for `id`.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodePosition)> {
        self.positions.iter()
    }

    /// Fill ids missing from `self` with the positions in `previous`.
    ///
    /// Ids present in `self` always win.
    pub fn merged_over(mut self, previous: &PositionSnapshot) -> Self {
        for (id, pos) in &previous.positions {
            self.positions.entry(id.clone()).or_insert(*pos);
        }
        self
    }

    /// The persisted record form: id-sorted `{x, y}` only.
    pub fn to_record(&self) -> BTreeMap<NodeId, Coordinate> {
        self.positions
            .iter()
            .map(|(id, p)| (id.clone(), p.coordinate()))
            .collect()
    }

    /// Deterministic fingerprint of the recorded coordinates.
    pub fn fingerprint(&self) -> String {
        let quantized: Vec<(&str, i64, i64)> = self
            .positions
            .iter()
            .map(|(id, p)| (id.as_str(), quantize(p.x), quantize(p.y)))
            .collect();
        canonical_hash_hex(&quantized)
    }
}

impl FromIterator<(NodeId, NodePosition)> for PositionSnapshot {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodePosition)>>(iter: I) -> Self {
        Self { positions: iter.into_iter().collect() }
    }
}

fn quantize(value: f64) -> i64 {
    (value * COORD_QUANTIZATION_FACTOR).round() as i64
}
