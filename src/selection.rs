//! Selection queries.
//!
//! The [`SelectionManager`] owns the active [`SelectionSet`] of one graph
//! view and updates it from spatial, textual and link-graph queries.
//!
//! ## Replace vs. union
//!
//! | Query | Effect |
//! |-------|--------|
//! | region | union (or subtract) |
//! | regex | replace |
//! | related / backlinks / outgoing | union |
//! | position type | replace |

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::gateway::RendererGateway;
use crate::types::{Coordinate, GraphNode, NodeId, PositionSnapshot, SelectionSet};

/// Axis-aligned rectangle in world space, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
}

impl Rect {
    /// Rectangle spanned by two corners given in any order.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            x_min: a.x.min(b.x),
            y_min: a.y.min(b.y),
            x_max: a.x.max(b.x),
            y_max: a.y.max(b.y),
        }
    }

    /// True if `p` lies inside or on the border.
    pub fn contains(&self, p: Coordinate) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}

/// How a region query combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionMode {
    /// Union matches into the selection.
    #[default]
    Add,
    /// Remove matches from the selection.
    Subtract,
}

impl RegionMode {
    /// Resolve the subtract modifier. Without it a region query unions.
    pub fn from_subtractive(subtractive: bool) -> Self {
        if subtractive {
            Self::Subtract
        } else {
            Self::Add
        }
    }
}

/// Tracks the active selection of one graph view.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selection: SelectionSet,
}

impl SelectionManager {
    /// Create a manager with an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replace the selection.
    pub fn set<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) -> &SelectionSet {
        self.selection.replace(ids);
        &self.selection
    }

    /// Flip one id.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        self.selection.toggle(id)
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Select every candidate.
    pub fn select_all(&mut self, candidates: &[GraphNode]) -> &SelectionSet {
        self.selection.replace(candidates.iter().map(|n| n.id.clone()));
        &self.selection
    }

    /// Select candidates whose coordinates fall inside `rect`.
    ///
    /// Matches are unioned into the selection unless `subtractive` is set,
    /// in which case they are removed. `additive` names the add modifier
    /// for callers; union is already the default, so setting it alone does
    /// not change the outcome and `subtractive` wins when both are set.
    pub fn select_by_region(
        &mut self,
        candidates: &[GraphNode],
        rect: Rect,
        additive: bool,
        subtractive: bool,
    ) -> &SelectionSet {
        let hits: Vec<NodeId> = candidates
            .iter()
            .filter(|n| rect.contains(n.coordinate()))
            .map(|n| n.id.clone())
            .collect();

        tracing::trace!(hits = hits.len(), additive, subtractive, "Region query");
        match RegionMode::from_subtractive(subtractive) {
            RegionMode::Add => self.selection.extend(hits),
            RegionMode::Subtract => self.selection.subtract(&hits),
        }
        &self.selection
    }

    /// Replace the selection with candidates whose id matches `pattern`.
    ///
    /// An invalid pattern leaves the selection untouched and returns the
    /// compile error so the caller may show it.
    pub fn select_by_regex(
        &mut self,
        candidates: &[GraphNode],
        pattern: &str,
    ) -> Result<&SelectionSet, regex_lite::Error> {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Invalid selection pattern; selection unchanged");
                return Err(e);
            }
        };
        self.selection.replace(
            candidates
                .iter()
                .filter(|n| re.is_match(n.id.as_str()))
                .map(|n| n.id.clone()),
        );
        Ok(&self.selection)
    }

    /// Expand the selection breadth-first over forward and reverse links.
    ///
    /// Each id is visited at most once. Ids the renderer cannot resolve are
    /// skipped and not expanded further.
    pub fn select_related<G: RendererGateway + ?Sized>(&mut self, gateway: &G, depth: usize) -> &SelectionSet {
        if depth == 0 || self.selection.is_empty() {
            return &self.selection;
        }
        let live = live_ids(gateway);
        let mut visited: HashSet<NodeId> = self.selection.iter().cloned().collect();
        let mut frontier: Vec<NodeId> = self.selection.ids().to_vec();

        for _ in 0..depth {
            let mut next = Vec::new();
            for id in &frontier {
                let adjacency = gateway.adjacency(id);
                for neighbour in adjacency.neighbours() {
                    if !visited.insert(neighbour.clone()) {
                        continue;
                    }
                    if !live.contains(neighbour) {
                        continue;
                    }
                    self.selection.insert(neighbour.clone());
                    next.push(neighbour.clone());
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        &self.selection
    }

    /// Union in every live node that links to a selected node.
    pub fn select_backlinks<G: RendererGateway + ?Sized>(&mut self, gateway: &G) -> &SelectionSet {
        self.expand_links(gateway, LinkDirection::Reverse)
    }

    /// Union in every live node a selected node links to.
    pub fn select_outgoing_links<G: RendererGateway + ?Sized>(&mut self, gateway: &G) -> &SelectionSet {
        self.expand_links(gateway, LinkDirection::Forward)
    }

    /// Replace the selection with candidates that are (or are not) recorded
    /// in the active history entry.
    ///
    /// Presence in the history entry stands in for "has an explicitly
    /// placed position". Without an entry nothing counts as fixed.
    pub fn select_by_position_type(
        &mut self,
        candidates: &[GraphNode],
        active_entry: Option<&PositionSnapshot>,
        fixed: bool,
    ) -> &SelectionSet {
        self.selection.replace(
            candidates
                .iter()
                .filter(|n| active_entry.is_some_and(|e| e.contains(&n.id)) == fixed)
                .map(|n| n.id.clone()),
        );
        &self.selection
    }

    fn expand_links<G: RendererGateway + ?Sized>(&mut self, gateway: &G, direction: LinkDirection) -> &SelectionSet {
        let live = live_ids(gateway);
        let mut found = Vec::new();
        for id in self.selection.iter() {
            let adjacency = gateway.adjacency(id);
            let links = match direction {
                LinkDirection::Forward => &adjacency.forward,
                LinkDirection::Reverse => &adjacency.reverse,
            };
            found.extend(links.iter().filter(|l| live.contains(*l)).cloned());
        }
        self.selection.extend(found);
        &self.selection
    }
}

#[derive(Debug, Clone, Copy)]
enum LinkDirection {
    Forward,
    Reverse,
}

fn live_ids<G: RendererGateway + ?Sized>(gateway: &G) -> HashSet<NodeId> {
    gateway.live_nodes().into_iter().map(|n| n.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RecordingGateway;
    use crate::types::NodePosition;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn abc() -> Vec<GraphNode> {
        vec![
            GraphNode::new("A", 0.0, 0.0, 1.0),
            GraphNode::new("B", 50.0, 50.0, 1.0),
            GraphNode::new("C", 200.0, 200.0, 1.0),
        ]
    }

    /// a -> b -> c -> d, plus e -> a and a -> ghost (not live).
    fn chain() -> RecordingGateway {
        let gw = RecordingGateway::new();
        for name in ["a", "b", "c", "d", "e"] {
            gw.add_node(GraphNode::new(name, 0.0, 0.0, 1.0));
        }
        gw.add_link("a", "b");
        gw.add_link("b", "c");
        gw.add_link("c", "d");
        gw.add_link("e", "a");
        gw.add_link("a", "ghost");
        gw
    }

    #[test]
    fn test_region_inclusive() {
        let mut m = SelectionManager::new();
        let rect = Rect::from_corners(Coordinate::new(100.0, 100.0), Coordinate::new(0.0, 0.0));
        m.select_by_region(&abc(), rect, false, false);
        assert_eq!(m.selection().ids(), &[id("A"), id("B")]);
    }

    #[test]
    fn test_region_additive_union() {
        let mut m = SelectionManager::new();
        m.set([id("C")]);
        let rect = Rect::from_corners(Coordinate::new(0.0, 0.0), Coordinate::new(60.0, 60.0));
        m.select_by_region(&abc(), rect, true, false);
        m.select_by_region(&abc(), rect, true, false);
        assert_eq!(m.selection().ids(), &[id("C"), id("A"), id("B")]);
    }

    #[test]
    fn test_region_mode_from_modifier() {
        assert_eq!(RegionMode::from_subtractive(false), RegionMode::Add);
        assert_eq!(RegionMode::from_subtractive(true), RegionMode::Subtract);
    }

    #[test]
    fn test_region_add_modifier_matches_unflagged() {
        let rect = Rect::from_corners(Coordinate::new(0.0, 0.0), Coordinate::new(60.0, 60.0));
        let mut plain = SelectionManager::new();
        plain.set([id("C")]);
        plain.select_by_region(&abc(), rect, false, false);

        let mut added = SelectionManager::new();
        added.set([id("C")]);
        added.select_by_region(&abc(), rect, true, false);

        assert_eq!(plain.selection().ids(), &[id("C"), id("A"), id("B")]);
        assert_eq!(plain.selection().ids(), added.selection().ids());

        // Both modifiers: subtract wins.
        added.select_by_region(&abc(), rect, true, true);
        assert_eq!(added.selection().ids(), &[id("C")]);
    }

    #[test]
    fn test_region_subtractive() {
        let mut m = SelectionManager::new();
        m.set([id("A"), id("B"), id("C")]);
        let rect = Rect::from_corners(Coordinate::new(40.0, 40.0), Coordinate::new(60.0, 60.0));
        m.select_by_region(&abc(), rect, false, true);
        assert_eq!(m.selection().ids(), &[id("A"), id("C")]);
    }

    #[test]
    fn test_regex_replaces() {
        let nodes = vec![
            GraphNode::new("daily/2024-01-01.md", 0.0, 0.0, 1.0),
            GraphNode::new("daily/2024-01-02.md", 0.0, 0.0, 1.0),
            GraphNode::new("projects/kernel.md", 0.0, 0.0, 1.0),
        ];
        let mut m = SelectionManager::new();
        m.set([id("projects/kernel.md")]);
        m.select_by_regex(&nodes, r"^daily/").unwrap();
        assert_eq!(m.selection().len(), 2);
        assert!(!m.selection().contains(&id("projects/kernel.md")));
    }

    #[test]
    fn test_invalid_regex_leaves_selection() {
        let mut m = SelectionManager::new();
        m.set([id("A")]);
        assert!(m.select_by_regex(&abc(), "(unclosed").is_err());
        assert_eq!(m.selection().ids(), &[id("A")]);
    }

    #[test]
    fn test_related_depth_zero_is_identity() {
        let gw = chain();
        let mut m = SelectionManager::new();
        m.set([id("b")]);
        m.select_related(&gw, 0);
        assert_eq!(m.selection().ids(), &[id("b")]);
    }

    #[test]
    fn test_related_depth_one_and_two() {
        let gw = chain();
        let mut m = SelectionManager::new();
        m.set([id("b")]);
        m.select_related(&gw, 1);
        assert_eq!(m.selection().ids(), &[id("b"), id("c"), id("a")]);

        m.set([id("b")]);
        m.select_related(&gw, 2);
        let sel = m.selection();
        assert_eq!(sel.len(), 5);
        assert!(sel.contains(&id("d")));
        assert!(sel.contains(&id("e")));
        assert!(!sel.contains(&id("ghost")));
    }

    #[test]
    fn test_related_skips_unloaded() {
        let gw = chain();
        gw.unload_node(&id("c"));
        let mut m = SelectionManager::new();
        m.set([id("b")]);
        m.select_related(&gw, 5);
        assert!(!m.selection().contains(&id("c")));
        assert!(!m.selection().contains(&id("d")));
        assert!(m.selection().contains(&id("e")));
    }

    #[test]
    fn test_backlinks_and_outgoing() {
        let gw = chain();
        let mut m = SelectionManager::new();
        m.set([id("a")]);
        m.select_backlinks(&gw);
        assert_eq!(m.selection().ids(), &[id("a"), id("e")]);

        m.set([id("a")]);
        m.select_outgoing_links(&gw);
        assert_eq!(m.selection().ids(), &[id("a"), id("b")]);
    }

    #[test]
    fn test_position_type() {
        let entry = PositionSnapshot::new().with("A", NodePosition::fixed(0.0, 0.0));
        let mut m = SelectionManager::new();
        m.select_by_position_type(&abc(), Some(&entry), true);
        assert_eq!(m.selection().ids(), &[id("A")]);
        m.select_by_position_type(&abc(), Some(&entry), false);
        assert_eq!(m.selection().ids(), &[id("B"), id("C")]);
        m.select_by_position_type(&abc(), None, true);
        assert!(m.selection().is_empty());
    }
}
