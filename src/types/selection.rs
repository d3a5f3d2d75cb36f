//! The selection set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::node::NodeId;

/// Deduplicated, insertion-ordered set of node ids.
///
/// Order matters: arrangement operations break weight ties by selection
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NodeId>", into = "Vec<NodeId>")]
pub struct SelectionSet {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns false if it was already selected.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.members.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Remove an id. Returns false if it was not selected.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        if self.members.remove(id) {
            self.order.retain(|x| x != id);
            true
        } else {
            false
        }
    }

    /// Flip membership of `id`. Returns true if it is selected afterwards.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.members.contains(&id) {
            self.remove(&id);
            false
        } else {
            self.insert(id);
            true
        }
    }

    /// Union `ids` into the selection.
    pub fn extend<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        for id in ids {
            self.insert(id);
        }
    }

    /// Remove every id in `ids`.
    pub fn subtract<'a, I: IntoIterator<Item = &'a NodeId>>(&mut self, ids: I) {
        let removed: HashSet<&NodeId> = ids.into_iter().collect();
        if removed.is_empty() {
            return;
        }
        self.order.retain(|id| !removed.contains(id));
        self.members.retain(|id| !removed.contains(id));
    }

    /// Replace the whole selection.
    pub fn replace<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        self.clear();
        self.extend(ids);
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// True if `id` is selected.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.members.contains(id)
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<NodeId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<NodeId>> for SelectionSet {
    fn from(ids: Vec<NodeId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<SelectionSet> for Vec<NodeId> {
    fn from(set: SelectionSet) -> Self {
        set.order
    }
}
