//! Clipboard interchange of node positions.
//!
//! ## Format
//!
//! ```json
//! {
//!   "notes/a.md": {
//!     "x": 120, "y": -40,
//!     "color": 16711680,
//!     "metadata": { "tags": ["kernel"] },
//!     "links": { "forward": ["notes/b.md"], "reverse": [] }
//!   }
//! }
//! ```
//!
//! Import only reads `x` and `y`; everything else is informational.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::arrange::PlacedNode;
use crate::gateway::{PositionCommand, RendererGateway};
use crate::types::{Coordinate, GraphNode, NodeId};

/// Error type for clipboard import/export.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The text is not JSON.
    #[error("Clipboard does not contain JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is not an object keyed by node id.
    #[error("Clipboard JSON must be an object keyed by node id")]
    NotAnObject,
    /// One entry lacks numeric coordinates.
    ///
    /// Entries before it have already been applied.
    #[error("Clipboard entry {id} has no numeric x/y ({applied} entries already applied)")]
    MalformedEntry {
        /// Offending node id.
        id: NodeId,
        /// Entries applied before the failure.
        applied: usize,
    },
}

/// Links section of an exported entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportedLinks {
    /// Outgoing links, sorted.
    pub forward: Vec<NodeId>,
    /// Incoming links, sorted.
    pub reverse: Vec<NodeId>,
}

/// One exported node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNode {
    /// Rounded x.
    pub x: i64,
    /// Rounded y.
    pub y: i64,
    /// Display color.
    pub color: Option<u32>,
    /// Tracked metadata fields only.
    pub metadata: BTreeMap<String, Value>,
    /// Links of the node.
    pub links: ExportedLinks,
}

/// Build the export document for `nodes`.
pub fn export_nodes(nodes: &[GraphNode], tracked_fields: &[String]) -> BTreeMap<NodeId, ExportedNode> {
    nodes
        .iter()
        .map(|n| {
            let metadata = tracked_fields
                .iter()
                .filter_map(|f| n.metadata.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            let entry = ExportedNode {
                x: n.x.round() as i64,
                y: n.y.round() as i64,
                color: n.color,
                metadata,
                links: ExportedLinks {
                    forward: n.forward_links.iter().cloned().collect(),
                    reverse: n.reverse_links.iter().cloned().collect(),
                },
            };
            (n.id.clone(), entry)
        })
        .collect()
}

/// Export `nodes` as pretty-printed JSON.
pub fn export_positions(nodes: &[GraphNode], tracked_fields: &[String]) -> Result<String, ClipboardError> {
    Ok(serde_json::to_string_pretty(&export_nodes(nodes, tracked_fields))?)
}

/// Read `{x, y}` per id from clipboard text and pin each node there.
///
/// Entries are applied one by one in document order. If an entry is malformed
/// the import stops with [`ClipboardError::MalformedEntry`]; the commands
/// already posted stay applied.
pub fn import_positions<G: RendererGateway + ?Sized>(
    gateway: &G,
    text: &str,
) -> Result<Vec<PlacedNode>, ClipboardError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(entries) = value else {
        return Err(ClipboardError::NotAnObject);
    };

    let mut applied = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let id = NodeId::new(key);
        let coordinate = entry
            .get("x")
            .and_then(Value::as_f64)
            .zip(entry.get("y").and_then(Value::as_f64))
            .map(|(x, y)| Coordinate::new(x, y))
            .filter(Coordinate::is_finite);
        let Some(at) = coordinate else {
            tracing::warn!(id = %id, applied = applied.len(), "Malformed clipboard entry; import stopped");
            return Err(ClipboardError::MalformedEntry { id, applied: applied.len() });
        };
        gateway.post_position_command(PositionCommand::pin(id.clone(), at));
        applied.push(PlacedNode::new(id, at));
    }
    tracing::debug!(applied = applied.len(), "Clipboard positions imported");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RecordingGateway;
    use serde_json::json;

    #[test]
    fn test_export_shape() {
        let node = GraphNode::new("a.md", 10.4, -3.6, 1.0)
            .with_color(0xff0000)
            .with_metadata("tags", json!(["x"]))
            .with_metadata("secret", json!("hidden"));
        let gw = RecordingGateway::new().with_node(node).with_link("a.md", "b.md");
        let nodes = gw.live_nodes();

        let text = export_positions(&nodes, &["tags".to_string()]).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let entry = &value["a.md"];
        assert_eq!(entry["x"], 10);
        assert_eq!(entry["y"], -4);
        assert_eq!(entry["color"], 0xff0000);
        assert_eq!(entry["metadata"], json!({"tags": ["x"]}));
        assert_eq!(entry["links"]["forward"], json!(["b.md"]));
        assert_eq!(entry["links"]["reverse"], json!([]));
    }

    #[test]
    fn test_import_applies_and_pins() {
        let gw = RecordingGateway::new().with_node(GraphNode::new("a", 0.0, 0.0, 1.0));
        let applied = import_positions(&gw, r#"{"a": {"x": 7, "y": 8, "color": null}}"#).unwrap();
        assert_eq!(applied.len(), 1);
        let a = gw.node(&NodeId::from("a")).unwrap();
        assert_eq!(a.coordinate(), Coordinate::new(7.0, 8.0));
        assert!(a.is_fixed());
    }

    #[test]
    fn test_import_round_trips_export() {
        let gw = RecordingGateway::new()
            .with_node(GraphNode::new("a", 1.0, 2.0, 1.0))
            .with_node(GraphNode::new("b", 3.0, 4.0, 1.0));
        let text = export_positions(&gw.live_nodes(), &[]).unwrap();
        let applied = import_positions(&gw, &text).unwrap();
        assert_eq!(applied.len(), 2);
    }

    #[test]
    fn test_import_not_json() {
        let gw = RecordingGateway::new();
        assert!(matches!(import_positions(&gw, "hello"), Err(ClipboardError::Json(_))));
        assert!(matches!(import_positions(&gw, "[1, 2]"), Err(ClipboardError::NotAnObject)));
        assert!(gw.position_commands().is_empty());
    }

    #[test]
    fn test_import_partial_is_not_rolled_back() {
        let gw = RecordingGateway::new();
        let err = import_positions(&gw, r#"{"a": {"x": 1, "y": 1}, "b": {"x": "left"}, "c": {"x": 2, "y": 2}}"#)
            .unwrap_err();
        match err {
            ClipboardError::MalformedEntry { id, applied } => {
                assert_eq!(id.as_str(), "b");
                assert_eq!(applied, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gw.position_commands().len(), 1);
    }

    #[test]
    fn test_import_keeps_document_order() {
        let gw = RecordingGateway::new();
        import_positions(&gw, r#"{"z": {"x": 1, "y": 1}, "a": {"x": 2, "y": 2}}"#).unwrap();
        let order: Vec<_> = gw.position_commands().into_iter().map(|c| c.id).collect();
        assert_eq!(order, vec![NodeId::from("z"), NodeId::from("a")]);
    }
}
