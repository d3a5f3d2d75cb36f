//! Core types for the layout kernel.

pub mod node;
pub mod position;
pub mod selection;

pub use node::{NodeId, GraphNode, Adjacency};
pub use position::{Coordinate, NodePosition, PositionSnapshot};
pub use selection::SelectionSet;
