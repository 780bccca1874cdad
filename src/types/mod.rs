//! Core types for the layered graph.

pub mod node;
pub mod edge;

pub use node::{Node, NodeId};
pub use edge::{EdgeSide, EdgeState};
