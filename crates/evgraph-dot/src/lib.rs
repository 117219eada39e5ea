//! Graph document and DOT rendering for evgraph.
//!
//! The graph builder drives a [`DotGraph`] through a small creation API
//! (nodes, subgraphs, edges, attributes) and hands it back for rendering.
//! Nothing here knows about eventing resources.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT text writer and escaping helpers
//! - [`graph`]: the mutable graph document and its handles

pub mod dot;
pub mod graph;

pub use dot::DotBuilder;
pub use graph::{Attrs, DotGraph, Edge, EdgeId, Node, NodeId, Subgraph, SubgraphId};
