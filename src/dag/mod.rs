// src/dag/mod.rs

//! Directed graph ADT and its traversal primitives.
//!
//! - [`graph`] holds the arena-style `Graph<T>` with vertices, an edge set and
//!   per-vertex adjacency lists.
//! - [`traversal`] adds cycle detection, transposition and leaf extraction.
//! - [`task_graph`] builds an action graph from `[task.<name>]` config.

pub mod graph;
pub mod task_graph;
pub mod traversal;

pub use graph::{AdjacencyList, Edge, Graph, Vertex, VertexId};
pub use task_graph::TaskGraph;
pub use traversal::transpose_graph;
