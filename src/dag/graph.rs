// src/dag/graph.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{DagrunError, Result};

/// Vertex identifier. Ids are dense and start at 1, in creation order.
pub type VertexId = usize;

/// A vertex: its id plus the payload handed to [`Graph::add_vertex`].
///
/// Vertices never change after creation, so graph clones share them.
#[derive(Debug)]
pub struct Vertex<T> {
    id: VertexId,
    value: T,
}

impl<T> Vertex<T> {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Directed edge: `from` must complete before `to` may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }
}

/// Successors of a single vertex, in insertion order and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyList {
    root: VertexId,
    successors: Vec<VertexId>,
}

impl AdjacencyList {
    fn new(root: VertexId) -> Self {
        Self {
            root,
            successors: Vec::new(),
        }
    }

    /// Id of the vertex this list belongs to.
    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn successors(&self) -> &[VertexId] {
        &self.successors
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.successors.clear();
    }
}

/// Directed graph stored arena-style.
///
/// - `vertices[id - 1]` is the vertex with that id.
/// - `adjacency[id - 1]` is its successor list; this is what traversal uses.
/// - `edges` mirrors the adjacency lists and answers membership queries.
///
/// Every edge `(u, v)` in `edges` has exactly one `v` in `u`'s adjacency
/// list and vice versa.
#[derive(Debug)]
pub struct Graph<T> {
    vertices: Vec<Arc<Vertex<T>>>,
    edges: BTreeSet<Edge>,
    adjacency: Vec<AdjacencyList>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep-copies the edge set and adjacency lists; vertex payloads are shared.
impl<T> Clone for Graph<T> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            adjacency: self.adjacency.clone(),
        }
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: BTreeSet::new(),
            adjacency: Vec::new(),
        }
    }

    /// Add a vertex carrying `value`. Its id is `vertex_count() + 1`.
    pub fn add_vertex(&mut self, value: T) -> &Vertex<T> {
        let id = self.vertices.len() + 1;
        self.vertices.push(Arc::new(Vertex { id, value }));
        self.adjacency.push(AdjacencyList::new(id));
        &self.vertices[id - 1]
    }

    /// Look up a vertex by id.
    pub fn find_vertex(&self, id: VertexId) -> Result<&Vertex<T>> {
        self.index_of(id)
            .map(|idx| self.vertices[idx].as_ref())
            .ok_or(DagrunError::VertexNotFound(id))
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns `false` (and leaves the graph untouched) if either endpoint
    /// does not exist. Adding an edge that is already present succeeds
    /// without changing anything.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let (Some(from_idx), Some(_)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };

        if self.edges.insert(Edge::new(from, to)) {
            self.adjacency[from_idx].successors.push(to);
        }
        true
    }

    /// Remove the edge `from -> to`. Returns `true` if an edge was removed.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let Some(from_idx) = self.index_of(from) else {
            return false;
        };
        if !self.edges.remove(&Edge::new(from, to)) {
            return false;
        }

        let successors = &mut self.adjacency[from_idx].successors;
        if let Some(pos) = successors.iter().position(|&id| id == to) {
            successors.remove(pos);
        }
        true
    }

    pub fn contains_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.edges.contains(&Edge::new(from, to))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<T>> {
        self.vertices.iter().map(|v| v.as_ref())
    }

    /// All edges, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    pub fn adjacency_lists(&self) -> &[AdjacencyList] {
        &self.adjacency
    }

    pub fn adjacency_list(&self, id: VertexId) -> Result<&AdjacencyList> {
        self.index_of(id)
            .map(|idx| &self.adjacency[idx])
            .ok_or(DagrunError::VertexNotFound(id))
    }

    /// Direct successors of `id`; empty for unknown ids.
    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        self.index_of(id)
            .map(|idx| self.adjacency[idx].successors())
            .unwrap_or(&[])
    }

    /// Drop every edge while keeping all vertices.
    pub(crate) fn clear_edges(&mut self) {
        self.edges.clear();
        for list in self.adjacency.iter_mut() {
            list.clear();
        }
    }

    fn index_of(&self, id: VertexId) -> Option<usize> {
        if id >= 1 && id <= self.vertices.len() {
            Some(id - 1)
        } else {
            None
        }
    }
}
