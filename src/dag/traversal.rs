// src/dag/traversal.rs

//! Whole-graph algorithms: cycle detection, transposition, leaves.

use crate::dag::graph::{Graph, Vertex, VertexId};

/// DFS colour of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    /// Not visited yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

impl<T> Graph<T> {
    /// Returns `true` if the graph contains a directed cycle.
    ///
    /// Three-colour depth-first search started from every unvisited vertex in
    /// id order. Reaching a gray vertex again means a back edge, i.e. a cycle.
    /// The search keeps its own stack of `(vertex, next successor index)`
    /// frames, so graph depth is not limited by the thread's stack size.
    pub fn has_cycle(&self) -> bool {
        let mut colour = vec![Colour::White; self.vertex_count()];
        let mut stack: Vec<(VertexId, usize)> = Vec::new();

        for start in 1..=self.vertex_count() {
            if colour[start - 1] != Colour::White {
                continue;
            }

            colour[start - 1] = Colour::Gray;
            stack.push((start, 0));

            while let Some(frame) = stack.last_mut() {
                let (vertex, next) = *frame;
                let successors = self.successors(vertex);

                if next == successors.len() {
                    colour[vertex - 1] = Colour::Black;
                    stack.pop();
                    continue;
                }

                frame.1 += 1;
                let succ = successors[next];
                match colour[succ - 1] {
                    Colour::Gray => return true,
                    Colour::Black => {}
                    Colour::White => {
                        colour[succ - 1] = Colour::Gray;
                        stack.push((succ, 0));
                    }
                }
            }
        }

        false
    }

    /// Copy of this graph with every edge reversed.
    ///
    /// Same vertex set (payloads shared); the adjacency list of `v` in the
    /// result holds `v`'s predecessors in `self`.
    pub fn transpose(&self) -> Graph<T> {
        let mut transposed = self.clone();
        transposed.clear_edges();

        for list in self.adjacency_lists() {
            for &to in list.successors() {
                transposed.add_edge(to, list.root());
            }
        }

        transposed
    }

    /// Vertices whose adjacency list is currently empty, in id order.
    pub fn leaves(&self) -> Vec<&Vertex<T>> {
        self.adjacency_lists()
            .iter()
            .filter(|list| list.is_empty())
            .filter_map(|list| self.find_vertex(list.root()).ok())
            .collect()
    }
}

/// Free-function form of [`Graph::transpose`].
pub fn transpose_graph<T>(graph: &Graph<T>) -> Graph<T> {
    graph.transpose()
}
