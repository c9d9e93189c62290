// tests/graph_operations.rs

use dagrun::dag::{Edge, Graph};
use dagrun::errors::DagrunError;
use dagrun::transpose_graph;

fn graph_with(vertices: usize, edges: &[(usize, usize)]) -> Graph<usize> {
    let mut graph = Graph::new();
    for i in 1..=vertices {
        graph.add_vertex(i * 10);
    }
    for &(from, to) in edges {
        assert!(graph.add_edge(from, to));
    }
    graph
}

#[test]
fn add_vertex_assigns_sequential_ids_from_one() {
    let mut graph = Graph::new();
    assert!(graph.is_empty());

    assert_eq!(graph.add_vertex("a").id(), 1);
    assert_eq!(graph.add_vertex("b").id(), 2);
    assert_eq!(graph.add_vertex("c").id(), 3);

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.adjacency_lists().len(), 3);
    assert_eq!(*graph.find_vertex(2).unwrap().value(), "b");
    assert!(graph.adjacency_lists().iter().all(|list| list.is_empty()));
}

#[test]
fn find_vertex_reports_missing_ids() {
    let graph = graph_with(2, &[]);

    assert!(matches!(graph.find_vertex(0), Err(DagrunError::VertexNotFound(0))));
    assert!(matches!(graph.find_vertex(3), Err(DagrunError::VertexNotFound(3))));
    assert_eq!(graph.find_vertex(1).unwrap().id(), 1);
}

#[test]
fn add_edge_with_missing_endpoint_fails_without_mutation() {
    let mut graph = graph_with(2, &[]);

    assert!(!graph.add_edge(1, 5));
    assert!(!graph.add_edge(7, 1));
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.successors(1).is_empty());
}

#[test]
fn duplicate_edges_are_not_duplicated_in_adjacency() {
    let mut graph = graph_with(2, &[(1, 2)]);

    assert!(graph.add_edge(1, 2));
    assert!(graph.add_edge(1, 2));

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.successors(1), &[2]);
}

#[test]
fn remove_edge_updates_set_and_adjacency() {
    let mut graph = graph_with(3, &[(1, 2), (1, 3)]);

    assert!(graph.remove_edge(1, 2));
    assert!(!graph.contains_edge(1, 2));
    assert_eq!(graph.successors(1), &[3]);

    // Absent edge and unknown vertex are both no-ops.
    assert!(!graph.remove_edge(1, 2));
    assert!(!graph.remove_edge(9, 1));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn clone_is_independent_of_original() {
    let mut graph = Graph::new();
    graph.add_vertex(1);
    graph.add_vertex(500);
    graph.add_vertex(200);
    graph.add_edge(1, 2);
    graph.add_edge(2, 3);

    let mut cloned = graph.clone();
    cloned.add_vertex(2);
    cloned.add_edge(1, 4);
    cloned.remove_edge(2, 3);

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.successors(1), &[2]);
    assert_eq!(graph.successors(2), &[3]);

    assert_eq!(cloned.vertex_count(), 4);
    assert_eq!(cloned.edge_count(), 2);
    assert_eq!(cloned.successors(1), &[2, 4]);
    assert!(cloned.successors(2).is_empty());

    // Mutating the original leaves the clone alone as well.
    graph.add_edge(3, 1);
    assert!(!cloned.contains_edge(3, 1));
}

#[test]
fn transpose_reverses_every_edge() {
    let graph = graph_with(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
    let transposed = transpose_graph(&graph);

    assert_eq!(transposed.vertex_count(), 4);
    assert_eq!(transposed.edge_count(), 4);
    for edge in graph.edges() {
        assert!(transposed.contains_edge(edge.to, edge.from));
    }
    let mut preds_of_4 = transposed.successors(4).to_vec();
    preds_of_4.sort();
    assert_eq!(preds_of_4, vec![2, 3]);
    assert!(transposed.successors(1).is_empty());

    // Pure: input unchanged, payloads shared.
    assert!(graph.contains_edge(1, 2));
    assert_eq!(*transposed.find_vertex(3).unwrap().value(), 30);

    let back: Vec<Edge> = transposed.transpose().edges().collect();
    let original: Vec<Edge> = graph.edges().collect();
    assert_eq!(back, original);
}

#[test]
fn leaves_are_vertices_with_empty_adjacency() {
    let mut graph = graph_with(5, &[(1, 2), (2, 3), (4, 3)]);

    let leaves: Vec<usize> = graph.leaves().iter().map(|v| v.id()).collect();
    assert_eq!(leaves, vec![3, 5]);

    graph.remove_edge(1, 2);
    let leaves: Vec<usize> = graph.leaves().iter().map(|v| v.id()).collect();
    assert_eq!(leaves, vec![1, 3, 5]);

    for list in graph.adjacency_lists() {
        assert_eq!(list.is_empty(), leaves.contains(&list.root()));
    }
}

#[test]
fn has_cycle_detects_three_cycle() {
    let mut graph = graph_with(3, &[(1, 2), (2, 3)]);
    assert!(!graph.has_cycle());

    graph.add_edge(3, 1);
    assert!(graph.has_cycle());
}

#[test]
fn has_cycle_detects_self_loop() {
    let graph = graph_with(2, &[(1, 2), (2, 2)]);
    assert!(graph.has_cycle());
}

#[test]
fn diamond_and_shared_descendants_are_not_cycles() {
    // 1 -> {2, 3} -> 4, plus 1 -> 4: black vertices are revisited, not gray.
    let graph = graph_with(4, &[(1, 2), (1, 3), (2, 4), (3, 4), (1, 4)]);
    assert!(!graph.has_cycle());
}

#[test]
fn cycle_found_regardless_of_start_vertex() {
    // The cycle 3 -> 4 -> 5 -> 3 is only reachable from vertex 2.
    let graph = graph_with(5, &[(2, 3), (3, 4), (4, 5), (5, 3)]);
    assert!(graph.has_cycle());
    assert!(graph.transpose().has_cycle());
}

#[test]
fn has_cycle_handles_very_deep_chains() {
    let n = 200_000;
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(i);
    }
    for id in 1..n {
        graph.add_edge(id, id + 1);
    }

    assert!(!graph.has_cycle());
    graph.add_edge(n, 1);
    assert!(graph.has_cycle());
}

#[test]
fn adjacency_list_lookup() {
    let graph = graph_with(2, &[(1, 2)]);

    let list = graph.adjacency_list(1).unwrap();
    assert_eq!(list.root(), 1);
    assert_eq!(list.len(), 1);
    assert!(matches!(graph.adjacency_list(3), Err(DagrunError::VertexNotFound(3))));
}
