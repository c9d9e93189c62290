// tests/executor_scenarios.rs

use std::sync::Arc;

use dagrun::errors::DagrunError;
use dagrun::exec::DagExecutor;
use dagrun::pool::ThreadPool;
use dagrun::{Action, ActionGraph};
use dagrun_test_utils::builders::logged_graph;
use dagrun_test_utils::completion_log::CompletionLog;
use dagrun_test_utils::recording_scheduler::{RecordingScheduler, ThreadPerJobScheduler};
use dagrun_test_utils::{init_tracing, with_timeout};

const COMPLEX_EDGES: [(usize, usize); 9] = [
    (1, 4),
    (1, 5),
    (2, 4),
    (3, 4),
    (4, 6),
    (4, 7),
    (6, 5),
    (7, 8),
    (7, 9),
];

fn executor(workers: usize) -> DagExecutor {
    DagExecutor::with_scheduler(Arc::new(ThreadPool::new(workers).unwrap()))
}

#[test]
fn complex_graph_respects_dependencies() {
    init_tracing();
    let exec = executor(20);

    for _ in 0..20 {
        let log = CompletionLog::new();
        let graph = logged_graph(9, &COMPLEX_EDGES, &log);

        exec.run_graph_blocking(&graph).unwrap();

        assert_eq!(log.finished().len(), 9);
        assert!(log.finished_before(1, 4));
        assert!(log.finished_before(1, 5));
        assert!(log.finished_before(4, 6));
        assert!(log.finished_before(6, 5));
        assert!(log.finished_before(4, 7));
        assert!(log.finished_before(7, 8));
        assert!(log.finished_before(7, 9));

        assert!(!log.finished_before(5, 3));
        assert!(!log.finished_before(9, 4));

        for (from, to) in COMPLEX_EDGES {
            assert!(
                log.finished_before_start(from, to),
                "{from} must finish before {to} starts: {:?}",
                log.events()
            );
        }
    }
}

#[test]
fn two_roots_feed_a_single_sink() {
    init_tracing();
    let exec = executor(4);

    for _ in 0..50 {
        let log = CompletionLog::new();
        let graph = logged_graph(3, &[(1, 3), (2, 3)], &log);

        exec.run_graph_blocking(&graph).unwrap();

        let finished = log.finished();
        assert_eq!(finished.len(), 3);
        assert_eq!(finished[2], 3);
        assert!(log.finished_before_start(1, 3));
        assert!(log.finished_before_start(2, 3));
    }
}

#[test]
fn cyclic_graph_is_rejected_before_anything_runs() {
    init_tracing();
    let exec = executor(2);
    let log = CompletionLog::new();
    let graph = logged_graph(3, &[(1, 2), (2, 3), (3, 1)], &log);

    assert!(graph.has_cycle());
    assert!(matches!(exec.run_graph(&graph), Err(DagrunError::CycleDetected)));
    assert!(log.is_empty());
}

#[test]
fn single_worker_still_completes_wide_and_deep_graphs() {
    init_tracing();
    let exec = executor(1);
    let log = CompletionLog::new();

    // Ten roots feeding a hub, which fans out to a chain of 20.
    let mut edges = Vec::new();
    for root in 1..=10 {
        edges.push((root, 11));
    }
    for id in 11..30 {
        edges.push((id, id + 1));
    }
    let graph = logged_graph(30, &edges, &log);

    exec.run_graph_blocking(&graph).unwrap();

    assert_eq!(log.finished().len(), 30);
    for &(from, to) in &edges {
        assert!(log.finished_before_start(from, to));
    }
}

#[test]
fn every_vertex_is_submitted_exactly_once() {
    init_tracing();
    let scheduler = Arc::new(RecordingScheduler::new(ThreadPool::new(8).unwrap()));
    let exec = DagExecutor::with_scheduler(Arc::clone(&scheduler));
    let log = CompletionLog::new();
    let graph = logged_graph(9, &COMPLEX_EDGES, &log);

    exec.run_graph_blocking(&graph).unwrap();

    assert_eq!(scheduler.scheduled(), 9);
    assert_eq!(scheduler.inner().size(), 8);
    assert_eq!(scheduler.inner().queued(), 0);
    let mut finished = log.finished();
    finished.sort();
    assert_eq!(finished, (1..=9).collect::<Vec<_>>());
}

#[test]
fn unbounded_parallelism_keeps_ordering() {
    init_tracing();
    let exec = DagExecutor::with_scheduler(Arc::new(ThreadPerJobScheduler));

    for _ in 0..20 {
        let log = CompletionLog::new();
        let graph = logged_graph(9, &COMPLEX_EDGES, &log);
        exec.run_graph_blocking(&graph).unwrap();

        assert_eq!(log.finished().len(), 9);
        for (from, to) in COMPLEX_EDGES {
            assert!(log.finished_before_start(from, to));
        }
    }
}

#[test]
fn independent_actions_overlap_on_the_pool() {
    init_tracing();
    let exec = executor(4);
    let barrier = Arc::new(std::sync::Barrier::new(4));

    let mut graph = ActionGraph::new();
    for _ in 0..4 {
        let barrier = Arc::clone(&barrier);
        graph.add_vertex(Action::from_fn(move || {
            // Deadlocks unless all four roots run at the same time.
            barrier.wait();
        }));
    }

    exec.run_graph_blocking(&graph).unwrap();
}

#[test]
fn empty_graph_completes_immediately() {
    init_tracing();
    let exec = executor(2);
    exec.run_graph_blocking(&ActionGraph::new()).unwrap();
}

#[test]
fn run_graph_does_not_modify_the_callers_graph() {
    init_tracing();
    let exec = executor(3);
    let log = CompletionLog::new();
    let graph = logged_graph(9, &COMPLEX_EDGES, &log);
    let edges_before: Vec<_> = graph.edges().collect();

    exec.run_graph_blocking(&graph).unwrap();
    exec.run_graph_blocking(&graph).unwrap();

    assert_eq!(graph.edges().collect::<Vec<_>>(), edges_before);
    assert_eq!(log.finished().len(), 18);
}

#[tokio::test]
async fn pass_handle_can_be_awaited() {
    init_tracing();
    let exec = executor(4);
    let log = CompletionLog::new();
    let graph = logged_graph(9, &COMPLEX_EDGES, &log);

    let handle = exec.run_graph(&graph).unwrap();
    with_timeout(handle.join()).await.unwrap();

    assert_eq!(log.finished().len(), 9);
    assert!(log.finished_before_start(7, 9));
}

#[test]
fn default_pool_has_twenty_workers() {
    init_tracing();
    let exec = DagExecutor::with_default_pool().unwrap();
    assert_eq!(exec.scheduler().size(), 20);

    let log = CompletionLog::new();
    let graph = logged_graph(3, &[(1, 3), (2, 3)], &log);
    exec.run_graph_blocking(&graph).unwrap();
    assert_eq!(log.finished()[2], 3);
}
