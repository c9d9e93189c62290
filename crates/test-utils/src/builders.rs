#![allow(dead_code)]

use std::collections::BTreeMap;

use dagrun::config::{ConfigFile, PoolConfig, RawConfigFile, TaskConfig};
use dagrun::{ActionGraph, VertexId};

use crate::completion_log::CompletionLog;

/// Build an action graph of `vertices` logging actions with the given edges.
///
/// Vertex `i` (1-based) records into `log` under id `i`.
pub fn logged_graph(vertices: usize, edges: &[(VertexId, VertexId)], log: &CompletionLog) -> ActionGraph {
    let mut graph = ActionGraph::new();
    for id in 1..=vertices {
        graph.add_vertex(log.action(id));
    }
    for &(from, to) in edges {
        assert!(graph.add_edge(from, to), "edge {from} -> {to} refers to a missing vertex");
    }
    graph
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                pool: PoolConfig::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.pool.workers = workers;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
