// src/dag/task_graph.rs

use std::collections::BTreeMap;

use crate::config::model::ConfigFile;
use crate::dag::graph::VertexId;
use crate::errors::{DagrunError, Result};
use crate::exec::action::ActionGraph;
use crate::exec::command::command_action;

/// An action graph built from `[task.<name>]` sections, plus the mapping
/// between task names and vertex ids.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: ActionGraph,
    ids: BTreeMap<String, VertexId>,
    names: Vec<String>,
}

impl TaskGraph {
    /// Build the graph from a validated [`ConfigFile`].
    ///
    /// Tasks get ids in name order. For `[task.B] after = ["A"]` the edge
    /// `A -> B` is added.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut graph = ActionGraph::new();
        let mut ids = BTreeMap::new();
        let mut names = Vec::with_capacity(cfg.task.len());

        for (name, task) in cfg.task.iter() {
            let id = graph.add_vertex(command_action(name.clone(), task.cmd.clone())).id();
            ids.insert(name.clone(), id);
            names.push(name.clone());
        }

        for (name, task) in cfg.task.iter() {
            let to = ids[name];
            for dep in task.after.iter() {
                let from = *ids.get(dep).ok_or_else(|| {
                    DagrunError::ConfigError(format!(
                        "task '{}' has unknown dependency '{}' in `after`",
                        name, dep
                    ))
                })?;
                graph.add_edge(from, to);
            }
        }

        Ok(Self { graph, ids, names })
    }

    pub fn graph(&self) -> &ActionGraph {
        &self.graph
    }

    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: VertexId) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|idx| self.names.get(idx))
            .map(|s| s.as_str())
    }

    /// Task names in id order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Tasks with no `after` dependencies.
    pub fn roots(&self) -> Vec<&str> {
        self.graph
            .transpose()
            .leaves()
            .into_iter()
            .filter_map(|v| self.name_of(v.id()))
            .collect()
    }
}
