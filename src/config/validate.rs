// src/config/validate.rs

use std::collections::HashMap;

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::Graph;
use crate::errors::{DagrunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DagrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.pool, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_pool_config(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(DagrunError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_pool_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.pool.workers == 0 {
        return Err(DagrunError::ConfigError(
            "[pool].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.pool.thread_name.trim().is_empty() {
        return Err(DagrunError::ConfigError(
            "[pool].thread_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if !cfg.task.contains_key(dep) {
                return Err(DagrunError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(DagrunError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> task. For `[task.B] after = ["A"]` we add A -> B.
    let mut graph: Graph<&str> = Graph::new();
    let mut ids = HashMap::new();

    for name in cfg.task.keys() {
        let id = graph.add_vertex(name.as_str()).id();
        ids.insert(name.as_str(), id);
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(ids[dep.as_str()], ids[name.as_str()]);
        }
    }

    if graph.has_cycle() {
        warn!(tasks = cfg.task.len(), "task dependencies form a cycle");
        return Err(DagrunError::CycleDetected);
    }
    Ok(())
}

/// Validate an already-built [`ConfigFile`] again (e.g. after programmatic edits).
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    let raw = RawConfigFile {
        pool: cfg.pool.clone(),
        task: cfg.task.clone(),
    };
    validate_raw_config(&raw)
}
