// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Number of worker threads used when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 20;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [pool]
/// workers = 8
///
/// [task.fetch]
/// cmd = "git fetch"
///
/// [task.build]
/// cmd = "cargo build"
/// after = ["fetch"]
/// ```
///
/// Use `ConfigFile::try_from` (or [`crate::config::load_and_validate`]) to
/// obtain a validated [`ConfigFile`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Worker pool settings from `[pool]`.
    #[serde(default)]
    pub pool: PoolConfig,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated configuration: known dependencies only, no cycles, sane pool.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub pool: PoolConfig,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    /// Construct without validation. Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(pool: PoolConfig, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { pool, task }
    }
}

/// `[pool]` section; also the programmatic way to size a [`crate::pool::ThreadPool`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Fixed number of worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Prefix for worker thread names; threads are named `<prefix>-<index>`.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_thread_name() -> String {
    "dagrun-worker".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            thread_name: default_thread_name(),
        }
    }
}

impl PoolConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute.
    pub cmd: String,

    /// Tasks that must complete before this one starts (`after = ["A", "B"]`).
    #[serde(default)]
    pub after: Vec<String>,
}
