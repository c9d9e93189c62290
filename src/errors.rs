// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::dag::VertexId;

#[derive(Error, Debug)]
pub enum DagrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexId),

    /// The action graph contains a cycle; nothing was scheduled.
    #[error("Cycle detected in action graph")]
    CycleDetected,

    /// A work unit returned an error.
    #[error("task failed: {0:#}")]
    TaskFailed(anyhow::Error),

    /// A work unit panicked. The payload message is kept when it is a string.
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// The action attached to `vertex` failed during a pass.
    #[error("action for vertex {vertex} failed: {cause}")]
    ActionFailed {
        vertex: VertexId,
        #[source]
        cause: Box<DagrunError>,
    },

    #[error("worker pool is shut down; submission rejected")]
    PoolShutdown,

    /// The producer side of a task handle went away without reporting.
    #[error("task result lost: unit was dropped before completing")]
    ResultLost,
}

pub type Result<T> = std::result::Result<T, DagrunError>;
