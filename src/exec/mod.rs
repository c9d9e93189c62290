// src/exec/mod.rs

//! DAG execution layer.
//!
//! - [`action`] defines the `Action` payload and the `ActionGraph` alias.
//! - [`executor`] owns `DagExecutor`, the entry point for running a graph.
//! - [`pass`] holds the per-pass shared state: the transposed predecessor
//!   graph, the outstanding-unit counter and the first captured failure.
//! - [`command`] builds actions that run shell commands, used by the CLI.

pub mod action;
pub mod command;
pub mod executor;
mod pass;

pub use action::{Action, ActionGraph};
pub use command::command_action;
pub use executor::DagExecutor;
