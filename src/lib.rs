// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pool;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::dag::TaskGraph;
use crate::exec::DagExecutor;

pub use crate::dag::{Graph, Vertex, VertexId, transpose_graph};
pub use crate::errors::DagrunError;
pub use crate::exec::{Action, ActionGraph};
pub use crate::pool::{Scheduler, TaskHandle, ThreadPool};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (plus CLI overrides)
/// - task graph construction
/// - the worker pool and DAG executor
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)?;

    if let Some(workers) = args.workers {
        cfg.pool.workers = workers;
        validate_config(&cfg)?;
    }

    let tasks = TaskGraph::from_config(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &tasks);
        return Ok(());
    }

    info!(roots = ?tasks.roots(), "initial ready tasks");

    let executor = DagExecutor::from_config(&cfg.pool)?;
    let outcome = match executor.run_graph(tasks.graph()) {
        Ok(handle) => handle.join().await,
        Err(err) => Err(err),
    };

    // Dropping the pool joins its workers; keep that off the runtime threads.
    tokio::task::spawn_blocking(move || drop(executor)).await?;
    outcome?;

    info!(tasks = cfg.task.len(), "all tasks completed");
    Ok(())
}

/// Simple dry-run output: print pool settings, tasks, deps and commands.
fn print_dry_run(cfg: &ConfigFile, tasks: &TaskGraph) {
    println!("dagrun dry-run");
    println!("  pool.workers = {}", cfg.pool.workers);
    println!("  pool.thread_name = {}", cfg.pool.thread_name);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for name in tasks.tasks() {
        let Some(task) = cfg.task.get(name) else {
            continue;
        };
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
    }
    println!();
    println!("roots: {:?}", tasks.roots());

    debug!("dry-run complete (no execution)");
}
