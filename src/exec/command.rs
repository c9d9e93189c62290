// src/exec/command.rs

//! Actions that run shell commands.

use std::process::{Command, Stdio};

use anyhow::{Context, bail};
use tracing::{debug, info};

use crate::exec::action::Action;

/// Build an action that runs `cmd` through the platform shell.
///
/// The command runs on the worker thread that picks the action up. Its
/// stdout and stderr are captured and logged line by line at debug level; a
/// non-zero exit status fails the action.
pub fn command_action(name: impl Into<String>, cmd: impl Into<String>) -> Action {
    let name = name.into();
    let cmd = cmd.into();
    Action::new(move || run_command(&name, &cmd))
}

fn run_command(name: &str, cmd: &str) -> anyhow::Result<()> {
    info!(task = %name, cmd = %cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("spawning process for task '{}'", name))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!(task = %name, "stdout: {}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(task = %name, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        task = %name,
        exit_code = code,
        success = output.status.success(),
        "task process exited"
    );

    if !output.status.success() {
        bail!("task '{}' exited with status {}", name, code);
    }
    Ok(())
}
