//! Blocking execution of external commands with a time bound.
//!
//! Tools inherit stdout/stderr so their progress output reaches the user
//! directly. Completion is polled with `try_wait`; a process still running
//! when the bound elapses is killed and reported as [`ToolError::Timeout`].

use super::backend::ToolError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Build from a configured command prefix such as `["npx", "typedoc"]`.
    pub fn from_prefix(prefix: &[String]) -> Result<Self, ToolError> {
        let (program, rest) = prefix.split_first().ok_or(ToolError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: rest.to_vec(),
            current_dir: None,
        })
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run a command to completion, failing on non-zero exit or timeout.
pub fn run_command(spec: &CommandSpec, timeout: Duration) -> Result<(), ToolError> {
    tracing::debug!(command = %spec, "running");

    let mut command = Command::new(&spec.program);
    command.args(&spec.args).stdin(Stdio::null());
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|source| ToolError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            tracing::debug!(command = %spec, elapsed_ms = started.elapsed().as_millis() as u64, "finished");
            return check_status(spec, status);
        }
        if started.elapsed() >= timeout {
            // The process may exit between try_wait and kill; either way it is gone.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ToolError::Timeout {
                command: spec.to_string(),
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn check_status(spec: &CommandSpec, status: ExitStatus) -> Result<(), ToolError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ToolError::Failed {
            command: spec.to_string(),
            status: code,
        }),
        None => Err(ToolError::Terminated {
            command: spec.to_string(),
        }),
    }
}
