// src/collab/process.rs
//! Bounded-time execution of external tools.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{LayerError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout of a successful run.
    ///
    /// # Errors
    /// Returns `Collaborator` with the tool's stderr if it exited non-zero.
    pub fn into_success(self, tool: &str) -> Result<String> {
        if self.status.success() {
            return Ok(self.stdout);
        }
        let code = self
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Err(LayerError::collaborator(
            tool,
            format!("exit status {code}: {}", summarize(&self.stderr)),
        ))
    }
}

/// Runs `command` to completion, killing it once `timeout` elapses.
///
/// Both output streams are drained on reader threads while the child is polled,
/// so a chatty tool cannot block on a full pipe.
///
/// # Errors
/// Returns `Collaborator` if the tool cannot be spawned or its output cannot be read,
/// and `Timeout` if it runs past `timeout`.
pub fn run_bounded(mut command: Command, tool: &str, timeout: Duration) -> Result<ToolOutput> {
    debug!("running {tool}: {command:?}");
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| LayerError::collaborator(tool, format!("failed to start: {e}")))?;

    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let status = wait_bounded(&mut child, tool, timeout)?;

    Ok(ToolOutput {
        status,
        stdout: collect(stdout, tool)?,
        stderr: collect(stderr, tool)?,
    })
}

fn wait_bounded(child: &mut Child, tool: &str, timeout: Duration) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() >= timeout => {
                warn!("{tool} timed out after {}s, killing it", timeout.as_secs());
                let _ = child.kill();
                let _ = child.wait();
                return Err(LayerError::Timeout {
                    tool: tool.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return Err(LayerError::collaborator(tool, format!("failed to wait: {e}")));
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    input: Option<R>,
) -> Option<JoinHandle<std::io::Result<Vec<u8>>>> {
    input.map(|mut stream| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>, tool: &str) -> Result<String> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .map_err(|_| LayerError::collaborator(tool, "output reader panicked"))?
        .map_err(|e| LayerError::collaborator(tool, format!("failed to read output: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn summarize(stderr: &str) -> String {
    let max_lines = 5;
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    if lines.len() <= max_lines {
        return lines.join("; ");
    }
    format!(
        "{} ... ({} more lines)",
        lines[..max_lines].join("; "),
        lines.len() - max_lines
    )
}
