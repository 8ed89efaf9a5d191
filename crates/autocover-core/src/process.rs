//! Timeout-bounded subprocess invocation shared by every language profile.

use std::path::Path;
use std::time::Duration;

use crate::error::{AutocoverError, Result};

/// Captured output of a finished (or timed-out) child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Run `program` with `args` in `cwd`, waiting at most `timeout`.
///
/// A timeout is not an `Err`: the child is killed and the output comes back
/// with `timed_out = true`, so callers can report it as its own failure
/// kind. Only a spawn failure (missing binary, permissions) is an `Err`.
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Result<ProcessOutput> {
    use tokio::process::Command;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| AutocoverError::process(program, e.to_string()))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            timed_out: false,
        }),
        Ok(Err(e)) => Err(AutocoverError::process(program, e.to_string())),
        Err(_) => Ok(ProcessOutput {
            stdout: String::new(),
            stderr: format!("process timed out after {:?}", timeout),
            exit_code: -1,
            timed_out: true,
        }),
    }
}

/// Probe whether a command exists and runs at all.
pub async fn check_command(program: &str, args: &[&str]) -> bool {
    tokio::process::Command::new(program)
        .args(args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .stdin(std::process::Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}
