//! Subprocess execution behind a trait so phases can be driven by a fake.

use crate::error::{PipelineError, Result};
use crate::repository::CommandLine;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;

/// What a finished (or still running) command left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if killed by a signal or still running
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// The process outlived its startup window and was stopped
    pub still_running: bool,
}

impl CommandOutput {
    /// Output of a command that exited with `code`
    pub fn exited(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            still_running: false,
        }
    }

    /// Output of a long-running process that was still alive after its window
    pub fn running() -> Self {
        Self { still_running: true, ..Self::default() }
    }

    /// Exit code zero, or still running when the window closed
    pub fn success(&self) -> bool {
        self.still_running || self.exit_code == Some(0)
    }
}

/// Runs commands in a working directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion
    async fn run(
        &self,
        command: &CommandLine,
        dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<CommandOutput>;

    /// Starts `command` and watches it for `window`
    ///
    /// A process still alive when the window closes is stopped, together with
    /// anything it spawned, and reported as [`CommandOutput::running`].
    async fn start(
        &self,
        command: &CommandLine,
        dir: &Path,
        env: &BTreeMap<String, String>,
        window: Duration,
    ) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(command: &CommandLine, dir: &Path, env: &BTreeMap<String, String>) -> Result<TokioCommand> {
        let program = command
            .program()
            .ok_or_else(|| PipelineError::Command("empty command line".to_string()))?;

        let mut cmd = TokioCommand::new(program);
        cmd.args(command.args())
            .current_dir(dir)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok(cmd)
    }
}

fn collect(output: std::process::Output) -> CommandOutput {
    CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        still_running: false,
    }
}

/// Kills the process group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        log::debug!("killpg({}) failed: {}", pid, std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        command: &CommandLine,
        dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<CommandOutput> {
        let output = Self::command(command, dir, env)?
            .output()
            .await
            .map_err(|e| PipelineError::Command(format!("{}: {}", command, e)))?;
        Ok(collect(output))
    }

    async fn start(
        &self,
        command: &CommandLine,
        dir: &Path,
        env: &BTreeMap<String, String>,
        window: Duration,
    ) -> Result<CommandOutput> {
        let mut cmd = Self::command(command, dir, env)?;
        // Servers started through `sh -c`, npm or docker-compose live in
        // grandchildren, so the whole group has to go.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd
            .spawn()
            .map_err(|e| PipelineError::Command(format!("{}: {}", command, e)))?;
        let pid = child.id();

        // Dropping the timed-out future drops the child, which kills it.
        match tokio::time::timeout(window, child.wait_with_output()).await {
            Ok(output) => output
                .map(collect)
                .map_err(|e| PipelineError::Command(format!("{}: {}", command, e))),
            Err(_) => {
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                Ok(CommandOutput::running())
            }
        }
    }
}
