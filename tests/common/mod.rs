#![allow(dead_code)]

use async_trait::async_trait;
use contentmonetizer::builder::{CommandOutput, CommandRunner};
use contentmonetizer::repository::CommandLine;
use contentmonetizer::Result;
use mockito::{Server, ServerGuard};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn setup_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub async fn setup_test_server() -> ServerGuard {
    Server::new_async().await
}

/// Writes `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Records every command it is asked to run and fails the ones whose
/// program matches `failing`
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<String>>>,
    failing: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(program: &str) -> Self {
        Self { failing: Some(program.to_string()), ..Self::default() }
    }

    /// Commands seen so far, `start:` prefixed when launched through the run window
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self, command: &CommandLine) -> CommandOutput {
        if self.failing.as_deref() == command.program() {
            CommandOutput::exited(1, "", &format!("{} failed", command))
        } else {
            CommandOutput::exited(0, "ok", "")
        }
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine, _dir: &Path, _env: &BTreeMap<String, String>) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok(self.outcome(command))
    }

    async fn start(
        &self,
        command: &CommandLine,
        _dir: &Path,
        _env: &BTreeMap<String, String>,
        _window: Duration,
    ) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(format!("start:{}", command));
        let output = self.outcome(command);
        if output.success() {
            Ok(CommandOutput::running())
        } else {
            Ok(output)
        }
    }
}
