//! Build pipeline for a detected repository.
//!
//! Phases run in a fixed order: environment, dependencies, build, run. Each
//! phase function takes the previous phase's result and returns early on an
//! error, so one failing command stops everything after it without any
//! explicit bookkeeping in the caller.

/// Setup document rendering
pub mod document;
pub mod runner;

pub use document::render_setup_document;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

use crate::config::BuildConfig;
use crate::repository::{BuildInstructions, CommandLine, Detection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// One step of the build pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Workspace checks and setup hints
    Environment,
    /// Dependency installation
    Dependencies,
    /// Compilation or bundling
    Build,
    /// Starting the application
    Run,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Phase; 4] = [Phase::Environment, Phase::Dependencies, Phase::Build, Phase::Run];

    /// Heading used in the setup document
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Environment => "Environment Setup",
            Phase::Dependencies => "Dependency Installation",
            Phase::Build => "Application Build",
            Phase::Run => "Application Execution",
        }
    }

    /// Commands the instructions plan for this phase
    pub fn planned<'a>(&self, instructions: &'a BuildInstructions) -> &'a [CommandLine] {
        match self {
            Phase::Environment => &[],
            Phase::Dependencies => &instructions.dependencies,
            Phase::Build => &instructions.build,
            Phase::Run => &instructions.run,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Environment => "environment",
            Phase::Dependencies => "dependencies",
            Phase::Build => "build",
            Phase::Run => "run",
        };
        f.write_str(name)
    }
}

/// Why a phase did not run
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BuildError {
    /// The checkout directory is gone
    #[error("workspace {0} does not exist")]
    MissingWorkspace(PathBuf),

    /// An earlier phase reported failure
    #[error("{phase} phase failed: {stderr}")]
    PhaseFailed {
        /// The phase that failed
        phase: Phase,
        /// Its captured standard error
        stderr: String,
    },
}

/// Outcome of one attempted phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PhaseReport {
    pub phase: Phase,
    pub working_dir: PathBuf,
    /// Commands attempted, in order
    pub commands: Vec<CommandLine>,
    pub success: bool,
    /// Nothing applied to this repository
    pub skipped: bool,
    pub stdout: String,
    pub stderr: String,
    /// Setup hints recorded by the environment phase
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Variables passed to every command of this and later phases
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl PhaseReport {
    fn new(phase: Phase, working_dir: &Path, env: BTreeMap<String, String>) -> Self {
        Self {
            phase,
            working_dir: working_dir.to_path_buf(),
            commands: Vec::new(),
            success: true,
            skipped: false,
            stdout: String::new(),
            stderr: String::new(),
            notes: Vec::new(),
            env,
        }
    }
}

/// Result of a whole pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Checkout the phases ran in
    pub working_dir: PathBuf,
    /// The commands that were planned for each phase
    pub instructions: BuildInstructions,
    /// Reports of the phases that were attempted
    pub reports: Vec<PhaseReport>,
    /// The error that stopped the pipeline, if any
    pub error: Option<BuildError>,
    /// Port the application should listen on
    pub web_port: Option<u16>,
}

/// How far a phase got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PhaseStatus {
    Succeeded,
    Skipped,
    Failed,
    NotReached,
}

impl PhaseStatus {
    /// Lowercase label for documents
    pub fn label(&self) -> &'static str {
        match self {
            PhaseStatus::Succeeded => "succeeded",
            PhaseStatus::Skipped => "skipped",
            PhaseStatus::Failed => "failed",
            PhaseStatus::NotReached => "not reached",
        }
    }
}

impl BuildSummary {
    /// True when every phase succeeded or was skipped
    pub fn success(&self) -> bool {
        self.error.is_none() && self.reports.len() == Phase::ALL.len()
    }

    /// Report of `phase`, if it was attempted
    pub fn report(&self, phase: Phase) -> Option<&PhaseReport> {
        self.reports.iter().find(|r| r.phase == phase)
    }

    /// Status of `phase`
    pub fn status(&self, phase: Phase) -> PhaseStatus {
        match self.report(phase) {
            None => PhaseStatus::NotReached,
            Some(r) if !r.success => PhaseStatus::Failed,
            Some(r) if r.skipped => PhaseStatus::Skipped,
            Some(_) => PhaseStatus::Succeeded,
        }
    }

    /// `http://localhost:<port>` when the run phase came up and a port is known
    pub fn access_url(&self) -> Option<String> {
        let port = self.web_port?;
        matches!(self.status(Phase::Run), PhaseStatus::Succeeded).then(|| format!("http://localhost:{}", port))
    }
}

/// Unwraps the previous phase, turning a failed report into an error
fn proceed(previous: Result<PhaseReport, BuildError>) -> Result<PhaseReport, BuildError> {
    let report = previous?;
    if !report.success {
        return Err(BuildError::PhaseFailed {
            phase: report.phase,
            stderr: report.stderr,
        });
    }
    Ok(report)
}

/// Drives the phases through a [`CommandRunner`]
pub struct BuildPipeline<R: CommandRunner> {
    runner: R,
    run_window: Duration,
}

impl BuildPipeline<SystemRunner> {
    /// Pipeline running real subprocesses
    pub fn system(config: &BuildConfig) -> Self {
        Self::new(SystemRunner, Duration::from_secs(config.run_window_secs))
    }
}

impl<R: CommandRunner> BuildPipeline<R> {
    /// Creates a pipeline whose run phase watches each command for `run_window`
    pub fn new(runner: R, run_window: Duration) -> Self {
        Self { runner, run_window }
    }

    /// Checks the workspace and records language-specific setup hints
    pub async fn setup_environment(&self, dir: &Path, detection: &Detection) -> Result<PhaseReport, BuildError> {
        if !dir.is_dir() {
            return Err(BuildError::MissingWorkspace(dir.to_path_buf()));
        }

        let mut report = PhaseReport::new(Phase::Environment, dir, BTreeMap::new());

        if detection.build_system.is_python() {
            report.notes.push("python -m venv venv".to_string());
            report.notes.push("source venv/bin/activate".to_string());
        } else if detection.build_system.is_node() {
            if let Some(node) = required_node_version(dir) {
                report.notes.push(format!("# Requires Node.js {}", node));
            }
        }

        for framework in &detection.frameworks {
            match framework.as_str() {
                "django" | "flask" | "fastapi" => {
                    report.notes.push("# Python web application detected".to_string());
                    report.env.insert("PYTHONPATH".to_string(), dir.display().to_string());
                }
                "react" | "vue" | "angular" | "nextjs" => {
                    report.notes.push("# JavaScript frontend framework detected".to_string());
                }
                "express" => report.notes.push("# Node.js backend framework detected".to_string()),
                _ => {}
            }
        }
        report.notes.dedup();

        info!(phase = %Phase::Environment, dir = %dir.display(), "Environment ready");
        Ok(report)
    }

    /// Installs dependencies
    pub async fn install_dependencies(
        &self,
        previous: Result<PhaseReport, BuildError>,
        instructions: &BuildInstructions,
    ) -> Result<PhaseReport, BuildError> {
        let previous = proceed(previous)?;
        Ok(self.execute(Phase::Dependencies, &previous, &instructions.dependencies).await)
    }

    /// Compiles or bundles the application
    pub async fn build(
        &self,
        previous: Result<PhaseReport, BuildError>,
        instructions: &BuildInstructions,
    ) -> Result<PhaseReport, BuildError> {
        let previous = proceed(previous)?;
        Ok(self.execute(Phase::Build, &previous, &instructions.build).await)
    }

    /// Starts the application and watches it through the startup window
    pub async fn run(
        &self,
        previous: Result<PhaseReport, BuildError>,
        instructions: &BuildInstructions,
    ) -> Result<PhaseReport, BuildError> {
        let previous = proceed(previous)?;
        Ok(self.execute(Phase::Run, &previous, &instructions.run).await)
    }

    /// Runs every phase in order and collects what happened
    pub async fn run_all(&self, dir: &Path, detection: &Detection) -> BuildSummary {
        let instructions = &detection.instructions;
        let mut summary = BuildSummary {
            working_dir: dir.to_path_buf(),
            instructions: instructions.clone(),
            web_port: detection.web_port,
            ..BuildSummary::default()
        };

        let environment = self.setup_environment(dir, detection).await;
        record(&mut summary, &environment);
        let dependencies = self.install_dependencies(environment, instructions).await;
        record(&mut summary, &dependencies);
        let build = self.build(dependencies, instructions).await;
        record(&mut summary, &build);
        let run = self.run(build, instructions).await;
        record(&mut summary, &run);

        summary.error = match proceed(run) {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Build pipeline stopped");
                Some(e)
            }
        };
        summary
    }

    async fn execute(&self, phase: Phase, previous: &PhaseReport, commands: &[CommandLine]) -> PhaseReport {
        let dir = previous.working_dir.as_path();
        let mut report = PhaseReport::new(phase, dir, previous.env.clone());

        if commands.is_empty() {
            info!(phase = %phase, "Nothing to do, skipping");
            report.skipped = true;
            return report;
        }

        for command in commands {
            info!(phase = %phase, command = %command, "Running command");
            report.commands.push(command.clone());

            let outcome = match phase {
                Phase::Run => self.runner.start(command, dir, &report.env, self.run_window).await,
                _ => self.runner.run(command, dir, &report.env).await,
            };

            match outcome {
                Ok(output) => {
                    report.stdout.push_str(&output.stdout);
                    report.stderr.push_str(&output.stderr);
                    if output.still_running {
                        info!(phase = %phase, command = %command, "Still running after startup window, stopped");
                    }
                    if !output.success() {
                        warn!(phase = %phase, command = %command, exit_code = ?output.exit_code, "Command failed");
                        report.success = false;
                        break;
                    }
                }
                Err(e) => {
                    warn!(phase = %phase, command = %command, error = %e, "Command could not be started");
                    report.stderr.push_str(&e.to_string());
                    report.success = false;
                    break;
                }
            }
        }
        report
    }
}

fn record(summary: &mut BuildSummary, result: &Result<PhaseReport, BuildError>) {
    if let Ok(report) = result {
        summary.reports.push(report.clone());
    }
}

fn required_node_version(dir: &Path) -> Option<String> {
    let text = std::fs::read_to_string(dir.join("package.json")).ok()?;
    let pkg: Value = serde_json::from_str(&text).ok()?;
    pkg["engines"]["node"].as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{detect, ApplicationType, BuildSystem};
    use mockall::predicate::always;
    use pretty_assertions::assert_eq;
    use super::runner::MockCommandRunner;
    use tempfile::TempDir;

    fn npm_detection() -> Detection {
        Detection {
            languages: BTreeMap::new(),
            frameworks: vec!["react".to_string()],
            build_system: BuildSystem::Npm,
            application_type: ApplicationType::React,
            instructions: BuildInstructions {
                dependencies: vec![CommandLine::from(["npm", "install"])],
                build: vec![CommandLine::from(["npm", "run", "build"])],
                run: vec![CommandLine::from(["npm", "start"])],
            },
            web_port: Some(3000),
        }
    }

    #[tokio::test]
    async fn test_failed_install_short_circuits_build_and_run() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _, _| Ok(CommandOutput::exited(1, "", "ERESOLVE unable to resolve")));
        runner.expect_start().never();

        let pipeline = BuildPipeline::new(runner, Duration::from_secs(1));
        let summary = pipeline.run_all(dir.path(), &npm_detection()).await;

        assert_eq!(summary.status(Phase::Environment), PhaseStatus::Succeeded);
        assert_eq!(summary.status(Phase::Dependencies), PhaseStatus::Failed);
        assert_eq!(summary.status(Phase::Build), PhaseStatus::NotReached);
        assert_eq!(summary.status(Phase::Run), PhaseStatus::NotReached);
        assert_eq!(
            summary.error,
            Some(BuildError::PhaseFailed {
                phase: Phase::Dependencies,
                stderr: "ERESOLVE unable to resolve".to_string(),
            })
        );
        assert!(!summary.success());
        assert_eq!(summary.access_url(), None);
    }

    #[tokio::test]
    async fn test_error_is_passed_through_unchanged() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        runner.expect_start().never();
        let pipeline = BuildPipeline::new(runner, Duration::from_secs(1));

        let err = BuildError::MissingWorkspace(PathBuf::from("/gone"));
        let result = pipeline.build(Err(err.clone()), &npm_detection().instructions).await;
        assert_eq!(result, Err(err));
    }

    #[tokio::test]
    async fn test_successful_pipeline_uses_start_for_run_phase() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_, _, _| Ok(CommandOutput::exited(0, "ok\n", "")));
        runner
            .expect_start()
            .with(always(), always(), always(), mockall::predicate::eq(Duration::from_secs(2)))
            .times(1)
            .returning(|_, _, _, _| Ok(CommandOutput::running()));

        let pipeline = BuildPipeline::new(runner, Duration::from_secs(2));
        let summary = pipeline.run_all(dir.path(), &npm_detection()).await;

        assert!(summary.success());
        assert_eq!(summary.access_url().as_deref(), Some("http://localhost:3000"));
        assert_eq!(summary.report(Phase::Build).unwrap().stdout, "ok\n");
    }

    #[tokio::test]
    async fn test_empty_phases_are_skipped_not_failed() {
        let dir = TempDir::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        runner.expect_start().never();

        let pipeline = BuildPipeline::new(runner, Duration::from_secs(1));
        let summary = pipeline.run_all(dir.path(), &detect(dir.path())).await;

        assert!(summary.success());
        for phase in [Phase::Dependencies, Phase::Build, Phase::Run] {
            assert_eq!(summary.status(phase), PhaseStatus::Skipped);
        }
    }

    #[tokio::test]
    async fn test_missing_workspace_fails_environment() {
        let runner = MockCommandRunner::new();
        let pipeline = BuildPipeline::new(runner, Duration::from_secs(1));
        let summary = pipeline.run_all(Path::new("/nonexistent/checkout"), &npm_detection()).await;

        assert!(summary.reports.is_empty());
        assert!(matches!(summary.error, Some(BuildError::MissingWorkspace(_))));
    }

    #[tokio::test]
    async fn test_python_environment_notes() {
        let dir = TempDir::new().unwrap();
        let detection = Detection {
            frameworks: vec!["flask".to_string()],
            build_system: BuildSystem::Pip,
            application_type: ApplicationType::Flask,
            ..npm_detection()
        };
        let pipeline = BuildPipeline::new(MockCommandRunner::new(), Duration::from_secs(1));
        let report = pipeline.setup_environment(dir.path(), &detection).await.unwrap();

        assert_eq!(report.notes[0], "python -m venv venv");
        assert!(report.notes.contains(&"# Python web application detected".to_string()));
        assert_eq!(report.env.get("PYTHONPATH"), Some(&dir.path().display().to_string()));
    }
}
