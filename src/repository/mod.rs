//! Cloning, inspecting and classifying GitHub repositories.

pub mod detector;
/// Shallow clones into temporary workspaces
pub mod git;
pub mod inspector;

use crate::builder::BuildSummary;
use crate::clients::github::GitHubRepoInfo;
use crate::error::Result;
use crate::transcript::RepositoryRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::{DirEntry, WalkDir};

pub use detector::{detect, ApplicationType, BuildInstructions, BuildSystem, CommandLine, Detection};
pub use inspector::{inspect, Dependency, Inspection, LicenseKind};

/// Directory names never descended into while walking a checkout
pub const SKIPPED_DIRS: &[&str] = &[
    "node_modules", "target", "venv", ".venv", "env", "__pycache__", "dist", "build", "vendor",
];

/// A temporary directory holding one clone, removed when dropped
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    checkout: PathBuf,
}

impl Workspace {
    /// Creates an empty workspace whose checkout lives at `<tmp>/<name>`
    pub fn new(name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("contentmonetizer-").tempdir()?;
        let checkout = dir.path().join(name);
        Ok(Self { dir, checkout })
    }

    /// Path of the checkout inside the workspace
    pub fn path(&self) -> &Path {
        &self.checkout
    }

    /// Root of the temporary directory
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Everything learned about one repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Account or organisation
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Canonical GitHub URL
    pub url: String,
    /// Where the clone lived during the run
    pub local_path: Option<PathBuf>,
    /// Metadata from the GitHub API
    pub github: Option<GitHubRepoInfo>,
    /// Language byte counts, from GitHub or from the checkout
    pub languages: BTreeMap<String, u64>,
    /// Frameworks found in the manifests
    pub frameworks: Vec<String>,
    /// Declared dependencies
    pub dependencies: Vec<Dependency>,
    /// README text
    pub readme: String,
    /// File tree inspection of the checkout
    pub inspection: Option<Inspection>,
    /// Build system, application type and commands
    pub detection: Option<Detection>,
    /// Outcome of the build pipeline, when it ran
    pub build: Option<BuildSummary>,
    /// Enrichment steps that failed, as messages
    pub errors: Vec<String>,
}

impl RepositoryRecord {
    /// Starts a record from a detected reference
    pub fn from_ref(reference: &RepositoryRef) -> Self {
        Self {
            owner: reference.owner.clone(),
            repo: reference.repo.clone(),
            url: reference.url.clone(),
            ..Self::default()
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Language with the most bytes, if any
    pub fn primary_language(&self) -> Option<&str> {
        self.languages
            .iter()
            .max_by_key(|(_, bytes)| **bytes)
            .map(|(lang, _)| lang.as_str())
    }

    /// Application type from detection, `Unknown` if detection did not run
    pub fn application_type(&self) -> ApplicationType {
        self.detection
            .as_ref()
            .map(|d| d.application_type)
            .unwrap_or(ApplicationType::Unknown)
    }

    /// Stargazer count, zero without GitHub metadata
    pub fn stars(&self) -> u64 {
        self.github.as_ref().map_or(0, |g| g.stars)
    }

    /// Fork count, zero without GitHub metadata
    pub fn forks(&self) -> u64 {
        self.github.as_ref().map_or(0, |g| g.forks)
    }
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|s| SKIPPED_DIRS.contains(&s))
            .unwrap_or(false)
}

/// Regular files under `root`, skipping hidden entries and dependency directories
///
/// Unreadable entries are skipped.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_skipped_dir(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
}

/// Programming language for a file extension, `None` for data and docs
pub(crate) fn extension_to_language(ext: &str) -> Option<&'static str> {
    let lang = match ext.to_lowercase().as_str() {
        "rs" => "Rust",
        "py" => "Python",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "java" => "Java",
        "kt" => "Kotlin",
        "scala" => "Scala",
        "cpp" | "cc" | "cxx" | "hpp" => "C++",
        "c" | "h" => "C",
        "cs" => "C#",
        "go" => "Go",
        "rb" => "Ruby",
        "php" => "PHP",
        "swift" => "Swift",
        "dart" => "Dart",
        "vue" => "Vue",
        "svelte" => "Svelte",
        "sh" | "bash" | "zsh" => "Shell",
        "html" | "htm" => "HTML",
        "css" | "scss" | "sass" => "CSS",
        "ipynb" => "Jupyter Notebook",
        _ => return None,
    };
    Some(lang)
}
