use crate::clients::github::parse_repo_url;
use crate::error::{PipelineError, Result};
use log::info;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

use super::Workspace;

/// Rewrites `git@github.com:` SSH remotes to HTTPS and drops a `.git` suffix
pub fn normalize_git_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = match url.strip_prefix("git@github.com:") {
        Some(rest) => format!("https://github.com/{}", rest),
        None => url.to_string(),
    };
    url.strip_suffix(".git").map(str::to_string).unwrap_or(url)
}

/// Repository name used for the checkout directory
pub fn repo_name_from_url(url: &str) -> Result<String> {
    let (_, repo) = parse_repo_url(&normalize_git_url(url))?;
    Ok(repo)
}

/// Shallow-clones a GitHub repository into a fresh [`Workspace`]
///
/// The workspace, and the clone with it, is removed when the returned value
/// is dropped.
pub async fn clone_repository(url: &str, depth: u32) -> Result<Workspace> {
    let url = normalize_git_url(url);
    let name = repo_name_from_url(&url)?;
    let workspace = Workspace::new(&name)?;

    info!("Cloning {} into {}", url, workspace.path().display());

    let mut command = TokioCommand::new("git");
    command.arg("clone");
    if depth > 0 {
        command.arg("--depth").arg(depth.to_string());
    }
    let output = command
        .arg(&url)
        .arg(workspace.path())
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| PipelineError::Command(format!("failed to start git: {}", e)))?;

    if !output.status.success() {
        return Err(PipelineError::Command(format!(
            "git clone {} failed with exit code {:?}: {}",
            url,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(workspace)
}
