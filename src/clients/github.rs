use super::{check_status, create_http_client, normalize_base, Api};
use crate::error::{PipelineError, Result};
use base64::Engine;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const GITHUB_API_BASE: &str = "https://api.github.com";

lazy_static! {
    static ref REPO_URL: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?(?:[#?].*)?$"
    ).expect("valid repository URL regex");
}

/// Repository metadata from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GitHubRepoInfo {
    /// `owner/repo`
    pub full_name: String,
    /// Repository description
    pub description: Option<String>,
    /// Primary language reported by GitHub
    pub language: Option<String>,
    /// Stargazer count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Open issue count
    pub open_issues: u64,
    /// Watcher count
    pub watchers: u64,
    /// Default branch name
    pub default_branch: String,
    /// SPDX id of the detected license
    pub license: Option<String>,
    /// Topics
    pub topics: Vec<String>,
    /// Browser URL
    pub html_url: String,
}

/// Splits a GitHub URL into `(owner, repo)`
///
/// Accepts http and https, an optional `www.` prefix, a bare `github.com/...` form,
/// a trailing slash and a `.git` suffix.
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let caps = REPO_URL
        .captures(url.trim())
        .ok_or_else(|| PipelineError::Validation(format!("Invalid GitHub URL: {}", url)))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client for api.github.com
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE)
    }

    /// Creates a client against an alternative endpoint
    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client(token)?,
            base_url: normalize_base(base_url),
        })
    }

    async fn get_json(&self, path: &str, what: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let response = check_status(Api::GitHub, response, what).await?;
        Ok(response.json::<Value>().await?)
    }

    /// Fetches repository metadata
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<GitHubRepoInfo> {
        let data = self
            .get_json(&format!("/repos/{}/{}", owner, repo), &format!("repository {}/{}", owner, repo))
            .await?;

        Ok(GitHubRepoInfo {
            full_name: data["full_name"].as_str().map(String::from).unwrap_or_else(|| format!("{}/{}", owner, repo)),
            description: data["description"].as_str().map(String::from),
            language: data["language"].as_str().map(String::from),
            stars: data["stargazers_count"].as_u64().unwrap_or(0),
            forks: data["forks_count"].as_u64().unwrap_or(0),
            open_issues: data["open_issues_count"].as_u64().unwrap_or(0),
            watchers: data["subscribers_count"].as_u64().unwrap_or(0),
            default_branch: data["default_branch"].as_str().unwrap_or("main").to_string(),
            license: data["license"]["spdx_id"].as_str().map(String::from),
            topics: data["topics"]
                .as_array()
                .map(|t| t.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default(),
            html_url: data["html_url"].as_str().unwrap_or_default().to_string(),
        })
    }

    /// Fetches language byte counts
    pub async fn get_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
        let data = self
            .get_json(&format!("/repos/{}/{}/languages", owner, repo), "languages")
            .await?;

        Ok(data
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter_map(|(lang, bytes)| Some((lang.clone(), bytes.as_u64()?)))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Fetches and decodes the README
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<String> {
        let data = self
            .get_json(&format!("/repos/{}/{}/readme", owner, repo), "readme")
            .await?;

        let encoded: String = data["content"]
            .as_str()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| PipelineError::Parse(format!("README is not valid base64: {}", e)))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Checks the remaining core quota, warning when it is nearly exhausted
    pub async fn check_rate_limit(&self) -> Result<u64> {
        let data = self.get_json("/rate_limit", "rate limit").await?;
        let remaining = data["resources"]["core"]["remaining"].as_u64().unwrap_or(0);

        if remaining < 10 {
            warn!("GitHub API rate limit is low: {} requests remaining", remaining);
        }
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://github.com/tokio-rs/axum" ; "https")]
    #[test_case("http://www.github.com/tokio-rs/axum/" ; "www with slash")]
    #[test_case("github.com/tokio-rs/axum.git" ; "bare with git suffix")]
    #[test_case("https://github.com/tokio-rs/axum#readme" ; "fragment")]
    fn test_parse_repo_url(url: &str) {
        let (owner, repo) = parse_repo_url(url).unwrap();
        assert_eq!(owner, "tokio-rs");
        assert_eq!(repo, "axum");
    }

    #[test]
    fn test_parse_repo_url_keeps_dots_in_names() {
        let (owner, repo) = parse_repo_url("https://github.com/vercel/next.js").unwrap();
        assert_eq!(owner, "vercel");
        assert_eq!(repo, "next.js");
    }

    #[test]
    fn test_parse_repo_url_rejects_other_hosts() {
        assert!(matches!(
            parse_repo_url("https://gitlab.com/group/project"),
            Err(PipelineError::Validation(_))
        ));
        assert!(parse_repo_url("https://github.com/only-owner").is_err());
    }
}
