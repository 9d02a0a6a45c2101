use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Technologies recognised in titles, descriptions and transcripts
pub const TECHNOLOGIES: &[&str] = &[
    "Python", "JavaScript", "TypeScript", "Java", "C#", "C++", "Go", "Rust",
    "React", "Angular", "Vue", "Next.js", "Svelte", "Node.js", "Express",
    "Django", "Flask", "FastAPI", "Spring Boot", "ASP.NET",
    "TensorFlow", "PyTorch", "scikit-learn", "Keras",
    "Docker", "Kubernetes", "AWS", "Azure", "GCP",
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
];

lazy_static! {
    static ref GITHUB_URL: Regex = Regex::new(
        r"(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_-]+)/([A-Za-z0-9_.-]+)"
    ).expect("valid GitHub URL regex");

    static ref TECHNOLOGY_PATTERNS: Vec<(&'static str, Regex)> = TECHNOLOGIES
        .iter()
        .map(|tech| {
            let pattern = format!(
                r"(?i)(?:^|[^A-Za-z0-9_]){}(?:$|[^A-Za-z0-9_+#])",
                regex::escape(tech)
            );
            (*tech, Regex::new(&pattern).expect("valid technology regex"))
        })
        .collect();
}

/// A GitHub repository referenced in video text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    /// Account or organisation
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Canonical `https://github.com/{owner}/{repo}` URL
    pub url: String,
}

impl RepositoryRef {
    /// Builds a reference with a canonical URL
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            url: format!("https://github.com/{}/{}", owner, repo),
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Finds GitHub repository links, deduplicated case-insensitively in first-seen order
pub fn detect_github_repositories(text: &str) -> Vec<RepositoryRef> {
    let mut seen = HashSet::new();
    let mut repos = Vec::new();

    for caps in GITHUB_URL.captures_iter(text) {
        let owner = &caps[1];
        let repo = caps[2].trim_end_matches('.');
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            continue;
        }

        if seen.insert(format!("{}/{}", owner, repo).to_lowercase()) {
            repos.push(RepositoryRef::new(owner, repo));
        }
    }
    repos
}

/// Technologies from [`TECHNOLOGIES`] mentioned anywhere in the text, in list order
pub fn detect_technologies(text: &str) -> Vec<String> {
    TECHNOLOGY_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(tech, _)| tech.to_string())
        .collect()
}
