//! File tree inspection of a cloned repository.
//!
//! Like detection, inspection is best-effort: files that cannot be read or
//! parsed contribute nothing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::walk_files;

const MAX_TREE_DEPTH: usize = 3;

const README_NAMES: &[&str] = &["README.md", "README.txt", "readme.md", "README"];
const LICENSE_NAMES: &[&str] = &["LICENSE", "LICENSE.md", "LICENSE.txt", "license.txt", "COPYING"];

/// README headings whose code blocks are treated as build instructions
const INSTRUCTION_SECTIONS: &[&str] = &["## Installation", "## Getting Started", "## Build", "## Run", "## Usage"];

lazy_static! {
    static ref SHELL_BLOCK: Regex =
        Regex::new(r"(?s)```(?:bash|shell|sh)?\n(.*?)\n```").expect("valid code block regex");
    static ref MAKE_TARGET: Regex =
        Regex::new(r"(?m)^([A-Za-z0-9_-]+):").expect("valid make target regex");
    static ref LICENSE_HEADING: Regex =
        Regex::new(r"(?im)^#{1,6}\s*licen[sc]e\b.*$").expect("valid license heading regex");
    static ref LICENSE_PATTERNS: Vec<(LicenseKind, Regex)> = [
        (LicenseKind::Mit, r"\bmit\b"),
        (LicenseKind::Apache, r"apache"),
        (LicenseKind::Gpl, r"\b[al]?gpl(?:v?\d)?\b|\Agnu (?:affero |lesser )?general public license"),
        (LicenseKind::Bsd, r"\bbsd\b"),
        (LicenseKind::Mozilla, r"mozilla|\bmpl\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid license regex")))
    .collect();
}

/// License family recognised from license text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseKind {
    /// MIT
    #[serde(rename = "MIT")]
    Mit,
    /// Apache
    Apache,
    /// GPL family
    #[serde(rename = "GPL")]
    Gpl,
    /// BSD family
    #[serde(rename = "BSD")]
    Bsd,
    /// Mozilla Public License
    Mozilla,
    /// License text present but not recognised
    #[serde(rename = "unknown")]
    Unknown,
    /// No license found
    #[default]
    #[serde(rename = "none")]
    None,
}

impl LicenseKind {
    /// Classifies license text; the first family found in order wins
    pub fn sniff(text: &str) -> Self {
        let lowered = text.trim().to_lowercase();
        LICENSE_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(&lowered))
            .map(|(kind, _)| *kind)
            .unwrap_or(LicenseKind::Unknown)
    }

    /// Name as shown in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mit => "MIT",
            Self::Apache => "Apache",
            Self::Gpl => "GPL",
            Self::Bsd => "BSD",
            Self::Mozilla => "Mozilla",
            Self::Unknown => "unknown",
            Self::None => "none",
        }
    }

    /// Whether any license was found
    pub fn is_present(&self) -> bool {
        *self != Self::None
    }
}

/// Where a dependency is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Runtime dependency
    Production,
    /// Development-only dependency
    Development,
}

/// A dependency declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Version constraint, `latest` when unpinned
    pub version: String,
    /// Package ecosystem, `python` or `javascript`
    pub ecosystem: String,
    /// Production or development, when the manifest says
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DependencyKind>,
}

/// Notable files and directories grouped by purpose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct KeyFiles {
    pub readme: Vec<String>,
    pub license: Vec<String>,
    pub configuration: Vec<String>,
    pub dependency: Vec<String>,
    pub documentation: Vec<String>,
    pub source_code: Vec<String>,
    pub test: Vec<String>,
    pub docker: Vec<String>,
    pub ci_cd: Vec<String>,
}

/// Directory listing; files map to `None`, directories to their own listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirTree(pub BTreeMap<String, Option<DirTree>>);

impl DirTree {
    /// Number of entries at every level
    pub fn len(&self) -> usize {
        self.0
            .values()
            .map(|child| 1 + child.as_ref().map_or(0, DirTree::len))
            .sum()
    }

    /// True when the directory had no visible entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything learned from walking a checkout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    /// Notable files by category
    pub key_files: KeyFiles,
    /// Tree of the first three levels
    pub structure: DirTree,
    /// File counts by lowercase extension
    pub file_types: BTreeMap<String, usize>,
    /// package.json at the root
    pub has_package_json: bool,
    /// requirements.txt at the root
    pub has_requirements_txt: bool,
    /// Dockerfile at the root
    pub has_dockerfile: bool,
    /// Makefile at the root
    pub has_makefile: bool,
    /// Dependencies from requirements.txt and package.json
    pub dependencies: Vec<Dependency>,
    /// Shell lines from the README's setup sections
    pub readme_instructions: Vec<String>,
    /// `npm run <script>` for every package.json script
    pub npm_scripts: Vec<String>,
    /// `make <target>` for every public Makefile target
    pub make_targets: Vec<String>,
    /// License sniffed from the license file or README
    pub license: LicenseKind,
}

/// Walks a checkout and collects key files, structure and manifest data
pub fn inspect(root: &Path) -> Inspection {
    let package_json = read_package_json(root);
    let readme = read_readme(root);

    let inspection = Inspection {
        key_files: identify_key_files(root),
        structure: directory_tree(root, 1),
        file_types: count_file_types(root),
        has_package_json: root.join("package.json").is_file(),
        has_requirements_txt: root.join("requirements.txt").is_file(),
        has_dockerfile: root.join("Dockerfile").is_file(),
        has_makefile: root.join("Makefile").is_file(),
        dependencies: extract_dependencies(root, package_json.as_ref()),
        readme_instructions: readme
            .as_deref()
            .map(extract_readme_instructions)
            .unwrap_or_default(),
        npm_scripts: package_json.as_ref().map(npm_scripts).unwrap_or_default(),
        make_targets: fs::read_to_string(root.join("Makefile"))
            .map(|text| extract_make_targets(&text))
            .unwrap_or_default(),
        license: detect_license(root, readme.as_deref()),
    };

    log::debug!(
        "Inspected {}: {} dependencies, license {}",
        root.display(),
        inspection.dependencies.len(),
        inspection.license.as_str()
    );
    inspection
}

/// Contents of the first README found at the root
pub fn read_readme(root: &Path) -> Option<String> {
    README_NAMES
        .iter()
        .find_map(|name| fs::read_to_string(root.join(name)).ok())
}

fn read_package_json(root: &Path) -> Option<Value> {
    let text = fs::read_to_string(root.join("package.json")).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed package.json in {}: {}", root.display(), e);
            None
        }
    }
}

fn identify_key_files(root: &Path) -> KeyFiles {
    let files = |names: &[&str]| -> Vec<String> {
        names
            .iter()
            .filter(|n| root.join(n).is_file())
            .map(|n| n.to_string())
            .collect()
    };
    let dirs = |names: &[&str]| -> Vec<String> {
        names
            .iter()
            .filter(|n| root.join(n).is_dir())
            .map(|n| n.to_string())
            .collect()
    };
    let top_level_matching = |pred: &dyn Fn(&str) -> bool| -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| pred(n.as_str()))
            .collect();
        names.sort();
        names
    };

    let mut documentation = dirs(&["docs", "documentation"]);
    documentation.extend(top_level_matching(&|n| n.ends_with(".md")));

    let mut source_code = dirs(&["src", "lib", "app"]);
    source_code.extend(files(&["main.py", "index.js"]));

    let mut test = dirs(&["test", "tests"]);
    test.extend(top_level_matching(&|n| n.ends_with("_test.py") || n.ends_with("_spec.js")));

    let mut ci_cd = dirs(&[".github/workflows"]);
    ci_cd.extend(files(&[".gitlab-ci.yml", ".travis.yml", "Jenkinsfile"]));

    KeyFiles {
        readme: files(README_NAMES),
        license: files(LICENSE_NAMES),
        configuration: files(&[".env.example", "config.json", "settings.json", ".gitignore"]),
        dependency: files(&["requirements.txt", "package.json", "Pipfile", "Gemfile", "build.gradle", "pom.xml"]),
        documentation,
        source_code,
        test,
        docker: files(&["Dockerfile", "docker-compose.yml", "docker-compose.yaml"]),
        ci_cd,
    }
}

fn directory_tree(dir: &Path, depth: usize) -> DirTree {
    let mut tree = DirTree::default();
    if depth > MAX_TREE_DEPTH {
        return tree;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return tree;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let child = path.is_dir().then(|| directory_tree(&path, depth + 1));
        tree.0.insert(name, child);
    }
    tree
}

fn count_file_types(root: &Path) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in walk_files(root) {
        if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
            *counts.entry(ext.to_lowercase()).or_insert(0) += 1;
        }
    }
    counts
}

fn extract_dependencies(root: &Path, package_json: Option<&Value>) -> Vec<Dependency> {
    let mut deps = fs::read_to_string(root.join("requirements.txt"))
        .map(|text| parse_requirements(&text))
        .unwrap_or_default();

    if let Some(pkg) = package_json {
        for (key, kind) in [
            ("dependencies", DependencyKind::Production),
            ("devDependencies", DependencyKind::Development),
        ] {
            let Some(entries) = pkg[key].as_object() else {
                continue;
            };
            deps.extend(entries.iter().map(|(name, version)| Dependency {
                name: name.clone(),
                version: version.as_str().unwrap_or("latest").to_string(),
                ecosystem: "javascript".to_string(),
                kind: Some(kind),
            }));
        }
    }
    deps
}

/// One dependency per non-comment line; `name==version` or `latest`
pub fn parse_requirements(text: &str) -> Vec<Dependency> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let parts: Vec<&str> = line.split("==").collect();
            let (name, version) = match parts.as_slice() {
                [name, version] => (*name, *version),
                _ => (line, "latest"),
            };
            Dependency {
                name: name.to_string(),
                version: version.to_string(),
                ecosystem: "python".to_string(),
                kind: None,
            }
        })
        .collect()
}

/// Shell lines from code blocks under the README's setup headings
pub fn extract_readme_instructions(readme: &str) -> Vec<String> {
    let mut instructions = Vec::new();

    for section in INSTRUCTION_SECTIONS {
        let Some(start) = readme.find(section) else {
            continue;
        };
        let body_start = start + section.len();
        let end = INSTRUCTION_SECTIONS
            .iter()
            .filter(|other| *other != section)
            .filter_map(|other| readme[body_start..].find(other).map(|i| body_start + i))
            .min()
            .unwrap_or(readme.len());

        for caps in SHELL_BLOCK.captures_iter(&readme[start..end]) {
            instructions.extend(
                caps[1]
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }
    }
    instructions
}

fn npm_scripts(package_json: &Value) -> Vec<String> {
    package_json["scripts"]
        .as_object()
        .map(|scripts| scripts.keys().map(|name| format!("npm run {}", name)).collect())
        .unwrap_or_default()
}

/// `make <target>` for each rule, skipping dot-prefixed special targets
pub fn extract_make_targets(makefile: &str) -> Vec<String> {
    MAKE_TARGET
        .captures_iter(makefile)
        .map(|caps| caps[1].to_string())
        .filter(|target| !target.starts_with('.'))
        .map(|target| format!("make {}", target))
        .collect()
}

fn detect_license(root: &Path, readme: Option<&str>) -> LicenseKind {
    if let Some(text) = LICENSE_NAMES
        .iter()
        .find_map(|name| fs::read_to_string(root.join(name)).ok())
    {
        return LicenseKind::sniff(&text);
    }

    readme
        .and_then(readme_license_section)
        .map(LicenseKind::sniff)
        .unwrap_or(LicenseKind::None)
}

/// Body of the README's License heading up to the next heading of any level
fn readme_license_section(readme: &str) -> Option<&str> {
    let heading = LICENSE_HEADING.find(readme)?;
    let body = &readme[heading.end()..];
    let end = body
        .match_indices("\n#")
        .map(|(i, _)| i)
        .next()
        .unwrap_or(body.len());
    let section = body[..end].trim();
    (!section.is_empty()).then_some(section)
}
