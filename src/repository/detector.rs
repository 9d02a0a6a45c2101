//! Build system, application type and command inference for a checkout.
//!
//! Every decision is a first-match lookup in an ordered table. Detection
//! never fails: unreadable or malformed files read as absent signals.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use super::{extension_to_language, walk_files};

/// Package or build tool inferred from manifest files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    /// npm with package.json
    Npm,
    /// yarn with package.json and yarn.lock
    Yarn,
    /// pip with requirements.txt
    Pip,
    /// pipenv with Pipfile
    Pipenv,
    /// poetry with pyproject.toml and poetry.lock
    Poetry,
    /// Maven with pom.xml
    Maven,
    /// Gradle with build.gradle
    Gradle,
    /// Cargo with Cargo.toml
    Cargo,
    /// Go modules with go.mod
    Go,
    /// make with a Makefile
    Make,
    /// Nothing recognised
    Unknown,
}

impl BuildSystem {
    /// Lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pip => "pip",
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Make => "make",
            Self::Unknown => "unknown",
        }
    }

    /// npm or yarn
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Npm | Self::Yarn)
    }

    /// pip, pipenv or poetry
    pub fn is_python(&self) -> bool {
        matches!(self, Self::Pip | Self::Pipenv | Self::Poetry)
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web or ML framework inferred from manifest contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    /// React
    React,
    /// Vue
    Vue,
    /// Angular
    Angular,
    /// Express
    Express,
    /// Next.js
    NextJs,
    /// Django
    Django,
    /// Flask
    Flask,
    /// FastAPI
    FastApi,
    /// PyTorch
    PyTorch,
    /// TensorFlow
    TensorFlow,
    /// Spring Boot
    #[serde(rename = "spring-boot")]
    SpringBoot,
    /// Nothing recognised
    Unknown,
}

impl ApplicationType {
    /// Lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Express => "express",
            Self::NextJs => "nextjs",
            Self::Django => "django",
            Self::Flask => "flask",
            Self::FastApi => "fastapi",
            Self::PyTorch => "pytorch",
            Self::TensorFlow => "tensorflow",
            Self::SpringBoot => "spring-boot",
            Self::Unknown => "unknown",
        }
    }

    /// Browser-facing JavaScript frameworks
    pub fn is_frontend(&self) -> bool {
        matches!(self, Self::React | Self::Vue | Self::Angular | Self::NextJs)
    }

    /// Server-side web frameworks
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Django | Self::Flask | Self::FastApi | Self::Express | Self::SpringBoot)
    }

    /// Machine learning frameworks
    pub fn is_machine_learning(&self) -> bool {
        matches!(self, Self::PyTorch | Self::TensorFlow)
    }

    /// Port the framework's dev server listens on by default
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::React | Self::Vue | Self::Angular | Self::NextJs | Self::Express => Some(3000),
            Self::Django => Some(8000),
            Self::Flask | Self::FastApi => Some(5000),
            Self::SpringBoot => Some(8080),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command as an argv vector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    /// Builds a command from its arguments
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(argv.into_iter().map(Into::into).collect())
    }

    /// Executable name
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Full argv
    pub fn argv(&self) -> &[String] {
        &self.0
    }
}

impl<const N: usize> From<[&str; N]> for CommandLine {
    fn from(argv: [&str; N]) -> Self {
        Self::new(argv)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Commands for each build phase; an empty list means nothing to do
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInstructions {
    /// Dependency installation
    pub dependencies: Vec<CommandLine>,
    /// Compilation or bundling
    pub build: Vec<CommandLine>,
    /// Starting the application
    pub run: Vec<CommandLine>,
}

impl BuildInstructions {
    /// True when no phase has a command
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.build.is_empty() && self.run.is_empty()
    }
}

/// Result of inspecting a checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Source bytes per language
    pub languages: BTreeMap<String, u64>,
    /// Every framework found in the manifests, in discovery order
    pub frameworks: Vec<String>,
    /// Build tool
    pub build_system: BuildSystem,
    /// Primary framework
    pub application_type: ApplicationType,
    /// Commands per phase
    pub instructions: BuildInstructions,
    /// Port a started web application is expected on
    pub web_port: Option<u16>,
}

/// A file-presence test
enum Marker {
    File(&'static str),
    AllOf(&'static [&'static str]),
}

impl Marker {
    fn matches(&self, root: &Path) -> bool {
        match self {
            Marker::File(name) => root.join(name).is_file(),
            Marker::AllOf(names) => names.iter().all(|n| root.join(n).is_file()),
        }
    }
}

/// Checked top to bottom; the first matching marker decides
const BUILD_SYSTEM_RULES: &[(Marker, BuildSystem)] = &[
    (Marker::AllOf(&["package.json", "yarn.lock"]), BuildSystem::Yarn),
    (Marker::File("package.json"), BuildSystem::Npm),
    (Marker::File("requirements.txt"), BuildSystem::Pip),
    (Marker::File("Pipfile"), BuildSystem::Pipenv),
    (Marker::AllOf(&["pyproject.toml", "poetry.lock"]), BuildSystem::Poetry),
    (Marker::File("pom.xml"), BuildSystem::Maven),
    (Marker::File("build.gradle"), BuildSystem::Gradle),
    (Marker::File("Cargo.toml"), BuildSystem::Cargo),
    (Marker::File("go.mod"), BuildSystem::Go),
    (Marker::File("Makefile"), BuildSystem::Make),
];

/// package.json dependency names
const NODE_FRAMEWORKS: &[(&str, ApplicationType)] = &[
    ("react", ApplicationType::React),
    ("vue", ApplicationType::Vue),
    ("angular", ApplicationType::Angular),
    ("express", ApplicationType::Express),
    ("next", ApplicationType::NextJs),
];

/// Lowercase substrings of requirements.txt
const PYTHON_FRAMEWORKS: &[(&[&str], ApplicationType)] = &[
    (&["django"], ApplicationType::Django),
    (&["flask"], ApplicationType::Flask),
    (&["fastapi"], ApplicationType::FastApi),
    (&["pytorch", "torch"], ApplicationType::PyTorch),
    (&["tensorflow"], ApplicationType::TensorFlow),
];

/// Script keys tried for the run phase, in priority order
const RUN_SCRIPTS: &[&str] = &["start", "serve", "dev"];

const PYTHON_ENTRY_POINTS: &[&str] = &["app.py", "main.py"];

const COMPOSE_FILES: &[&str] = &["docker-compose.yml", "docker-compose.yaml"];

/// Manifest contents read once per detection
struct Manifests {
    package_json: Option<Value>,
    requirements: Option<String>,
    pom: Option<String>,
}

impl Manifests {
    fn read(root: &Path) -> Self {
        Self {
            package_json: fs::read_to_string(root.join("package.json"))
                .ok()
                .and_then(|s| serde_json::from_str(&s).ok()),
            requirements: fs::read_to_string(root.join("requirements.txt"))
                .ok()
                .map(|s| s.to_lowercase()),
            pom: fs::read_to_string(root.join("pom.xml")).ok(),
        }
    }

    /// dependencies merged with devDependencies
    fn node_dependencies(&self) -> BTreeSet<String> {
        let Some(pkg) = &self.package_json else {
            return BTreeSet::new();
        };
        ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|key| pkg[*key].as_object())
            .flat_map(|deps| deps.keys().cloned())
            .collect()
    }

    fn has_script(&self, name: &str) -> bool {
        self.package_json
            .as_ref()
            .map_or(false, |pkg| pkg["scripts"].get(name).is_some())
    }

    fn node_matches(&self, deps: &BTreeSet<String>) -> Vec<ApplicationType> {
        NODE_FRAMEWORKS
            .iter()
            .filter(|(name, _)| {
                let scoped = format!("@{}/", name);
                deps.contains(*name) || deps.iter().any(|d| d.starts_with(&scoped))
            })
            .map(|(_, app)| *app)
            .collect()
    }

    fn python_matches(&self) -> Vec<ApplicationType> {
        let Some(text) = &self.requirements else {
            return Vec::new();
        };
        PYTHON_FRAMEWORKS
            .iter()
            .filter(|(needles, _)| needles.iter().any(|n| text.contains(n)))
            .map(|(_, app)| *app)
            .collect()
    }

    fn is_spring_boot(&self) -> bool {
        self.pom.as_deref().map_or(false, |p| p.contains("spring-boot"))
    }
}

/// Inspects a checkout and infers how to build and run it
pub fn detect(root: &Path) -> Detection {
    let manifests = Manifests::read(root);
    let build_system = detect_build_system(root);
    let frameworks = detect_frameworks(&manifests);
    let application_type = resolve_application_type(&manifests);
    let instructions = synthesize_instructions(root, build_system, application_type, &manifests);

    let web_port = if instructions.run.iter().any(|c| c.program() == Some("docker-compose")) {
        Some(80)
    } else {
        application_type.default_port()
    };

    let detection = Detection {
        languages: detect_languages(root),
        frameworks: frameworks.iter().map(|f| f.as_str().to_string()).collect(),
        build_system,
        application_type,
        instructions,
        web_port,
    };

    log::info!(
        "Detected build system {} and application type {} in {}",
        detection.build_system,
        detection.application_type,
        root.display()
    );
    detection
}

/// First matching rule of [`BUILD_SYSTEM_RULES`]
pub fn detect_build_system(root: &Path) -> BuildSystem {
    BUILD_SYSTEM_RULES
        .iter()
        .find(|(marker, _)| marker.matches(root))
        .map(|(_, system)| *system)
        .unwrap_or(BuildSystem::Unknown)
}

/// First framework found: package.json, then requirements.txt, then pom.xml
pub fn detect_application_type(root: &Path) -> ApplicationType {
    resolve_application_type(&Manifests::read(root))
}

fn resolve_application_type(manifests: &Manifests) -> ApplicationType {
    if manifests.package_json.is_some() {
        if let Some(app) = manifests.node_matches(&manifests.node_dependencies()).first() {
            return *app;
        }
    }
    if let Some(app) = manifests.python_matches().first() {
        return *app;
    }
    if manifests.is_spring_boot() {
        return ApplicationType::SpringBoot;
    }
    ApplicationType::Unknown
}

fn detect_frameworks(manifests: &Manifests) -> Vec<ApplicationType> {
    let mut found = manifests.node_matches(&manifests.node_dependencies());
    found.extend(manifests.python_matches());
    if manifests.is_spring_boot() {
        found.push(ApplicationType::SpringBoot);
    }
    found
}

fn detect_languages(root: &Path) -> BTreeMap<String, u64> {
    let mut languages = BTreeMap::new();
    for entry in walk_files(root) {
        let Some(lang) = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(extension_to_language)
        else {
            continue;
        };
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        *languages.entry(lang.to_string()).or_insert(0) += size;
    }
    languages
}

fn first_existing<'a>(root: &Path, candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|c| root.join(c).is_file())
}

fn synthesize_instructions(
    root: &Path,
    build_system: BuildSystem,
    application_type: ApplicationType,
    manifests: &Manifests,
) -> BuildInstructions {
    let mut out = BuildInstructions::default();

    match build_system {
        BuildSystem::Npm | BuildSystem::Yarn => {
            let mgr = build_system.as_str();
            out.dependencies.push(CommandLine::from([mgr, "install"]));
            if manifests.has_script("build") {
                out.build.push(CommandLine::from([mgr, "run", "build"]));
            }
            if let Some(script) = RUN_SCRIPTS.iter().find(|s| manifests.has_script(s)) {
                out.run.push(match *script {
                    "start" => CommandLine::from([mgr, "start"]),
                    other => CommandLine::from([mgr, "run", other]),
                });
            }
        }
        BuildSystem::Pip => {
            out.dependencies.push(CommandLine::from(["pip", "install", "-r", "requirements.txt"]));
            if application_type == ApplicationType::Django && root.join("manage.py").is_file() {
                out.run.push(CommandLine::from(["python", "manage.py", "migrate"]));
                out.run.push(CommandLine::from(["python", "manage.py", "runserver"]));
            } else if let Some(entry) = first_existing(root, PYTHON_ENTRY_POINTS) {
                out.run.push(CommandLine::from(["python", entry]));
            }
        }
        BuildSystem::Pipenv => {
            out.dependencies.push(CommandLine::from(["pipenv", "install"]));
            if let Some(entry) = first_existing(root, PYTHON_ENTRY_POINTS) {
                out.run.push(CommandLine::from(["pipenv", "run", "python", entry]));
            }
        }
        BuildSystem::Poetry => {
            out.dependencies.push(CommandLine::from(["poetry", "install"]));
            if let Some(entry) = first_existing(root, PYTHON_ENTRY_POINTS) {
                out.run.push(CommandLine::from(["poetry", "run", "python", entry]));
            }
        }
        BuildSystem::Maven => {
            out.dependencies.push(CommandLine::from(["mvn", "clean", "install"]));
            if application_type == ApplicationType::SpringBoot {
                out.run.push(CommandLine::from(["mvn", "spring-boot:run"]));
            } else {
                out.run.push(CommandLine::from(["sh", "-c", "java -jar target/*.jar"]));
            }
        }
        BuildSystem::Gradle => {
            let gradle = if root.join("gradlew").is_file() { "./gradlew" } else { "gradle" };
            out.build.push(CommandLine::from([gradle, "build"]));
            out.run.push(CommandLine::from([gradle, "run"]));
        }
        BuildSystem::Cargo => {
            out.dependencies.push(CommandLine::from(["cargo", "fetch"]));
            out.build.push(CommandLine::from(["cargo", "build", "--release"]));
            out.run.push(CommandLine::from(["cargo", "run", "--release"]));
        }
        BuildSystem::Go => {
            out.dependencies.push(CommandLine::from(["go", "mod", "download"]));
            out.build.push(CommandLine::from(["go", "build", "./..."]));
            out.run.push(CommandLine::from(["go", "run", "."]));
        }
        BuildSystem::Make => {
            out.build.push(CommandLine::from(["make"]));
            let binary = if root.join("bin/main").is_file() { "./bin/main" } else { "./main" };
            out.run.push(CommandLine::from([binary]));
        }
        BuildSystem::Unknown => {
            if first_existing(root, COMPOSE_FILES).is_some() {
                out.run.push(CommandLine::from(["docker-compose", "up"]));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    fn repo(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test_case(&["package.json", "yarn.lock"], BuildSystem::Yarn ; "yarn lock beats npm")]
    #[test_case(&["package.json"], BuildSystem::Npm ; "npm")]
    #[test_case(&["requirements.txt"], BuildSystem::Pip ; "pip")]
    #[test_case(&["Pipfile"], BuildSystem::Pipenv ; "pipenv")]
    #[test_case(&["pyproject.toml", "poetry.lock"], BuildSystem::Poetry ; "poetry")]
    #[test_case(&["pyproject.toml"], BuildSystem::Unknown ; "pyproject without lock")]
    #[test_case(&["pom.xml"], BuildSystem::Maven ; "maven")]
    #[test_case(&["build.gradle"], BuildSystem::Gradle ; "gradle")]
    #[test_case(&["Cargo.toml"], BuildSystem::Cargo ; "cargo")]
    #[test_case(&["go.mod"], BuildSystem::Go ; "go")]
    #[test_case(&["Makefile"], BuildSystem::Make ; "make")]
    #[test_case(&["requirements.txt", "Makefile", "go.mod"], BuildSystem::Pip ; "pip before go and make")]
    #[test_case(&["package.json", "requirements.txt"], BuildSystem::Npm ; "npm before pip")]
    fn test_build_system_priority(markers: &[&str], expected: BuildSystem) {
        let files: Vec<(&str, &str)> = markers.iter().map(|m| (*m, "{}")).collect();
        let dir = repo(&files);
        assert_eq!(detect_build_system(dir.path()), expected);
    }

    #[test]
    fn test_malformed_package_json_degrades_to_unknown_type() {
        let dir = repo(&[("package.json", "{ not json")]);
        let detection = detect(dir.path());

        assert_eq!(detection.build_system, BuildSystem::Npm);
        assert_eq!(detection.application_type, ApplicationType::Unknown);
        assert_eq!(detection.instructions.dependencies, vec![CommandLine::from(["npm", "install"])]);
        assert!(detection.instructions.run.is_empty());
    }

    #[test]
    fn test_scoped_angular_package_counts_as_angular() {
        let dir = repo(&[("package.json", r#"{"dependencies": {"@angular/core": "^17.0.0"}}"#)]);
        assert_eq!(detect_application_type(dir.path()), ApplicationType::Angular);
    }

    #[test]
    fn test_next_maps_to_nextjs_after_react() {
        let dir = repo(&[(
            "package.json",
            r#"{"dependencies": {"next": "14.0.0", "react": "18.2.0"}}"#,
        )]);
        let detection = detect(dir.path());
        assert_eq!(detection.application_type, ApplicationType::React);
        assert_eq!(detection.frameworks, vec!["react", "nextjs"]);
    }

    #[test]
    fn test_npm_start_script_wins_over_dev() {
        let dir = repo(&[(
            "package.json",
            r#"{"scripts": {"dev": "vite", "start": "node server.js", "build": "vite build"}}"#,
        )]);
        let instructions = detect(dir.path()).instructions;

        assert_eq!(instructions.build, vec![CommandLine::from(["npm", "run", "build"])]);
        assert_eq!(instructions.run, vec![CommandLine::from(["npm", "start"])]);
    }

    #[test_case(false, &["npm", "run", "dev"] ; "npm")]
    #[test_case(true, &["yarn", "run", "dev"] ; "yarn")]
    fn test_dev_only_script(yarn: bool, expected: &[&str]) {
        let mut files = vec![("package.json", r#"{"scripts": {"dev": "vite"}}"#)];
        if yarn {
            files.push(("yarn.lock", ""));
        }
        let detection = detect(repo(&files).path());
        assert_eq!(detection.instructions.run, vec![CommandLine::new(expected.iter().copied())]);
    }

    #[test]
    fn test_django_matches_in_any_case() {
        let dir = repo(&[("requirements.txt", "DJANGO-Environ\n")]);
        assert_eq!(detect(dir.path()).application_type, ApplicationType::Django);
    }

    #[test]
    fn test_serve_script_uses_run() {
        let dir = repo(&[
            ("package.json", r#"{"scripts": {"serve": "vue-cli-service serve"}}"#),
            ("yarn.lock", ""),
        ]);
        assert_eq!(
            detect(dir.path()).instructions.run,
            vec![CommandLine::from(["yarn", "run", "serve"])]
        );
    }

    #[test]
    fn test_django_with_manage_py() {
        let dir = repo(&[("requirements.txt", "Django==4.2\n"), ("manage.py", "")]);
        let detection = detect(dir.path());

        assert_eq!(detection.application_type, ApplicationType::Django);
        assert_eq!(detection.web_port, Some(8000));
        assert_eq!(
            detection.instructions.run,
            vec![
                CommandLine::from(["python", "manage.py", "migrate"]),
                CommandLine::from(["python", "manage.py", "runserver"]),
            ]
        );
    }

    #[test]
    fn test_flask_runs_app_py() {
        let dir = repo(&[("requirements.txt", "flask\n"), ("main.py", ""), ("app.py", "")]);
        let detection = detect(dir.path());

        assert_eq!(detection.application_type, ApplicationType::Flask);
        assert_eq!(detection.instructions.run, vec![CommandLine::from(["python", "app.py"])]);
    }

    #[test]
    fn test_torch_substring_means_pytorch() {
        let dir = repo(&[("requirements.txt", "torch>=2.0\nnumpy\n")]);
        assert_eq!(detect_application_type(dir.path()), ApplicationType::PyTorch);
    }

    #[test]
    fn test_spring_boot_maven() {
        let dir = repo(&[("pom.xml", "<artifactId>spring-boot-starter-web</artifactId>")]);
        let detection = detect(dir.path());

        assert_eq!(detection.application_type, ApplicationType::SpringBoot);
        assert_eq!(detection.instructions.run, vec![CommandLine::from(["mvn", "spring-boot:run"])]);
    }

    #[test]
    fn test_make_prefers_bin_main() {
        let dir = repo(&[("Makefile", "all:\n\tcc main.c\n"), ("bin/main", "")]);
        let instructions = detect(dir.path()).instructions;

        assert_eq!(instructions.build, vec![CommandLine::from(["make"])]);
        assert_eq!(instructions.run, vec![CommandLine::from(["./bin/main"])]);
    }

    #[test]
    fn test_compose_only_repository() {
        let dir = repo(&[("docker-compose.yml", "services: {}")]);
        let detection = detect(dir.path());

        assert_eq!(detection.build_system, BuildSystem::Unknown);
        assert_eq!(detection.instructions.run, vec![CommandLine::from(["docker-compose", "up"])]);
        assert_eq!(detection.web_port, Some(80));
    }

    #[test]
    fn test_languages_count_source_bytes() {
        let dir = repo(&[("src/lib.rs", "fn main() {}"), ("README.md", "# hi"), ("app.py", "print(1)")]);
        let languages = detect(dir.path()).languages;

        assert_eq!(languages.get("Rust"), Some(&12));
        assert_eq!(languages.get("Python"), Some(&8));
        assert!(!languages.contains_key("Markdown"));
    }

    #[test]
    fn test_checkout_named_like_a_skipped_dir_is_still_walked() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("build");
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("app.py"), "print(1)").unwrap();
        fs::write(root.join("requirements.txt"), "flask\n").unwrap();
        fs::write(root.join("build/generated.py"), "x = 1").unwrap();

        let detection = detect(&root);
        assert_eq!(detection.build_system, BuildSystem::Pip);
        assert_eq!(detection.languages.get("Python"), Some(&8));

        let inspection = crate::repository::inspect(&root);
        assert_eq!(inspection.file_types.get("py"), Some(&1));
        assert_eq!(inspection.file_types.get("txt"), Some(&1));
    }

    #[test]
    fn test_command_line_display_and_parts() {
        let cmd = CommandLine::from(["pip", "install", "-r", "requirements.txt"]);
        assert_eq!(cmd.to_string(), "pip install -r requirements.txt");
        assert_eq!(cmd.program(), Some("pip"));
        assert_eq!(cmd.args().len(), 3);
        assert_eq!(serde_json::to_string(&cmd).unwrap(), r#"["pip","install","-r","requirements.txt"]"#);
    }

    #[test]
    fn test_enum_serialization_names() {
        assert_eq!(serde_json::to_string(&ApplicationType::SpringBoot).unwrap(), "\"spring-boot\"");
        assert_eq!(serde_json::to_string(&ApplicationType::NextJs).unwrap(), "\"nextjs\"");
        assert_eq!(serde_json::to_string(&BuildSystem::Pipenv).unwrap(), "\"pipenv\"");
    }
}
