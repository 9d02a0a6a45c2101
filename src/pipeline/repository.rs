use super::outputs::{RepositoryAnalysis, RepositoryOutcome};
use super::Pipeline;
use crate::builder::{render_setup_document, BuildPipeline};
use crate::clients::github::parse_repo_url;
use crate::error::Result;
use crate::report::{save_json, save_output_file};
use crate::repository::{detect, git, inspect, inspector, RepositoryRecord};
use crate::strategy::{build_monetization, StrategyContext};
use crate::transcript::RepositoryRef;
use chrono::Local;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Setup documents of every repository that went through the build pipeline
pub(super) fn setup_document(repositories: &[RepositoryRecord]) -> Option<String> {
    let documents: Vec<String> = repositories
        .iter()
        .filter_map(|r| r.build.as_ref().map(|build| (r, build)))
        .map(|(r, build)| format!("<!-- {} -->\n\n{}", r.full_name(), render_setup_document(build)))
        .collect();

    if documents.is_empty() {
        None
    } else {
        Some(documents.join("\n---\n\n"))
    }
}

impl Pipeline {
    /// Fills in GitHub metadata for `record`
    ///
    /// Failures are logged and recorded in `record.errors`.
    async fn enrich_from_github(&self, record: &mut RepositoryRecord) {
        let (owner, repo) = (record.owner.clone(), record.repo.clone());

        match self.github.get_repository(&owner, &repo).await {
            Ok(info) => record.github = Some(info),
            Err(e) => {
                warn!(repository = %record.full_name(), error = %e, "No GitHub metadata");
                record.errors.push(format!("metadata: {}", e));
            }
        }
        match self.github.get_languages(&owner, &repo).await {
            Ok(languages) => record.languages = languages,
            Err(e) => record.errors.push(format!("languages: {}", e)),
        }
        match self.github.get_readme(&owner, &repo).await {
            Ok(readme) => record.readme = readme,
            Err(e) => record.errors.push(format!("readme: {}", e)),
        }
    }

    /// Clones the repository and records what inspection, detection and,
    /// when `build` is set, the build pipeline found
    ///
    /// The clone is removed before this returns.
    async fn analyze_checkout(&self, record: &mut RepositoryRecord, build: bool) -> Result<()> {
        let workspace = git::clone_repository(&record.url, self.config.build.clone_depth).await?;
        let root = workspace.path();
        record.local_path = Some(root.to_path_buf());

        let inspection = inspect(root);
        let detection = detect(root);

        if record.readme.is_empty() {
            record.readme = inspector::read_readme(root).unwrap_or_default();
        }
        if record.languages.is_empty() {
            record.languages = detection.languages.clone();
        }
        record.frameworks = detection.frameworks.clone();
        record.dependencies = inspection.dependencies.clone();

        if build {
            let summary = BuildPipeline::system(&self.config.build).run_all(root, &detection).await;
            info!(
                repository = %record.full_name(),
                success = summary.success(),
                "Build pipeline finished"
            );
            record.build = Some(summary);
        }

        record.inspection = Some(inspection);
        record.detection = Some(detection);
        Ok(())
    }

    /// Every optional step for one repository; failures end up in `errors`
    pub(super) async fn collect_repository(&self, mut record: RepositoryRecord, build: bool) -> RepositoryRecord {
        info!(repository = %record.full_name(), "Analyzing repository");
        self.enrich_from_github(&mut record).await;

        if let Err(e) = self.analyze_checkout(&mut record, build).await {
            warn!(repository = %record.full_name(), error = %e, "Could not analyze the checkout");
            record.errors.push(format!("clone: {}", e));
        }
        record
    }

    /// Analyzes one repository on its own
    ///
    /// Writes `<output_root>/repos/<name>_analysis.json`, and with `deploy`
    /// also builds the application and writes `<name>_setup.md`. A failed
    /// clone is an error here.
    #[instrument(skip(self, output_root))]
    pub async fn analyze_repository_url(&self, url: &str, output_root: &Path, deploy: bool) -> Result<RepositoryOutcome> {
        let (owner, repo) = parse_repo_url(url)?;
        let mut record = RepositoryRecord::from_ref(&RepositoryRef::new(&owner, &repo));

        self.enrich_from_github(&mut record).await;
        self.analyze_checkout(&mut record, deploy).await?;

        let market_fit = self.analyzer.analyze_repository_market_fit(&record).await;
        let monetization = build_monetization(&StrategyContext::from_repository(&record), record.inspection.as_ref());

        let repos_dir = output_root.join("repos");
        let setup_file = match &record.build {
            Some(build) => {
                let path = repos_dir.join(format!("{}_setup.md", repo));
                save_output_file(&render_setup_document(build), &path).await?;
                Some(path)
            }
            None => None,
        };
        let build_succeeded = record.build.as_ref().map(|b| b.success());

        let analysis = RepositoryAnalysis {
            repository: record,
            market_fit,
            monetization,
            analyzed_at: Local::now().to_rfc3339(),
        };
        let analysis_file = repos_dir.join(format!("{}_analysis.json", repo));
        save_json(&analysis, &analysis_file).await?;

        info!(file = %analysis_file.display(), "Repository analysis saved");
        Ok(RepositoryOutcome {
            name: repo,
            analysis_file,
            setup_file,
            build_succeeded,
        })
    }
}
