//! End-to-end processing of videos, channels and repositories.

/// File names and JSON shapes of everything a run writes
pub mod outputs;
mod repository;

use crate::clients::{GitHubClient, HttpCommunityStats, YouTubeClient};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::report::{self, generate_social_content, generate_video_markdown, save_json, save_output_file, Summarizer};
use crate::repository::RepositoryRecord;
use crate::strategy::{build_monetization, StrategyContext};
use crate::transcript::{self, Transcript, TranscriptSource, YouTubeTranscriptSource};
use crate::trends::{generate_trend_report, render_trend_markdown, StaticMarketData, TrendAnalyzer};
use chrono::Local;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

pub use outputs::*;

/// Clients, configuration and analyzers shared by every run
pub struct Pipeline {
    config: Config,
    youtube: Option<YouTubeClient>,
    github: GitHubClient,
    transcripts: Box<dyn TranscriptSource>,
    analyzer: TrendAnalyzer,
    summarizer: Option<Summarizer>,
}

impl Pipeline {
    /// Builds every client from `config`
    ///
    /// A missing YouTube key is only reported when a video or channel is processed.
    pub fn new(config: Config) -> Result<Self> {
        let youtube = config
            .api_keys
            .youtube_api_key
            .as_deref()
            .map(|key| YouTubeClient::with_base_url(key, &config.youtube_api_base))
            .transpose()?;
        let github = GitHubClient::with_base_url(config.github_token(), &config.github_api_base)?;
        let stats = HttpCommunityStats::new(&config.stack_exchange_api_base, &config.npm_api_base)?;
        let analyzer = TrendAnalyzer::new(Box::new(StaticMarketData), Box::new(stats));
        let summarizer = Summarizer::new(config.api_keys.openai_api_key.as_deref(), &config.openai_model);

        Ok(Self {
            youtube,
            github,
            transcripts: Box::new(YouTubeTranscriptSource::new()?),
            analyzer,
            summarizer,
            config,
        })
    }

    /// Assembles a pipeline from explicit parts, without a summarizer
    pub fn from_parts(
        config: Config,
        youtube: Option<YouTubeClient>,
        github: GitHubClient,
        transcripts: Box<dyn TranscriptSource>,
        analyzer: TrendAnalyzer,
    ) -> Self {
        Self { config, youtube, github, transcripts, analyzer, summarizer: None }
    }

    /// Configuration the pipeline was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn youtube(&self) -> Result<&YouTubeClient> {
        self.youtube
            .as_ref()
            .ok_or_else(|| PipelineError::MissingCredential("YOUTUBE_API_KEY".into()))
    }

    async fn fetch_transcript(&self, video_id: &str) -> Option<Transcript> {
        match self.transcripts.fetch(video_id, &self.config.transcript_languages).await {
            Ok(transcript) => {
                info!(video_id, segments = transcript.segments.len(), "Transcript retrieved");
                Some(transcript)
            }
            Err(e) => {
                warn!(video_id, error = %e, "No transcript, continuing without it");
                None
            }
        }
    }

    /// Runs every stage for one video and writes its files into `output_dir`
    #[instrument(skip(self, output_dir))]
    pub async fn process_video(&self, video_id: &str, output_dir: &Path) -> Result<VideoOutcome> {
        let mut video = self.youtube()?.get_video_details(video_id).await?;

        let transcript = self.fetch_transcript(video_id).await;
        let context = format!("{}\n{}", video.title, video.description);
        let analysis = transcript::analyze(transcript.as_ref(), &context, self.config.keyword_limit);
        video.transcript = analysis.full_text.clone();
        video.keywords = analysis.keywords.clone();

        let mut repositories = Vec::with_capacity(analysis.repositories.len());
        if !analysis.repositories.is_empty() {
            if let Err(e) = self.github.check_rate_limit().await {
                warn!(error = %e, "Could not check the GitHub rate limit");
            }
        }
        for reference in &analysis.repositories {
            let record = RepositoryRecord::from_ref(reference);
            repositories.push(self.collect_repository(record, self.config.build.enabled).await);
        }

        let summary = match &self.summarizer {
            Some(summarizer) if analysis.available => summarizer.try_summarize(&video.title, &analysis.full_text).await,
            _ => None,
        };

        let mut files = Vec::new();
        let mut write = |name: String| {
            files.push(name.clone());
            output_dir.join(name)
        };

        let knowledge_base = generate_video_markdown(&video, &analysis, &repositories, summary.as_deref());
        save_output_file(&knowledge_base, &write(format!("{}.md", video_id))).await?;

        let social = generate_social_content(&video, &analysis, summary.as_deref());
        save_json(&social, &write(SOCIAL_FILE.to_string())).await?;

        let strategy_context = StrategyContext::from_video(&video, &analysis, &repositories);
        let inspection = repositories.first().and_then(|r| r.inspection.as_ref());
        let monetization = build_monetization(&strategy_context, inspection);
        save_json(&monetization, &write(STRATEGIES_FILE.to_string())).await?;
        save_output_file(&monetization.monetization_plan.markdown, &write(PLAN_FILE.to_string())).await?;

        let technologies = &analysis.technologies;
        let trend_report = generate_trend_report(
            self.analyzer.analyze_technology_trends(technologies).await,
            self.analyzer.analyze_content_popularity(&video),
            self.analyzer.analyze_market_opportunities(technologies, repositories.first()).await,
        );
        save_json(&trend_report, &write(TREND_JSON_FILE.to_string())).await?;
        save_output_file(&render_trend_markdown(&trend_report), &write(TREND_MARKDOWN_FILE.to_string())).await?;

        if let Some(setup) = repository::setup_document(&repositories) {
            save_output_file(&setup, &write(SETUP_FILE.to_string())).await?;
        }

        let recommended = monetization.strategy_set.recommended_strategy.clone();
        let run_summary = RunSummary {
            video_id: video.video_id.clone(),
            title: video.title.clone(),
            channel: video.channel_title.clone(),
            transcript_available: analysis.available,
            technologies: analysis.technologies.clone(),
            repositories: repositories.iter().map(RepositoryRecord::full_name).collect(),
            strategy_count: monetization.strategy_set.len(),
            recommended_strategy: recommended.as_ref().map(|r| r.strategy.title.clone()),
            top_technology: trend_report.summary.top_technology.clone(),
            content_popularity: trend_report.summary.content_popularity.clone(),
            files: {
                let mut names = files.clone();
                names.push(RESULTS_FILE.to_string());
                names.push(SUMMARY_FILE.to_string());
                names
            },
        };

        let results = VideoResults {
            video,
            transcript: analysis,
            summary,
            repositories,
            recommended_strategy: recommended,
            processed_at: Local::now().to_rfc3339(),
        };
        save_json(&results, &output_dir.join(RESULTS_FILE)).await?;
        save_json(&run_summary, &output_dir.join(SUMMARY_FILE)).await?;

        info!(video_id, dir = %output_dir.display(), "Video processed");
        Ok(VideoOutcome {
            video_id: video_id.to_string(),
            title: results.video.title,
            output_dir: output_dir.to_path_buf(),
            summary: run_summary,
        })
    }

    /// Processes a video into `<output_root>/<video_id>_<timestamp>/`
    ///
    /// A failure is written to `error.json` in that directory before it is returned.
    pub async fn run_video(&self, video_id: &str, output_root: &Path) -> Result<VideoOutcome> {
        let output_dir = report::timestamped_dir(output_root, video_id);
        let result = self.process_video(video_id, &output_dir).await;
        if let Err(e) = &result {
            error!(video_id, error = %e, "Video processing failed");
            write_error(&output_dir, e).await;
        }
        result
    }

    /// Processes up to `max_videos` uploads of a channel
    ///
    /// Each video gets its own directory under `videos/`. One video failing
    /// does not stop the others.
    #[instrument(skip(self, output_root))]
    pub async fn process_channel(&self, channel_id: &str, max_videos: usize, output_root: &Path) -> Result<ChannelOutcome> {
        let output_dir = report::timestamped_dir(output_root, channel_id);
        match self.process_channel_into(channel_id, max_videos, &output_dir).await {
            Ok(results) => Ok(ChannelOutcome { output_dir, results }),
            Err(e) => {
                error!(channel_id, error = %e, "Channel processing failed");
                write_error(&output_dir, &e).await;
                Err(e)
            }
        }
    }

    async fn process_channel_into(&self, channel_id: &str, max_videos: usize, output_dir: &Path) -> Result<ChannelResults> {
        let youtube = self.youtube()?;
        let channel = youtube.get_channel_info(channel_id).await?;
        save_json(&channel, &output_dir.join(CHANNEL_INFO_FILE)).await?;

        let uploads = youtube.get_uploads(&channel, max_videos).await?;
        info!(channel = %channel.title, videos = uploads.len(), "Processing channel uploads");

        let videos_dir = output_dir.join("videos");
        let mut videos = Vec::with_capacity(uploads.len());
        for (i, upload) in uploads.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, uploads.len(), upload.title);
            let status = match self.run_video(&upload.video_id, &videos_dir).await {
                Ok(outcome) => VideoStatus {
                    video_id: upload.video_id.clone(),
                    title: outcome.title,
                    status: "success".to_string(),
                    output_dir: Some(outcome.output_dir),
                    error: None,
                },
                Err(e) => VideoStatus {
                    video_id: upload.video_id.clone(),
                    title: upload.title.clone(),
                    status: "error".to_string(),
                    output_dir: None,
                    error: Some(e.to_string()),
                },
            };
            videos.push(status);
        }

        let processed = videos.iter().filter(|v| v.succeeded()).count();
        let results = ChannelResults {
            failed: videos.len() - processed,
            processed,
            channel,
            videos,
        };
        save_json(&results, &output_dir.join(RESULTS_FILE)).await?;
        Ok(results)
    }
}

/// Writes `{"error": "<message>"}` to `<dir>/error.json`, logging if that fails too
pub async fn write_error(dir: &Path, err: &PipelineError) {
    let path: PathBuf = dir.join(ERROR_FILE);
    if let Err(write_err) = save_json(&json!({ "error": err.to_string() }), &path).await {
        error!(path = %path.display(), error = %write_err, "Could not write error file");
    }
}
