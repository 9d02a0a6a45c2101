use crate::clients::youtube::{ChannelRecord, VideoRecord};
use crate::repository::RepositoryRecord;
use crate::strategy::{MonetizationStrategies, RecommendedStrategy};
use crate::transcript::TranscriptAnalysis;
use crate::trends::MarketFit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Full results of a video or channel run
pub const RESULTS_FILE: &str = "results.json";
/// Short run summary
pub const SUMMARY_FILE: &str = "summary.json";
/// Strategy set with ethical and legal evaluations
pub const STRATEGIES_FILE: &str = "monetization_strategies.json";
/// Rendered monetization plan
pub const PLAN_FILE: &str = "monetization_plan.md";
/// Trend report as JSON
pub const TREND_JSON_FILE: &str = "trend_report.json";
/// Trend report as Markdown
pub const TREND_MARKDOWN_FILE: &str = "trend_report.md";
/// Twitter and LinkedIn posts
pub const SOCIAL_FILE: &str = "social_media.json";
/// Build documentation, only when the build pipeline ran
pub const SETUP_FILE: &str = "application_setup.md";
/// Channel metadata
pub const CHANNEL_INFO_FILE: &str = "channel_info.json";
/// `{"error": "..."}` for a failed run
pub const ERROR_FILE: &str = "error.json";

/// Contents of a video's `results.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResults {
    pub video: VideoRecord,
    pub transcript: TranscriptAnalysis,
    /// Model summary of the transcript, when one was produced
    pub summary: Option<String>,
    pub repositories: Vec<RepositoryRecord>,
    pub recommended_strategy: Option<RecommendedStrategy>,
    /// RFC 3339
    pub processed_at: String,
}

/// Contents of a video's `summary.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub transcript_available: bool,
    pub technologies: Vec<String>,
    /// `owner/repo` of every linked repository
    pub repositories: Vec<String>,
    pub strategy_count: usize,
    pub recommended_strategy: Option<String>,
    pub top_technology: String,
    pub content_popularity: String,
    /// Names of the files written for this run
    pub files: Vec<String>,
}

/// What [`super::Pipeline::process_video`] hands back
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOutcome {
    pub video_id: String,
    pub title: String,
    pub output_dir: PathBuf,
    pub summary: RunSummary,
}

/// Per-video line of a channel's `results.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatus {
    pub video_id: String,
    pub title: String,
    /// `success` or `error`
    pub status: String,
    pub output_dir: Option<PathBuf>,
    pub error: Option<String>,
}

impl VideoStatus {
    /// Whether the video was processed
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

/// Contents of a channel's `results.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResults {
    pub channel: ChannelRecord,
    pub processed: usize,
    pub failed: usize,
    pub videos: Vec<VideoStatus>,
}

/// What [`super::Pipeline::process_channel`] hands back
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelOutcome {
    pub output_dir: PathBuf,
    pub results: ChannelResults,
}

/// Contents of `<name>_analysis.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub repository: RepositoryRecord,
    pub market_fit: MarketFit,
    pub monetization: MonetizationStrategies,
    /// RFC 3339
    pub analyzed_at: String,
}

/// What [`super::Pipeline::analyze_repository_url`] hands back
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct RepositoryOutcome {
    pub name: String,
    pub analysis_file: PathBuf,
    /// Set when the build pipeline ran
    pub setup_file: Option<PathBuf>,
    pub build_succeeded: Option<bool>,
}
