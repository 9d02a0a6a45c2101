//! Transcript retrieval and the text heuristics run over it.

/// Technology and repository detection
pub mod detection;
/// Transcript cleanup, keywords and topics
pub mod text;

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use yt_transcript_rs::api::YouTubeTranscriptApi;

pub use detection::{detect_github_repositories, detect_technologies, RepositoryRef};
pub use text::TopicTimestamp;

/// One caption line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    /// Caption text
    pub text: String,
    /// Offset from the start of the video, in seconds
    pub start: f64,
    /// Display duration, in seconds
    pub duration: f64,
}

/// A fetched transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    /// Language code of the track
    pub language: String,
    /// Caption segments in playback order
    pub segments: Vec<TranscriptSegment>,
}

/// Anything that can produce a transcript for a video id
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetches the first available transcript among `languages`
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript>;
}

/// Caption tracks scraped from YouTube's player
pub struct YouTubeTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YouTubeTranscriptSource {
    /// Creates a source without proxy or cookie configuration
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| PipelineError::Transcript(e.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let fetched = self.api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| PipelineError::Transcript(format!("{}: {}", video_id, e)))?;

        Ok(Transcript {
            language: fetched.language_code.clone(),
            segments: fetched
                .snippets
                .iter()
                .map(|s| TranscriptSegment {
                    text: s.text.clone(),
                    start: s.start,
                    duration: s.duration,
                })
                .collect(),
        })
    }
}

/// Everything derived from a transcript and the video's own text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptAnalysis {
    /// Whether a transcript was available
    pub available: bool,
    /// Language code of the transcript
    pub language: String,
    /// Joined transcript text
    pub full_text: String,
    /// Sentence-grouped paragraphs
    pub paragraphs: Vec<String>,
    /// Most frequent keywords
    pub keywords: Vec<String>,
    /// Code-like fragments
    pub code_snippets: Vec<String>,
    /// Topic per five-segment window
    pub timestamps: Vec<TopicTimestamp>,
    /// Technologies mentioned in the title, description or transcript
    pub technologies: Vec<String>,
    /// GitHub repositories linked from the description or transcript
    pub repositories: Vec<RepositoryRef>,
}

/// Runs every text heuristic
///
/// `context` is extra text scanned only for technologies and repository
/// links, normally the video title and description.
pub fn analyze(transcript: Option<&Transcript>, context: &str, keyword_limit: usize) -> TranscriptAnalysis {
    let mut analysis = TranscriptAnalysis::default();

    if let Some(transcript) = transcript.filter(|t| !t.segments.is_empty()) {
        let full_text = text::transcript_to_text(&transcript.segments);
        analysis.available = true;
        analysis.language = transcript.language.clone();
        analysis.paragraphs = text::extract_paragraphs(&full_text);
        analysis.keywords = text::extract_keywords(&full_text, keyword_limit);
        analysis.code_snippets = text::detect_code_snippets(&full_text);
        analysis.timestamps = text::extract_timestamps_with_topics(&transcript.segments);
        analysis.full_text = full_text;
    }

    let searchable = format!("{}\n{}", context, analysis.full_text);
    analysis.technologies = detect_technologies(&searchable);
    analysis.repositories = detect_github_repositories(&searchable);

    info!(
        "Transcript analysis: {} keywords, {} technologies, {} repositories",
        analysis.keywords.len(),
        analysis.technologies.len(),
        analysis.repositories.len()
    );
    analysis
}
