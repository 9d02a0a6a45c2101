use std::io;
use thiserror::Error;
use async_openai::error::OpenAIError;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the monetization pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// OpenAI API errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// General message errors
    #[error("{0}")]
    Message(String),

    /// A required environment variable is absent
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// API rate limit exceeded errors
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// YouTube Data API errors
    #[error("YouTube API error: {0}")]
    YouTubeApi(String),

    /// GitHub API specific errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Transcript retrieval errors
    #[error("Transcript error: {0}")]
    Transcript(String),

    /// External command failures (git, package managers)
    #[error("Command error: {0}")]
    Command(String),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parse(String),
}

impl PipelineError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) |
            Self::Http(_) |
            Self::RateLimitExceeded(_) |
            Self::IO(_)
        )
    }

    /// Checks if this error is fatal and should terminate processing
    pub fn is_fatal(&self) -> bool {
        !self.is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = PipelineError::new("test error");
        assert!(matches!(error, PipelineError::Message(_)));

        if let PipelineError::Message(msg) = error {
            assert_eq!(msg, "test error");
        }
    }

    #[test]
    fn test_is_transient() {
        let transient = PipelineError::RateLimitExceeded("quota exhausted".into());
        let fatal = PipelineError::MissingCredential("YOUTUBE_API_KEY".into());

        assert!(transient.is_transient());
        assert!(!fatal.is_transient());
        assert!(fatal.is_fatal());
    }

    #[test]
    fn test_display_includes_category() {
        let err = PipelineError::GitHubApi("HTTP 404 for octo/missing".into());
        assert_eq!(err.to_string(), "GitHub API error: HTTP 404 for octo/missing");
    }
}
