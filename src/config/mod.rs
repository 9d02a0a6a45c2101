mod env_manager;

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{PipelineError, Result};
use std::fs;
use url::Url;

pub use env_manager::{get_env_value, ApiKeys, REQUIRED_ENV_VARS};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const GITHUB_API_BASE: &str = "https://api.github.com";
const STACK_EXCHANGE_API_BASE: &str = "https://api.stackexchange.com/2.3";
const NPM_API_BASE: &str = "https://api.npmjs.org";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Main configuration struct for the application
///
/// Holds API credentials, endpoint bases, output location and the knobs
/// that control transcript analysis and repository builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for every run's output
    pub output_dir: PathBuf,
    /// API keys for the external services
    pub api_keys: ApiKeys,
    /// YouTube Data API base URL
    pub youtube_api_base: String,
    /// GitHub REST API base URL
    pub github_api_base: String,
    /// Stack Exchange API base URL
    pub stack_exchange_api_base: String,
    /// npm download statistics API base URL
    pub npm_api_base: String,
    /// Transcript languages, in order of preference
    pub transcript_languages: Vec<String>,
    /// Number of keywords kept for a whole transcript
    pub keyword_limit: usize,
    /// Default number of videos processed per channel
    pub max_videos: usize,
    /// Model used for transcript summaries
    pub openai_model: String,
    /// Repository build settings
    pub build: BuildConfig,
}

/// Settings for cloning and building detected repositories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Run the install/build/run phases for repositories found in videos
    pub enabled: bool,
    /// Seconds a launched application is watched before it counts as started
    pub run_window_secs: u64,
    /// `git clone --depth`
    pub clone_depth: u32,
}

impl Config {
    /// Creates a new configuration with the specified output directory
    ///
    /// # Arguments
    /// * `output_dir` - The directory where all output files will be stored
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Self::default()
        }
    }

    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist, returns the default configuration.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PipelineError::Config("Could not find config directory".into()))?;
        let config_path = config_dir.join("contentmonetizer").join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Loads configuration from an explicit TOML file
    ///
    /// Keys missing from the file keep their defaults and credentials
    /// absent from the file are read from the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let mut config: Config = toml::from_str(&content)?;
        config.api_keys.merge_env();
        Ok(config)
    }

    /// Validates endpoint URLs and prepares the output directory
    pub async fn validate(&self) -> Result<()> {
        for base in [
            &self.youtube_api_base,
            &self.github_api_base,
            &self.stack_exchange_api_base,
            &self.npm_api_base,
        ] {
            Url::parse(base)?;
        }
        if self.transcript_languages.is_empty() {
            return Err(PipelineError::Config("transcript_languages must not be empty".into()));
        }
        self.ensure_directories_exist().await
    }

    /// Ensures the output directory exists
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        if !tokio::fs::try_exists(&self.output_dir).await? {
            tokio::fs::create_dir_all(&self.output_dir).await?;
        }
        Ok(())
    }

    /// Returns the GitHub token when one is configured
    pub fn github_token(&self) -> Option<&str> {
        self.api_keys.github_token.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            api_keys: ApiKeys::from_env(),
            youtube_api_base: get_env_value("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| YOUTUBE_API_BASE.to_string()),
            github_api_base: get_env_value("GITHUB_API_BASE_URL")
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            stack_exchange_api_base: STACK_EXCHANGE_API_BASE.to_string(),
            npm_api_base: NPM_API_BASE.to_string(),
            transcript_languages: vec!["en".to_string()],
            keyword_limit: 20,
            max_videos: 10,
            openai_model: get_env_value("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            build: BuildConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            run_window_secs: 10,
            clone_depth: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_directories_exist() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::new(temp_dir.path().join("runs").join("nested"));

        config.ensure_directories_exist().await?;

        assert!(config.output_dir.exists());
        Ok(())
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "output_dir = \"reports\"\nkeyword_limit = 5\n\n[build]\nenabled = true\n",
        )?;

        let config = Config::from_file(&path)?;

        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.keyword_limit, 5);
        assert!(config.build.enabled);
        assert_eq!(config.build.run_window_secs, 10);
        assert_eq!(config.transcript_languages, vec!["en".to_string()]);
        Ok(())
    }

    #[test]
    fn test_from_file_rejects_malformed_toml() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "keyword_limit = [")?;

        assert!(matches!(Config::from_file(&path), Err(PipelineError::Toml(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new(temp_dir.path().to_path_buf());
        config.github_api_base = "not a url".into();

        assert!(matches!(config.validate().await, Err(PipelineError::UrlParse(_))));
    }
}
