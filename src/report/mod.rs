//! Output emitters: the knowledge-base markdown, social posts, summaries and file helpers.

/// Knowledge base Markdown
pub mod markdown;
/// Twitter and LinkedIn posts
pub mod social;
/// Transcript summaries
pub mod summarizer;

use crate::error::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

pub use markdown::generate_video_markdown;
pub use social::{generate_social_content, SocialContent, SocialPost};
pub use summarizer::Summarizer;

/// Writes `content` to `output_path`, creating parent directories
pub async fn save_output_file(content: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(output_path, content).await?;
    log::debug!("Wrote {}", output_path.display());
    Ok(())
}

/// Serializes `value` as pretty JSON into `output_path`
pub async fn save_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    save_output_file(&json, output_path).await
}

/// `<root>/<stem>_<YYYYmmdd_HHMMSS>`, not created
pub fn timestamped_dir(root: &Path, stem: &str) -> PathBuf {
    root.join(format!("{}_{}", stem, Local::now().format("%Y%m%d_%H%M%S")))
}

/// Configures a spinner with the shared style
pub fn setup_progress_style(pb: &ProgressBar) {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
}

/// A spinner styled with [`setup_progress_style`]
pub fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    setup_progress_style(&pb);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_json_creates_parent_directories() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested/deeper/out.json");

        save_json(&json!({"error": "boom"}), &path).await?;

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(written["error"], "boom");
        Ok(())
    }

    #[test]
    fn test_timestamped_dir_format() {
        let dir = timestamped_dir(Path::new("/out"), "abc123");
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        let stamp = name.strip_prefix("abc123_").unwrap();

        assert_eq!(dir.parent(), Some(Path::new("/out")));
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
