use crate::clients::youtube::VideoRecord;
use crate::transcript::TranscriptAnalysis;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const MAX_INSIGHT_CHARS: usize = 280;
const MAX_CODE_POST_CHARS: usize = 1000;

/// A single post
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub content: String,
}

/// Everything written to `social_media.json`
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContent {
    pub video_title: String,
    pub video_url: String,
    /// Announcement, one post per insight, then a tech spotlight
    pub twitter: Vec<SocialPost>,
    /// Key learnings, then a code snippet post when one exists
    pub linkedin: Vec<SocialPost>,
}

/// Watch URL for a video id
pub fn video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// Up to `max` short statements about the video, each at most 280 characters
///
/// Draws on the summary, then the keywords, then transcript paragraphs.
pub fn key_insights(analysis: &TranscriptAnalysis, summary: Option<&str>, max: usize) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(summary) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        insights.push(format!("Summary: {}", summary));
    }
    if !analysis.keywords.is_empty() {
        let top: Vec<&str> = analysis.keywords.iter().take(5).map(String::as_str).collect();
        insights.push(format!("Keywords: {}", top.join(", ")));
    }
    insights.extend(analysis.paragraphs.iter().filter(|p| !p.trim().is_empty()).cloned());

    insights
        .into_iter()
        .take(max)
        .map(|insight| truncate(&insight, MAX_INSIGHT_CHARS))
        .collect()
}

fn hashtag(technology: &str) -> String {
    let tag: String = technology
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    format!("#{}", tag)
}

fn twitter_posts(title: &str, url: &str, insights: &[String], technologies: &[String]) -> Vec<SocialPost> {
    let mut posts = vec![SocialPost {
        content: format!(
            "📺 New Knowledge Drop: {}\n\nCheck out my latest deep dive and learn something new today!\n\n{}",
            title, url
        ),
    }];

    posts.extend(insights.iter().map(|insight| SocialPost {
        content: format!("{}\n\nFrom my analysis of \"{}\"\n\n{}", insight, title, url),
    }));

    if !technologies.is_empty() {
        let tech_list = technologies.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        posts.push(SocialPost {
            content: format!(
                "💻 Tech Spotlight: {}\n\nThese technologies were featured in \"{}\". Stay updated with the latest tools!\n\n{}",
                tech_list, title, url
            ),
        });
    }
    posts
}

fn linkedin_posts(
    title: &str,
    url: &str,
    insights: &[String],
    technologies: &[String],
    code_snippets: &[String],
) -> Vec<SocialPost> {
    let mut main = format!("# Key Learnings from \"{}\"\n\n", title);
    for (i, insight) in insights.iter().enumerate() {
        let _ = write!(main, "{}. {}\n\n", i + 1, insight);
    }
    let _ = write!(
        main,
        "I've analyzed this tech tutorial and extracted the most valuable insights for you. Check out the full video here: {}\n\n",
        url
    );
    if !technologies.is_empty() {
        let tags: Vec<String> = technologies.iter().take(5).map(|t| hashtag(t)).collect();
        let _ = write!(main, "\n{}", tags.join(", "));
    }

    let mut posts = vec![SocialPost { content: main }];

    if let Some(snippet) = code_snippets.first().filter(|s| s.chars().count() < MAX_CODE_POST_CHARS) {
        let subject = technologies.first().map_or("software development", String::as_str);
        posts.push(SocialPost {
            content: format!(
                "# Useful Code Snippet from \"{}\"\n\nHere's a practical example I extracted from a recent tech tutorial:\n\n```\n{}\n```\n\nThis demonstrates how to implement {}.\n\nCheck out the full tutorial: {}",
                title, snippet, subject, url
            ),
        });
    }
    posts
}

/// Builds the Twitter thread and LinkedIn posts for a video
///
/// Output depends only on the inputs.
pub fn generate_social_content(video: &VideoRecord, analysis: &TranscriptAnalysis, summary: Option<&str>) -> SocialContent {
    let url = video_url(&video.video_id);
    let title = video.title.as_str();

    SocialContent {
        video_title: title.to_string(),
        twitter: twitter_posts(title, &url, &key_insights(analysis, summary, 5), &analysis.technologies),
        linkedin: linkedin_posts(
            title,
            &url,
            &key_insights(analysis, summary, 3),
            &analysis.technologies,
            &analysis.code_snippets,
        ),
        video_url: url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analysis() -> TranscriptAnalysis {
        TranscriptAnalysis {
            available: true,
            keywords: vec!["rust".into(), "async".into()],
            paragraphs: vec!["Para one.".into(), "Para two.".into(), "Para three.".into(), "Para four.".into()],
            technologies: vec!["Rust".into(), "Node.js".into()],
            code_snippets: vec!["const x = 1".into()],
            ..TranscriptAnalysis::default()
        }
    }

    fn video() -> VideoRecord {
        VideoRecord { video_id: "xyz".into(), title: "Async Rust".into(), ..VideoRecord::default() }
    }

    #[test]
    fn test_key_insights_order_and_limit() {
        let insights = key_insights(&analysis(), Some("  Short summary. "), 3);
        assert_eq!(
            insights,
            vec!["Summary: Short summary.".to_string(), "Keywords: rust, async".to_string(), "Para one.".to_string()]
        );
    }

    #[test]
    fn test_insights_are_truncated() {
        let long = TranscriptAnalysis { paragraphs: vec!["y".repeat(400)], ..TranscriptAnalysis::default() };
        let insights = key_insights(&long, None, 5);
        assert_eq!(insights[0].chars().count(), 280);
        assert!(insights[0].ends_with("..."));
    }

    #[test]
    fn test_social_content_shapes() {
        let content = generate_social_content(&video(), &analysis(), None);

        assert_eq!(content.video_url, "https://www.youtube.com/watch?v=xyz");
        // announcement + 5 insights + spotlight
        assert_eq!(content.twitter.len(), 7);
        assert!(content.twitter[0].content.starts_with("📺 New Knowledge Drop: Async Rust"));
        assert!(content.twitter[6].content.starts_with("💻 Tech Spotlight: Rust, Node.js"));

        assert_eq!(content.linkedin.len(), 2);
        assert!(content.linkedin[0].content.contains("1. Keywords: rust, async\n\n2. Para one.\n\n3. Para two.\n\n"));
        assert!(content.linkedin[0].content.ends_with("\n#Rust, #Nodejs"));
        assert!(content.linkedin[1].content.contains("```\nconst x = 1\n```"));
        assert!(content.linkedin[1].content.contains("how to implement Rust."));
    }

    #[test]
    fn test_social_content_is_deterministic() {
        let a = generate_social_content(&video(), &analysis(), Some("s"));
        let b = generate_social_content(&video(), &analysis(), Some("s"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_spotlight_or_code_post_without_material() {
        let bare = TranscriptAnalysis::default();
        let content = generate_social_content(&video(), &bare, None);
        assert_eq!(content.twitter.len(), 1);
        assert_eq!(content.linkedin.len(), 1);
    }
}
