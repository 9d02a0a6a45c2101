use crate::clients::youtube::VideoRecord;
use crate::repository::{CommandLine, RepositoryRecord};
use crate::transcript::{TopicTimestamp, TranscriptAnalysis};
use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write;

const README_EXCERPT_CHARS: usize = 500;

lazy_static! {
    static ref ISO_DURATION: Regex = Regex::new(
        r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$"
    )
    .expect("valid duration regex");
}

/// Seconds in an ISO 8601 duration such as `PT1H2M3S`, zero when unparseable
pub fn parse_iso8601_duration(duration: &str) -> u64 {
    let Some(caps) = ISO_DURATION.captures(duration.trim()) else {
        return 0;
    };
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok()).unwrap_or(0);
    part(1) * 86_400 + part(2) * 3_600 + part(3) * 60 + part(4)
}

/// `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(seconds: u64) -> String {
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `HH:MM:SS`, fractional seconds truncated
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// `March 05, 2024` for an RFC 3339 timestamp, the input unchanged otherwise
pub fn format_date(iso_date: &str) -> String {
    DateTime::parse_from_rfc3339(iso_date)
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| iso_date.to_string())
}

/// `1234567` as `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn metadata_section(md: &mut String, video: &VideoRecord) {
    let title = if video.title.is_empty() { "Untitled Video" } else { &video.title };
    let channel = if video.channel_title.is_empty() { "Unknown Channel" } else { &video.channel_title };
    let description = if video.description.trim().is_empty() {
        "No description available."
    } else {
        &video.description
    };

    let _ = writeln!(md, "# {}\n\n## Video Metadata\n", title);
    let _ = writeln!(md, "- **Channel**: {}", channel);
    let _ = writeln!(md, "- **Published**: {}", format_date(&video.published_at));
    let _ = writeln!(md, "- **Duration**: {}", format_duration(parse_iso8601_duration(&video.duration)));
    let _ = writeln!(md, "- **Views**: {}", format_count(video.view_count));
    let _ = writeln!(md, "- **Likes**: {}", format_count(video.like_count));
    let _ = writeln!(md, "- **Comments**: {}\n", format_count(video.comment_count));
    let _ = writeln!(md, "### Description\n\n{}\n", description);
}

fn summary_section(md: &mut String, analysis: &TranscriptAnalysis, summary: Option<&str>) {
    md.push_str("## Summary\n\n");
    if !analysis.available {
        md.push_str("No transcript available for this video.\n\n");
        return;
    }
    if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
        let _ = writeln!(md, "{}\n", summary.trim());
    }
    if !analysis.keywords.is_empty() {
        let _ = writeln!(md, "### Keywords\n\n{}\n", analysis.keywords.join(", "));
    }
}

fn timestamps_section(md: &mut String, timestamps: &[TopicTimestamp]) {
    if timestamps.is_empty() {
        return;
    }
    md.push_str("## Timestamps\n\n");
    for ts in timestamps {
        let _ = writeln!(md, "- [{}] {}", format_timestamp(ts.time), ts.topic);
    }
    md.push('\n');
}

fn technologies_section(md: &mut String, technologies: &[String]) {
    if technologies.is_empty() {
        return;
    }
    let mut sorted: Vec<&String> = technologies.iter().collect();
    sorted.sort();

    md.push_str("## Technologies Mentioned\n\n");
    for tech in sorted {
        let _ = writeln!(md, "- {}", tech);
    }
    md.push('\n');
}

fn command_block(md: &mut String, label: &str, commands: &[CommandLine]) {
    if commands.is_empty() {
        return;
    }
    let _ = writeln!(md, "{}:\n\n```bash", label);
    for command in commands {
        let _ = writeln!(md, "{}", command);
    }
    md.push_str("```\n\n");
}

/// First 500 characters of the README, with `...` when cut
fn readme_excerpt(readme: &str) -> String {
    match readme.char_indices().nth(README_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &readme[..cut]),
        None => readme.to_string(),
    }
}

fn repositories_section(md: &mut String, repositories: &[RepositoryRecord]) {
    if repositories.is_empty() {
        return;
    }
    md.push_str("## GitHub Repositories\n\n");

    for repo in repositories {
        let github = repo.github.as_ref();
        let description = github
            .and_then(|g| g.description.as_deref())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description available.");
        let primary_language = repo
            .primary_language()
            .or_else(|| github.and_then(|g| g.language.as_deref()))
            .unwrap_or("Unknown");
        let build_system = repo.detection.as_ref().map_or("unknown", |d| d.build_system.as_str());

        let _ = writeln!(md, "### [{}]({})\n", repo.full_name(), repo.url);
        let _ = writeln!(md, "{}\n", description);
        let _ = writeln!(md, "- **Stars**: {}", format_count(repo.stars()));
        let _ = writeln!(md, "- **Forks**: {}", format_count(repo.forks()));
        let _ = writeln!(md, "- **Open Issues**: {}", github.map_or(0, |g| g.open_issues));
        let _ = writeln!(md, "- **Primary Language**: {}", primary_language);
        let _ = writeln!(md, "- **Application Type**: {}", repo.application_type().as_str());
        let _ = writeln!(md, "- **Build System**: {}\n", build_system);

        if let Some(detection) = repo.detection.as_ref().filter(|d| !d.instructions.is_empty()) {
            md.push_str("#### Build Instructions\n\n");
            command_block(md, "Install dependencies", &detection.instructions.dependencies);
            command_block(md, "Build", &detection.instructions.build);
            command_block(md, "Run", &detection.instructions.run);
        }

        if !repo.readme.trim().is_empty() {
            let _ = writeln!(md, "#### README Excerpt\n\n{}\n", readme_excerpt(&repo.readme));
        }
    }
}

fn code_snippets_section(md: &mut String, snippets: &[String]) {
    if snippets.is_empty() {
        return;
    }
    md.push_str("## Code Snippets\n\n");
    for (i, snippet) in snippets.iter().enumerate() {
        let _ = writeln!(md, "### Snippet {}\n\n```\n{}\n```\n", i + 1, snippet);
    }
}

fn transcript_section(md: &mut String, paragraphs: &[String]) {
    if paragraphs.is_empty() {
        return;
    }
    md.push_str("## Transcript\n\n");
    for paragraph in paragraphs {
        let _ = writeln!(md, "{}\n", paragraph);
    }
}

/// Renders the knowledge-base document `<video_id>.md`
///
/// Timestamps, code snippets and the transcript only appear when a transcript was available.
pub fn generate_video_markdown(
    video: &VideoRecord,
    analysis: &TranscriptAnalysis,
    repositories: &[RepositoryRecord],
    summary: Option<&str>,
) -> String {
    let mut md = String::new();
    metadata_section(&mut md, video);
    summary_section(&mut md, analysis, summary);
    if analysis.available {
        timestamps_section(&mut md, &analysis.timestamps);
    }
    technologies_section(&mut md, &analysis.technologies);
    repositories_section(&mut md, repositories);
    if analysis.available {
        code_snippets_section(&mut md, &analysis.code_snippets);
        transcript_section(&mut md, &analysis.paragraphs);
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::github::GitHubRepoInfo;
    use crate::repository::{ApplicationType, BuildInstructions, BuildSystem, Detection};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("PT1H2M3S", 3723)]
    #[test_case("PT4M13S", 253)]
    #[test_case("PT45S", 45)]
    #[test_case("PT2H", 7200)]
    #[test_case("P1DT1S", 86_401)]
    #[test_case("PT1.5S", 1 ; "fractional seconds")]
    #[test_case("garbage", 0)]
    #[test_case("", 0 ; "empty")]
    fn test_parse_iso8601_duration(input: &str, expected: u64) {
        assert_eq!(parse_iso8601_duration(input), expected);
    }

    #[test_case(3723, "1h 2m 3s")]
    #[test_case(125, "2m 5s")]
    #[test_case(9, "9s")]
    #[test_case(3600, "1h 0m 0s")]
    fn test_format_duration(seconds: u64, expected: &str) {
        assert_eq!(format_duration(seconds), expected);
    }

    #[test_case(0.0, "00:00:00")]
    #[test_case(65.9, "00:01:05")]
    #[test_case(3723.0, "01:02:03")]
    #[test_case(-4.0, "00:00:00" ; "negative clamps to zero")]
    fn test_format_timestamp(seconds: f64, expected: &str) {
        assert_eq!(format_timestamp(seconds), expected);
    }

    #[test_case(0, "0")]
    #[test_case(999, "999")]
    #[test_case(1000, "1,000")]
    #[test_case(1_234_567, "1,234,567")]
    fn test_format_count(n: u64, expected: &str) {
        assert_eq!(format_count(n), expected);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05T14:00:00Z"), "March 05, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    fn video() -> VideoRecord {
        VideoRecord {
            video_id: "abc123".into(),
            title: "FastAPI in Production".into(),
            channel_title: "Dev Channel".into(),
            published_at: "2024-01-15T10:00:00Z".into(),
            duration: "PT12M30S".into(),
            view_count: 15_000,
            like_count: 1_200,
            comment_count: 80,
            ..VideoRecord::default()
        }
    }

    #[test]
    fn test_markdown_without_transcript() {
        let analysis = TranscriptAnalysis {
            technologies: vec!["Python".into(), "Docker".into()],
            code_snippets: vec!["def hidden(): pass".into()],
            ..TranscriptAnalysis::default()
        };

        let md = generate_video_markdown(&video(), &analysis, &[], None);

        assert!(md.starts_with("# FastAPI in Production\n\n## Video Metadata\n\n- **Channel**: Dev Channel\n"));
        assert!(md.contains("- **Published**: January 15, 2024"));
        assert!(md.contains("- **Duration**: 12m 30s"));
        assert!(md.contains("- **Views**: 15,000"));
        assert!(md.contains("### Description\n\nNo description available."));
        assert!(md.contains("## Summary\n\nNo transcript available for this video.\n\n"));
        assert!(md.contains("## Technologies Mentioned\n\n- Docker\n- Python\n"));
        assert!(!md.contains("## Code Snippets"));
        assert!(!md.contains("## GitHub Repositories"));
    }

    #[test]
    fn test_markdown_sections_in_order() {
        let analysis = TranscriptAnalysis {
            available: true,
            keywords: vec!["api".into(), "deploy".into()],
            paragraphs: vec!["First paragraph.".into()],
            code_snippets: vec!["import os".into()],
            timestamps: vec![TopicTimestamp { time: 61.0, topic: "api deploy".into() }],
            technologies: vec!["FastAPI".into()],
            ..TranscriptAnalysis::default()
        };
        let repo = RepositoryRecord {
            owner: "acme".into(),
            repo: "api".into(),
            url: "https://github.com/acme/api".into(),
            github: Some(GitHubRepoInfo {
                description: Some("Demo API".into()),
                stars: 2500,
                language: Some("Python".into()),
                ..GitHubRepoInfo::default()
            }),
            readme: "x".repeat(600),
            detection: Some(Detection {
                languages: Default::default(),
                frameworks: vec!["FastAPI".into()],
                build_system: BuildSystem::Pip,
                application_type: ApplicationType::FastApi,
                instructions: BuildInstructions {
                    dependencies: vec![CommandLine::from(["pip", "install", "-r", "requirements.txt"])],
                    build: vec![],
                    run: vec![CommandLine::from(["uvicorn", "main:app"])],
                },
                web_port: Some(8000),
            }),
            ..RepositoryRecord::default()
        };

        let md = generate_video_markdown(&video(), &analysis, &[repo], Some("A short summary."));

        let order = [
            "## Summary\n\nA short summary.\n\n### Keywords\n\napi, deploy",
            "## Timestamps\n\n- [00:01:01] api deploy",
            "## Technologies Mentioned",
            "### [acme/api](https://github.com/acme/api)\n\nDemo API",
            "- **Stars**: 2,500",
            "- **Primary Language**: Python",
            "- **Application Type**: fastapi",
            "- **Build System**: pip",
            "Install dependencies:\n\n```bash\npip install -r requirements.txt\n```",
            "Run:\n\n```bash\nuvicorn main:app\n```",
            "#### README Excerpt",
            "## Code Snippets\n\n### Snippet 1\n\n```\nimport os\n```",
            "## Transcript\n\nFirst paragraph.",
        ];
        let mut last = 0;
        for needle in order {
            let at = md[last..].find(needle).map(|i| i + last);
            assert!(at.is_some(), "missing or out of order: {}", needle);
            last = at.unwrap();
        }
        assert!(!md.contains("Build:\n"));
        assert!(md.contains(&format!("{}...", "x".repeat(500))));
        assert!(!md.contains(&"x".repeat(501)));
    }
}
