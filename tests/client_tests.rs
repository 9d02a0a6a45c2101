use contentmonetizer::clients::stats::{CommunityStats, HttpCommunityStats};
use contentmonetizer::clients::{GitHubClient, YouTubeClient};
use contentmonetizer::PipelineError;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_github_repository_metadata() {
    setup_test_logger();
    let mut server = setup_test_server().await;
    let _repo = server
        .mock("GET", "/repos/rust-lang/mdBook")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "full_name": "rust-lang/mdBook",
                "description": "Create book from markdown files",
                "language": "Rust",
                "stargazers_count": 17000,
                "forks_count": 1500,
                "open_issues_count": 300,
                "subscribers_count": 160,
                "default_branch": "master",
                "license": {"spdx_id": "MPL-2.0"},
                "topics": ["markdown", "book"],
                "html_url": "https://github.com/rust-lang/mdBook"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _languages = server
        .mock("GET", "/repos/rust-lang/mdBook/languages")
        .with_status(200)
        .with_body(r#"{"Rust": 90000, "JavaScript": 12000}"#)
        .create_async()
        .await;
    let _readme = server
        .mock("GET", "/repos/rust-lang/mdBook/readme")
        .with_status(200)
        // "# mdBook\n" base64 encoded, wrapped the way the API wraps it
        .with_body(r#"{"content": "IyBtZEJv\nb2sK\n", "encoding": "base64"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(Some("test-token"), &server.url()).unwrap();

    let info = client.get_repository("rust-lang", "mdBook").await.unwrap();
    assert_eq!(info.full_name, "rust-lang/mdBook");
    assert_eq!(info.language.as_deref(), Some("Rust"));
    assert_eq!(info.stars, 17000);
    assert_eq!(info.license.as_deref(), Some("MPL-2.0"));
    assert_eq!(info.topics, vec!["markdown".to_string(), "book".to_string()]);

    let languages = client.get_languages("rust-lang", "mdBook").await.unwrap();
    assert_eq!(languages.get("Rust"), Some(&90000));

    let readme = client.get_readme("rust-lang", "mdBook").await.unwrap();
    assert_eq!(readme, "# mdBook\n");
}

#[tokio::test]
async fn test_github_rate_limit() {
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/repos/rust-lang/rust")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "API rate limit exceeded"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let result = client.get_repository("rust-lang", "rust").await;
    assert!(matches!(result, Err(PipelineError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_github_invalid_repo() {
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/repos/invalid/repo")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let result = client.get_repository("invalid", "repo").await;
    assert!(matches!(result, Err(PipelineError::GitHubApi(_))));
}

#[tokio::test]
async fn test_github_remaining_quota() {
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/rate_limit")
        .with_status(200)
        .with_body(r#"{"resources": {"core": {"limit": 60, "remaining": 3}}}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    assert_eq!(client.check_rate_limit().await.unwrap(), 3);
}

#[tokio::test]
async fn test_youtube_channel_videos_follow_pages() {
    let mut server = setup_test_server().await;
    let _channel = server
        .mock("GET", "/channels")
        .match_query(Matcher::UrlEncoded("id".into(), "UC123".into()))
        .with_status(200)
        .with_body(
            json!({
                "items": [{
                    "snippet": {"title": "Dev Channel", "description": "Tutorials"},
                    "contentDetails": {"relatedPlaylists": {"uploads": "UU123"}},
                    "statistics": {"subscriberCount": "1200", "videoCount": "3", "viewCount": "50000"}
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _first_page = server
        .mock("GET", "/playlistItems")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("playlistId".into(), "UU123".into()),
            Matcher::UrlEncoded("maxResults".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "nextPageToken": "page2",
                "items": [
                    {"snippet": {"title": "One", "publishedAt": "2024-03-01T00:00:00Z", "resourceId": {"videoId": "v1"}}},
                    {"snippet": {"title": "Deleted video", "resourceId": {}}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _second_page = server
        .mock("GET", "/playlistItems")
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page2".into()))
        .with_status(200)
        .with_body(
            json!({
                "items": [
                    {"snippet": {"title": "Two", "resourceId": {"videoId": "v2"}}},
                    {"snippet": {"title": "Three", "resourceId": {"videoId": "v3"}}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", &server.url()).unwrap();

    let channel = client.get_channel_info("UC123").await.unwrap();
    assert_eq!(channel.title, "Dev Channel");
    assert_eq!(channel.subscriber_count, 1200);

    let videos = client.get_channel_videos("UC123", 2).await.unwrap();
    let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
}

#[tokio::test]
async fn test_youtube_uploads_of_fetched_channel_skip_second_lookup() {
    let mut server = setup_test_server().await;
    let channel_mock = server
        .mock("GET", "/channels")
        .match_query(Matcher::UrlEncoded("id".into(), "UC456".into()))
        .with_status(200)
        .with_body(
            json!({
                "items": [{
                    "snippet": {"title": "Rust Talks"},
                    "contentDetails": {"relatedPlaylists": {"uploads": "UU456"}},
                    "statistics": {}
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let _uploads = server
        .mock("GET", "/playlistItems")
        .match_query(Matcher::UrlEncoded("playlistId".into(), "UU456".into()))
        .with_status(200)
        .with_body(r#"{"items": [{"snippet": {"title": "Async", "resourceId": {"videoId": "a1"}}}]}"#)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", &server.url()).unwrap();
    let channel = client.get_channel_info("UC456").await.unwrap();
    let videos = client.get_uploads(&channel, 5).await.unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].video_id, "a1");
    channel_mock.assert_async().await;
}

#[tokio::test]
async fn test_youtube_channel_without_uploads_playlist() {
    let server = setup_test_server().await;
    let client = YouTubeClient::with_base_url("test-key", &server.url()).unwrap();
    let channel = contentmonetizer::clients::youtube::ChannelRecord {
        channel_id: "UC789".into(),
        ..Default::default()
    };

    let result = client.get_uploads(&channel, 5).await;
    assert!(matches!(result, Err(PipelineError::YouTubeApi(_))));
}

#[tokio::test]
async fn test_youtube_unknown_video() {
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", &server.url()).unwrap();
    let result = client.get_video_details("missing").await;
    assert!(matches!(result, Err(PipelineError::YouTubeApi(_))));
}

#[tokio::test]
async fn test_youtube_quota_exceeded() {
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error": {"message": "quotaExceeded"}}"#)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", &server.url()).unwrap();
    let result = client.get_video_details("abc").await;
    assert!(matches!(result, Err(PipelineError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_community_stats_read_zero_on_failure() {
    let mut server = setup_test_server().await;
    let _questions = server
        .mock("GET", "/questions")
        .match_query(Matcher::UrlEncoded("tagged".into(), "rust".into()))
        .with_status(200)
        .with_body(r#"{"total": 4200}"#)
        .create_async()
        .await;
    let _downloads = server
        .mock("GET", "/downloads/point/last-month/react")
        .with_status(500)
        .create_async()
        .await;

    let stats = HttpCommunityStats::new(&server.url(), &server.url()).unwrap();
    assert_eq!(stats.stack_overflow_questions("Rust").await, 4200);
    assert_eq!(stats.npm_downloads("react").await, 0);
}
