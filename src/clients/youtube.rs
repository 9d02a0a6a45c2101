use super::{check_status, create_http_client, normalize_base, Api};
use crate::error::{PipelineError, Result};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_PAGE_SIZE: usize = 50;

/// Metadata for a single video, reshaped from the YouTube Data API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    /// YouTube video id
    pub video_id: String,
    /// Video title
    pub title: String,
    /// Full description text
    pub description: String,
    /// Owning channel id
    pub channel_id: String,
    /// Owning channel display name
    pub channel_title: String,
    /// RFC 3339 publish timestamp as returned by the API
    pub published_at: String,
    /// Creator supplied tags
    pub tags: Vec<String>,
    /// YouTube category id
    pub category_id: String,
    /// ISO 8601 duration such as `PT1H2M3S`
    pub duration: String,
    /// Topic category URLs from `topicDetails`
    pub topics: Vec<String>,
    /// View count
    pub view_count: u64,
    /// Like count
    pub like_count: u64,
    /// Comment count
    pub comment_count: u64,
    /// Transcript text, filled in after transcript retrieval
    pub transcript: String,
    /// Transcript keywords, filled in after analysis
    pub keywords: Vec<String>,
}

/// Channel level metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelRecord {
    /// Channel id
    pub channel_id: String,
    /// Display name
    pub title: String,
    /// Channel description
    pub description: String,
    /// Custom URL handle, if any
    pub custom_url: Option<String>,
    /// Id of the playlist holding every upload
    pub uploads_playlist_id: Option<String>,
    /// Subscriber count (hidden counts read as 0)
    pub subscriber_count: u64,
    /// Total number of public videos
    pub video_count: u64,
    /// Lifetime view count
    pub view_count: u64,
}

/// A lightweight video reference from a playlist or search listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoSummary {
    /// Video id
    pub video_id: String,
    /// Title
    pub title: String,
    /// Publish time
    pub published_at: String,
}

/// A top level comment on a video
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    /// Author display name
    pub author: String,
    /// Comment text
    pub text: String,
    /// Like count
    pub like_count: u64,
    /// Publish time
    pub published_at: String,
}

/// Client for the YouTube Data API v3
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Creates a client against the public API endpoint
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, "https://www.googleapis.com/youtube/v3")
    }

    /// Creates a client against an alternative endpoint
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(PipelineError::MissingCredential("YOUTUBE_API_KEY".into()));
        }
        Ok(Self {
            client: create_http_client(None)?,
            api_key: api_key.to_string(),
            base_url: normalize_base(base_url),
        })
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)], what: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} ({})", url, what);

        let response = self.client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let response = check_status(Api::YouTube, response, what).await?;
        Ok(response.json::<Value>().await?)
    }

    /// Fetches snippet, content details, statistics and topics for one video
    pub async fn get_video_details(&self, video_id: &str) -> Result<VideoRecord> {
        let data = self.get_json(
            "videos",
            &[
                ("part", "snippet,contentDetails,statistics,topicDetails".to_string()),
                ("id", video_id.to_string()),
            ],
            &format!("video {}", video_id),
        ).await?;

        let item = first_item(&data)
            .ok_or_else(|| PipelineError::YouTubeApi(format!("video {} not found", video_id)))?;

        let record = parse_video(video_id, item);
        info!("Retrieved video information: {}", record.title);
        Ok(record)
    }

    /// Fetches channel metadata including the uploads playlist id
    pub async fn get_channel_info(&self, channel_id: &str) -> Result<ChannelRecord> {
        let data = self.get_json(
            "channels",
            &[
                ("part", "snippet,contentDetails,statistics".to_string()),
                ("id", channel_id.to_string()),
            ],
            &format!("channel {}", channel_id),
        ).await?;

        let item = first_item(&data)
            .ok_or_else(|| PipelineError::YouTubeApi(format!("channel {} not found", channel_id)))?;

        let snippet = &item["snippet"];
        let stats = &item["statistics"];
        Ok(ChannelRecord {
            channel_id: channel_id.to_string(),
            title: str_field(snippet, "title"),
            description: str_field(snippet, "description"),
            custom_url: snippet["customUrl"].as_str().map(String::from),
            uploads_playlist_id: item["contentDetails"]["relatedPlaylists"]["uploads"]
                .as_str()
                .map(String::from),
            subscriber_count: count_field(stats, "subscriberCount"),
            video_count: count_field(stats, "videoCount"),
            view_count: count_field(stats, "viewCount"),
        })
    }

    /// Lists up to `max_results` uploads of a channel, newest first
    pub async fn get_channel_videos(&self, channel_id: &str, max_results: usize) -> Result<Vec<VideoSummary>> {
        let channel = self.get_channel_info(channel_id).await?;
        self.get_uploads(&channel, max_results).await
    }

    /// Lists up to `max_results` uploads of an already fetched channel
    pub async fn get_uploads(&self, channel: &ChannelRecord, max_results: usize) -> Result<Vec<VideoSummary>> {
        let playlist_id = channel.uploads_playlist_id.as_deref().ok_or_else(|| {
            PipelineError::YouTubeApi(format!("channel {} has no uploads playlist", channel.channel_id))
        })?;
        self.get_playlist_videos(playlist_id, max_results).await
    }

    /// Lists up to `max_results` videos of a playlist
    ///
    /// Pages through the playlist 50 items at a time. Deleted and private
    /// entries without a video id are dropped.
    pub async fn get_playlist_videos(&self, playlist_id: &str, max_results: usize) -> Result<Vec<VideoSummary>> {
        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;

        while videos.len() < max_results {
            let page_size = MAX_PAGE_SIZE.min(max_results - videos.len());
            let mut params = vec![
                ("part", "snippet".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", page_size.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let data = self.get_json("playlistItems", &params, "uploads playlist").await?;

            for item in items(&data) {
                let snippet = &item["snippet"];
                let video_id = snippet["resourceId"]["videoId"].as_str().unwrap_or_default();
                if video_id.is_empty() {
                    continue;
                }
                videos.push(VideoSummary {
                    video_id: video_id.to_string(),
                    title: str_field(snippet, "title"),
                    published_at: str_field(snippet, "publishedAt"),
                });
            }

            page_token = data["nextPageToken"].as_str().map(String::from);
            if page_token.is_none() {
                break;
            }
        }

        videos.truncate(max_results);
        Ok(videos)
    }

    /// Searches public videos matching a query
    pub async fn search_videos(&self, query: &str, max_results: usize) -> Result<Vec<VideoSummary>> {
        let data = self.get_json(
            "search",
            &[
                ("part", "snippet".to_string()),
                ("q", query.to_string()),
                ("type", "video".to_string()),
                ("maxResults", MAX_PAGE_SIZE.min(max_results).to_string()),
            ],
            &format!("search '{}'", query),
        ).await?;

        Ok(items(&data)
            .filter_map(|item| {
                let video_id = item["id"]["videoId"].as_str()?;
                Some(VideoSummary {
                    video_id: video_id.to_string(),
                    title: str_field(&item["snippet"], "title"),
                    published_at: str_field(&item["snippet"], "publishedAt"),
                })
            })
            .collect())
    }

    /// Fetches top level comments, most relevant first
    pub async fn get_video_comments(&self, video_id: &str, max_results: usize) -> Result<Vec<CommentRecord>> {
        let data = self.get_json(
            "commentThreads",
            &[
                ("part", "snippet".to_string()),
                ("videoId", video_id.to_string()),
                ("order", "relevance".to_string()),
                ("maxResults", 100.min(max_results).to_string()),
            ],
            &format!("comments for {}", video_id),
        ).await?;

        Ok(items(&data)
            .map(|item| {
                let top = &item["snippet"]["topLevelComment"]["snippet"];
                CommentRecord {
                    author: str_field(top, "authorDisplayName"),
                    text: str_field(top, "textDisplay"),
                    like_count: top["likeCount"].as_u64().unwrap_or(0),
                    published_at: str_field(top, "publishedAt"),
                }
            })
            .collect())
    }
}

fn items(data: &Value) -> impl Iterator<Item = &Value> {
    data["items"].as_array().into_iter().flatten()
}

fn first_item(data: &Value) -> Option<&Value> {
    data["items"].as_array().and_then(|items| items.first())
}

fn str_field(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

/// Statistics arrive as decimal strings; hidden or malformed counts read as 0
fn count_field(value: &Value, key: &str) -> u64 {
    match &value[key] {
        Value::String(s) => s.parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

fn parse_video(video_id: &str, item: &Value) -> VideoRecord {
    let snippet = &item["snippet"];
    let stats = &item["statistics"];

    let string_list = |v: &Value| -> Vec<String> {
        v.as_array()
            .map(|arr| arr.iter().filter_map(|t| t.as_str().map(String::from)).collect())
            .unwrap_or_default()
    };

    VideoRecord {
        video_id: video_id.to_string(),
        title: str_field(snippet, "title"),
        description: str_field(snippet, "description"),
        channel_id: str_field(snippet, "channelId"),
        channel_title: str_field(snippet, "channelTitle"),
        published_at: str_field(snippet, "publishedAt"),
        tags: string_list(&snippet["tags"]),
        category_id: str_field(snippet, "categoryId"),
        duration: item["contentDetails"]["duration"].as_str().unwrap_or("PT0S").to_string(),
        topics: string_list(&item["topicDetails"]["topicCategories"]),
        view_count: count_field(stats, "viewCount"),
        like_count: count_field(stats, "likeCount"),
        comment_count: count_field(stats, "commentCount"),
        ..VideoRecord::default()
    }
}
