use super::{create_http_client, normalize_base};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::warn;
use reqwest::Client;
use serde_json::Value;

/// Community activity signals used to weight technology trends
#[async_trait]
pub trait CommunityStats: Send + Sync {
    /// Stack Overflow questions tagged `tag` in the last 30 days
    async fn stack_overflow_questions(&self, tag: &str) -> u64;

    /// npm downloads of `package` over the last month
    async fn npm_downloads(&self, package: &str) -> u64;
}

/// Offline stats source; every count is zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommunityStats;

#[async_trait]
impl CommunityStats for NoCommunityStats {
    async fn stack_overflow_questions(&self, _tag: &str) -> u64 {
        0
    }

    async fn npm_downloads(&self, _package: &str) -> u64 {
        0
    }
}

/// Stack Exchange and npm registry backed stats
///
/// Request failures are logged and read as zero.
#[derive(Debug, Clone)]
pub struct HttpCommunityStats {
    client: Client,
    stack_exchange_base: String,
    npm_base: String,
}

impl HttpCommunityStats {
    /// Creates a stats source against the given API bases
    pub fn new(stack_exchange_base: &str, npm_base: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client(None)?,
            stack_exchange_base: normalize_base(stack_exchange_base),
            npm_base: normalize_base(npm_base),
        })
    }

    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self.client.get(url).query(query).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl CommunityStats for HttpCommunityStats {
    async fn stack_overflow_questions(&self, tag: &str) -> u64 {
        let since = (Utc::now() - Duration::days(30)).timestamp();
        let url = format!("{}/questions", self.stack_exchange_base);
        let query = [
            ("tagged", tag.to_lowercase()),
            ("site", "stackoverflow".to_string()),
            ("fromdate", since.to_string()),
            ("filter", "total".to_string()),
        ];

        match self.fetch(&url, &query).await {
            Ok(data) => data["total"].as_u64().unwrap_or(0),
            Err(e) => {
                warn!("Error fetching Stack Overflow trends for {}: {}", tag, e);
                0
            }
        }
    }

    async fn npm_downloads(&self, package: &str) -> u64 {
        let url = format!("{}/downloads/point/last-month/{}", self.npm_base, package);

        match self.fetch(&url, &[]).await {
            Ok(data) => data["downloads"].as_u64().unwrap_or(0),
            Err(e) => {
                warn!("Error fetching npm downloads for {}: {}", package, e);
                0
            }
        }
    }
}
