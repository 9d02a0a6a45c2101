//! HTTP clients for the external services the pipeline talks to.

/// GitHub REST API client
pub mod github;
/// Stack Overflow and npm activity counts
pub mod stats;
/// YouTube Data API client
pub mod youtube;

use crate::error::{PipelineError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub use github::GitHubClient;
pub use stats::{CommunityStats, HttpCommunityStats, NoCommunityStats};
pub use youtube::YouTubeClient;

const USER_AGENT_VALUE: &str = "contentmonetizer";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds a reqwest client with the crate's user agent, a request timeout and
/// an optional `Authorization: token <t>` header
pub fn create_http_client(token: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    if let Some(token) = token {
        let auth_value = HeaderValue::from_str(&format!("token {}", token))
            .map_err(|e| PipelineError::Config(format!("Invalid token header: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);
    }

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

/// Which API a response came from, used to pick the error variant
#[derive(Debug, Clone, Copy)]
pub(crate) enum Api {
    YouTube,
    GitHub,
}

/// Maps non-success statuses onto pipeline errors
///
/// 403 and 429 become `RateLimitExceeded`; anything else becomes the API's own variant.
pub(crate) async fn check_status(api: Api, response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("{} failed with HTTP {}: {}", what, status, body.trim());

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PipelineError::RateLimitExceeded(message));
    }

    Err(match api {
        Api::YouTube => PipelineError::YouTubeApi(message),
        Api::GitHub => PipelineError::GitHubApi(message),
    })
}

/// Strips a trailing slash so paths can be appended with `format!`
pub(crate) fn normalize_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
