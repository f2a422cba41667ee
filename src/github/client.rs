// GitHub API HTTP client.
// Handles optional authentication, rate limit tracking, and status mapping.

use chrono::{DateTime, Utc};
use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT},
};

use crate::error::{FindstarError, Result};

use super::types::{ErrorBody, RateLimit};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with rate limit tracking.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    per_page: u32,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a client for `base_url`, authenticating when a token is given.
    pub fn new(base_url: &str, token: Option<&str>, per_page: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| FindstarError::InvalidHeader(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("findstar"));

        let client = Client::builder().default_headers(headers).build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| FindstarError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FindstarError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            per_page,
            rate_limit: RateLimit::default(),
        })
    }

    /// Get the rate limit seen on the most recent response.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    pub fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &mut self,
        segments: &[&str],
        params: &T,
    ) -> Result<Response> {
        let url = self.endpoint_url(segments);
        let response = self.client.get(url).query(params).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        let headers = response.headers();

        if let Some(limit) = header_number(headers, "x-ratelimit-limit") {
            self.rate_limit.limit = limit;
        }
        self.rate_limit.remaining = header_number(headers, "x-ratelimit-remaining");
        self.rate_limit.reset = header_number(headers, "x-ratelimit-reset");
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(
            status,
            &self.rate_limit,
            retry_after.as_deref(),
            &body,
            Utc::now(),
        ))
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Resolve a `Retry-After` value, either delay seconds or an HTTP date.
fn retry_at(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return chrono::TimeDelta::try_seconds(secs)
            .and_then(|delta| now.checked_add_signed(delta));
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Map a non-success response to an error.
///
/// 403 and 429 count as throttling when the quota is exhausted or the server
/// sent `Retry-After`; everything else is an API error carrying GitHub's
/// `message` when the body has one.
fn classify_error(
    status: StatusCode,
    rate_limit: &RateLimit,
    retry_after: Option<&str>,
    body: &str,
    now: DateTime<Utc>,
) -> FindstarError {
    let throttled_status =
        status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS;
    if throttled_status && (rate_limit.remaining == Some(0) || retry_after.is_some()) {
        let reset_at = match retry_after {
            Some(value) => retry_at(value, now),
            None => rate_limit
                .reset
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        };
        return FindstarError::RateLimited { reset_at };
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string()
    } else {
        message
    };

    FindstarError::Api {
        status: status.as_u16(),
        message,
    }
}
