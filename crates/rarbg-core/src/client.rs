//! HTTP client with rate limiting and retry logic for rarbg and IMDB
//!
//! Provides a rate-limited HTTP client that respects server limits
//! and implements exponential backoff for transient errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, LOCATION};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{LeaderboardError, Result};
use crate::source::PageSource;
use crate::url::{IMDB_BASE_URL, TRACKER_BASE_URL, build_review_path, build_search_path};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Path fragment of the tracker's captcha page
const THREAT_DEFENCE: &str = "threat_defence";

const MAX_REDIRECTS: usize = 5;

/// Upper bound for a single retry backoff
const MAX_BACKOFF_SECS: u64 = 60;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient errors (default: 3)
    pub max_retries: u32,
    /// Tracker origin (default: https://rarbg.to)
    pub tracker_base_url: String,
    /// Review site origin (default: https://www.imdb.com)
    pub review_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_retries: 3,
            tracker_base_url: TRACKER_BASE_URL.to_string(),
            review_base_url: IMDB_BASE_URL.to_string(),
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Panics
    /// If `requests_per_second` is not a positive finite number.
    /// [`RarbgClient::with_config`] rejects such rates before getting here.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(Instant::now() - min_interval)),
        }
    }

    /// Wait until the minimum interval since the last request has passed
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// HTTP client for the tracker and the review site
///
/// - Rate limiting shared across both hosts
/// - Automatic retries with exponential backoff for transient errors
/// - Cookies sent verbatim, never stored or refreshed
pub struct RarbgClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    max_retries: u32,
    tracker_base_url: String,
    review_base_url: String,
}

impl RarbgClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `InvalidConfig` - `requests_per_second` is zero, negative or not finite
    /// - `HttpError` - the underlying client could not be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if !config.requests_per_second.is_finite() || config.requests_per_second <= 0.0 {
            return Err(LeaderboardError::InvalidConfig(format!(
                "requests_per_second must be a positive number, got {}",
                config.requests_per_second
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    HeaderValue::from_static("en-US,en;q=0.9"),
                );
                headers
            })
            .build()
            .map_err(LeaderboardError::HttpError)?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            max_retries: config.max_retries,
            tracker_base_url: config.tracker_base_url.trim_end_matches('/').to_string(),
            review_base_url: config.review_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a page by absolute URL, sending `cookie` as the Cookie header
    ///
    /// # Errors
    /// - `HttpError` - Network or HTTP errors
    /// - `RateLimited` - Server returned 429 after all retries exhausted
    /// - `NotFound` - Server returned 404
    /// - `Blocked` - Tracker redirected to its captcha page
    pub async fn fetch(&self, url: &str, cookie: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;

            match self.do_fetch(url, cookie).await {
                Ok(body) => return Ok(body),
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    let backoff = Self::backoff(attempt);
                    warn!(url, attempt, error = %e, "Retrying request after {:?}", backoff);
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single fetch attempt with manual redirect following
    async fn do_fetch(&self, url: &str, cookie: &str) -> Result<String> {
        let mut current_url = url.to_string();

        for _ in 0..MAX_REDIRECTS {
            debug!(url = %current_url, "GET");
            let mut request = self.client.get(&current_url);
            if !cookie.is_empty() {
                let value = HeaderValue::from_str(cookie).map_err(|_| {
                    LeaderboardError::ParseError("Cookie contains invalid characters".to_string())
                })?;
                request = request.header(COOKIE, value);
            }

            let response = request.send().await.map_err(LeaderboardError::HttpError)?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LeaderboardError::RateLimited);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(LeaderboardError::NotFound(current_url));
            }

            if let Err(e) = response.error_for_status_ref() {
                return Err(LeaderboardError::HttpError(e));
            }

            if status.is_redirection() {
                let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|loc| loc.to_str().ok())
                else {
                    // No usable Location header, return the body as-is
                    return response.text().await.map_err(LeaderboardError::HttpError);
                };

                let next = response
                    .url()
                    .join(location)
                    .map_err(|e| LeaderboardError::ParseError(format!("Bad redirect {}: {}", location, e)))?;
                if next.path().contains(THREAT_DEFENCE) {
                    return Err(LeaderboardError::Blocked(next.to_string()));
                }
                current_url = next.to_string();
                continue;
            }

            return response.text().await.map_err(LeaderboardError::HttpError);
        }

        Err(LeaderboardError::ParseError("Too many redirects".to_string()))
    }

    /// Exponential backoff: 1s, 2s, 4s, ... capped at [`MAX_BACKOFF_SECS`]
    fn backoff(attempt: u32) -> Duration {
        let secs = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
    }

    /// Check if an error is retryable
    fn is_retryable(error: &LeaderboardError) -> bool {
        match error {
            LeaderboardError::RateLimited => true,
            LeaderboardError::HttpError(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Get a reference to the rate limiter (for testing)
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[async_trait]
impl PageSource for RarbgClient {
    async fn fetch_leaderboard_page(&self, cookie: &str) -> Result<String> {
        let url = format!("{}/", self.tracker_base_url);
        self.fetch(&url, cookie).await
    }

    async fn search_by_title(&self, release: &str, cookie: &str) -> Result<String> {
        let url = format!("{}{}", self.tracker_base_url, build_search_path(release));
        self.fetch(&url, cookie).await
    }

    async fn fetch_review_page(&self, imdb_id: &str, cookie: &str) -> Result<String> {
        let url = format!("{}{}", self.review_base_url, build_review_path(imdb_id));
        self.fetch(&url, cookie).await
    }
}
