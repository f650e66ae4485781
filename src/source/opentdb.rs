//! Open Trivia DB client.
//!
//! Endpoints used:
//! - `GET {base}/api_category.php` for the catalog
//! - `GET {base}/api.php?amount={n}&category={id}` for question pages
//!
//! Question pages carry a `response_code` alongside the results; see
//! [`classify_response_code`].

use super::{CategoryCatalog, QuestionSupplier, SourceError};
use crate::config::TriviaConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use strictly_trivia_core::{CategoryId, CategoryRef, RawQuestion};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

const USER_AGENT: &str = concat!("strictly_trivia/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct CategoryListResponse {
    trivia_categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    id: CategoryId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct QuestionPage {
    response_code: u8,
    #[serde(default)]
    results: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    question: String,
    correct_answer: String,
}

/// Spaces requests at least `min_interval` apart.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(?wait_time, "Rate limiting");
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// HTTP client for an Open Trivia DB compatible API.
#[derive(Debug)]
pub struct OpenTdbClient {
    base_url: String,
    http: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl OpenTdbClient {
    /// Creates a client from configuration.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &TriviaConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SourceError::request(format!("Failed to build HTTP client: {}", e)))?;

        info!("Creating Open Trivia DB client");
        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            http,
            rate_limiter: RateLimiter::new(config.min_request_interval()),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        self.rate_limiter.wait().await;
        debug!(url, "Sending request");

        let response = self.http.get(url).send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::unavailable(format!("HTTP {} from {}", status, url)));
        }
        if !status.is_success() {
            return Err(SourceError::request(format!("HTTP {} from {}", status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::malformed(format!("Failed to parse response: {}", e)))
    }
}

fn classify_transport_error(err: reqwest::Error) -> SourceError {
    if err.is_connect() || err.is_timeout() {
        SourceError::unavailable(format!("Source unreachable: {}", err))
    } else {
        SourceError::request(format!("Request failed: {}", err))
    }
}

/// Maps an Open Trivia DB `response_code` onto a page outcome.
///
/// `0` and `1` (not enough questions) both yield whatever results were
/// sent; a short page is a shortfall for the caller to judge, not an error.
/// `5` is the API's rate limit and makes the source unavailable.
fn classify_response_code(code: u8) -> Result<(), SourceError> {
    match code {
        0 | 1 => Ok(()),
        2 => Err(SourceError::request("Invalid parameter (response code 2)")),
        3 | 4 => Err(SourceError::request(format!("Session token rejected (response code {})", code))),
        5 => Err(SourceError::unavailable("Rate limited (response code 5)")),
        other => Err(SourceError::malformed(format!("Unknown response code {}", other))),
    }
}

#[async_trait]
impl CategoryCatalog for OpenTdbClient {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<CategoryRef>, SourceError> {
        let url = format!("{}/api_category.php", self.base_url);
        let body: CategoryListResponse = self.get_json(&url).await?;

        let categories: Vec<_> = body
            .trivia_categories
            .into_iter()
            .map(|c| CategoryRef::new(c.id, c.name))
            .collect();
        info!(count = categories.len(), "Fetched category catalog");
        Ok(categories)
    }
}

#[async_trait]
impl QuestionSupplier for OpenTdbClient {
    #[instrument(skip(self))]
    async fn fetch_questions(
        &self,
        category: CategoryId,
        count: usize,
    ) -> Result<Vec<RawQuestion>, SourceError> {
        let url = format!("{}/api.php?amount={}&category={}", self.base_url, count, category);
        let page: QuestionPage = self.get_json(&url).await?;
        classify_response_code(page.response_code)?;

        let questions: Vec<_> = page
            .results
            .into_iter()
            .map(|q| RawQuestion::new(q.question, q.correct_answer))
            .collect();
        debug!(returned = questions.len(), response_code = page.response_code, "Fetched question page");
        Ok(questions)
    }
}
