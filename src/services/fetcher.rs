// src/services/fetcher.rs

//! HTTP fetch service.
//!
//! Issues GET requests through the politeness gate, presenting a browser
//! identity from a rotating pool. Throttling (HTTP 429) honors the
//! server's retry hint when present and falls back to exponential
//! backoff; transport errors retry on the same backoff schedule. Any
//! other error status is treated as permanent and returned immediately.
//! The caller decides whether a failure skips one unit of work or aborts.

use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use reqwest::{Client, StatusCode, header};

use crate::error::{AppError, Result};
use crate::models::FetchConfig;
use crate::utils::log;

use super::limiter::{PageClass, RateGate};

/// HTTP fetcher owning its client, identity pool and politeness gate.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    gate: RateGate,
    agent_cursor: usize,
}

impl Fetcher {
    /// Create a fetcher from explicit configuration.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let gate = RateGate::from_config(&config);
        Ok(Self {
            client,
            config,
            gate,
            agent_cursor: 0,
        })
    }

    /// Fetch a page body.
    ///
    /// Returns the response text on success, `HttpStatus` for permanent
    /// error statuses, and `RetriesExhausted` once transient failures use
    /// up the attempt ceiling. Never returns a body for a non-2xx answer.
    pub async fn fetch(&mut self, url: &str, class: PageClass) -> Result<String> {
        self.gate.acquire(class).await;

        let attempts = self.config.max_retries;
        for attempt in 0..attempts {
            let response = self
                .client
                .get(url)
                .header(header::USER_AGENT, self.current_agent().to_string())
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(error) => {
                    let wait = self.backoff_delay(attempt);
                    log::warn(&format!(
                        "Request error for {url}: {error}. Waiting {}s (attempt {}/{attempts})",
                        wait.as_secs(),
                        attempt + 1,
                    ));
                    tokio::time::sleep(wait).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response.text().await?);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(retry_after_delay)
                    .unwrap_or_else(|| self.backoff_delay(attempt));
                log::warn(&format!(
                    "Throttled on {url}. Waiting {}s (attempt {}/{attempts})",
                    wait.as_secs(),
                    attempt + 1,
                ));
                tokio::time::sleep(wait).await;
                self.rotate_agent();
                continue;
            }

            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Err(AppError::RetriesExhausted {
            url: url.to_string(),
            attempts,
        })
    }

    fn current_agent(&self) -> &str {
        &self.config.user_agents[self.agent_cursor % self.config.user_agents.len()]
    }

    fn rotate_agent(&mut self) {
        self.agent_cursor = (self.agent_cursor + 1) % self.config.user_agents.len();
    }

    /// Exponential backoff schedule: `initial * 2^attempt`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(20);
        Duration::from_secs(self.config.initial_backoff_secs.saturating_mul(factor))
    }
}

/// Parse a Retry-After header value: either a second count or an
/// HTTP-date. A date already in the past clamps to a zero wait.
pub fn retry_after_delay(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let retry_at = NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT").ok()?;
    let wait = retry_at - Utc::now().naive_utc();
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn test_config() -> FetchConfig {
        FetchConfig {
            user_agents: vec!["agent-a".into(), "agent-b".into()],
            timeout_secs: 5,
            max_retries: 3,
            initial_backoff_secs: 0,
            list_delay_secs: 0,
            item_delay_secs: 0,
        }
    }

    #[test]
    fn test_backoff_is_strictly_increasing_until_the_ceiling() {
        let mut config = test_config();
        config.initial_backoff_secs = 10;
        let fetcher = Fetcher::new(config).unwrap();

        let delays: Vec<_> = (0..5).map(|attempt| fetcher.backoff_delay(attempt)).collect();
        assert_eq!(delays[0], Duration::from_secs(10));
        for pair in delays.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_retry_after_seconds() {
        assert_eq!(retry_after_delay("30"), Some(Duration::from_secs(30)));
        assert_eq!(retry_after_delay(" 0 "), Some(Duration::from_secs(0)));
    }

    #[test]
    fn test_retry_after_http_date_in_the_past_clamps_to_zero() {
        assert_eq!(
            retry_after_delay("Wed, 21 Oct 2015 07:28:00 GMT"),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_retry_after_garbage_is_none() {
        assert_eq!(retry_after_delay("soon"), None);
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200).body("<html>ok</html>");
            })
            .await;

        let mut fetcher = Fetcher::new(test_config()).unwrap();
        let body = fetcher.fetch(&server.url("/page"), PageClass::Item).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_permanent_status_fails_without_retry() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let mut fetcher = Fetcher::new(test_config()).unwrap();
        let error = fetcher
            .fetch(&server.url("/missing"), PageClass::Item)
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::HttpStatus { status: 404, .. }));
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_throttling_retries_until_the_ceiling() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/busy");
                then.status(429).header("Retry-After", "0");
            })
            .await;

        let mut fetcher = Fetcher::new(test_config()).unwrap();
        let error = fetcher
            .fetch(&server.url("/busy"), PageClass::List)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            AppError::RetriesExhausted { attempts: 3, .. }
        ));
        assert_eq!(mock.hits_async().await, 3);
    }

    #[tokio::test]
    async fn test_throttling_rotates_the_client_identity() {
        let server = MockServer::start_async().await;
        let first_identity = server
            .mock_async(|when, then| {
                when.method(GET).path("/busy").header("user-agent", "agent-a");
                then.status(429).header("Retry-After", "0");
            })
            .await;
        let second_identity = server
            .mock_async(|when, then| {
                when.method(GET).path("/busy").header("user-agent", "agent-b");
                then.status(200).body("through");
            })
            .await;

        let mut fetcher = Fetcher::new(test_config()).unwrap();
        let body = fetcher.fetch(&server.url("/busy"), PageClass::List).await.unwrap();

        assert_eq!(body, "through");
        assert_eq!(first_identity.hits_async().await, 1);
        assert_eq!(second_identity.hits_async().await, 1);
    }
}
