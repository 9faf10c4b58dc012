// src/services/limiter.rs

//! Politeness gate for outbound requests.
//!
//! The remote server's informal rate limit is the binding constraint on
//! throughput, so request pacing is its own small abstraction instead of
//! ad hoc sleeps inside the fetch loop. The gate is a token bucket sized
//! to one token per politeness window: acquiring waits out the remainder
//! of the window opened by the previous request. Bulk list pages charge a
//! longer window than per-item pages.

use std::time::Duration;

use tokio::time::Instant;

use crate::models::FetchConfig;

/// Coarse request class, selecting the politeness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    /// Bulk list page (schedule index, standings, league totals)
    List,
    /// Per-item page (box score, team page)
    Item,
}

/// One-token politeness gate shared by all requests of a fetcher.
#[derive(Debug)]
pub struct RateGate {
    list_window: Duration,
    item_window: Duration,
    ready_at: Option<Instant>,
}

impl RateGate {
    pub fn new(list_window: Duration, item_window: Duration) -> Self {
        Self {
            list_window,
            item_window,
            ready_at: None,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            Duration::from_secs(config.list_delay_secs),
            Duration::from_secs(config.item_delay_secs),
        )
    }

    fn window(&self, class: PageClass) -> Duration {
        match class {
            PageClass::List => self.list_window,
            PageClass::Item => self.item_window,
        }
    }

    /// Wait until the previous request's window has elapsed, then charge
    /// the window for this request class.
    pub async fn acquire(&mut self, class: PageClass) {
        if let Some(ready_at) = self.ready_at {
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.ready_at = Some(Instant::now() + self.window(class));
    }
}
