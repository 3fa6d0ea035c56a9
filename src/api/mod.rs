use std::time::Duration;

use anyhow::Result;

use crate::models::RawSeason;

pub mod stats_client;
pub use stats_client::StatsApiClient;

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// Source of raw per-season batting statistics.
#[async_trait::async_trait]
pub trait BattingStatsProvider: Send + Sync {
    async fn fetch_batting(&self, season: i32) -> Result<RawSeason>;
}
