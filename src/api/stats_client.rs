use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::{Config, RawSeason};

use super::BattingStatsProvider;

/// HTTP client for the batting stats provider.
///
/// The provider exposes one endpoint per season:
/// `GET {base}/batting/{season}?qual={min_pa}` returning a JSON array of
/// row objects. Column names are source-defined and may vary by season.
pub struct StatsApiClient {
    client: Client,
    base_url: String,
    min_plate_appearances: u32,
}

impl StatsApiClient {
    /// Create a new stats client from application config.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("baseball-etl/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: config.stats_api_url.trim_end_matches('/').to_string(),
            min_plate_appearances: config.min_plate_appearances,
        })
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: &str, min_plate_appearances: u32) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            min_plate_appearances,
        }
    }
}

#[async_trait::async_trait]
impl BattingStatsProvider for StatsApiClient {
    async fn fetch_batting(&self, season: i32) -> Result<RawSeason> {
        let url = format!(
            "{}/batting/{}?qual={}",
            self.base_url, season, self.min_plate_appearances
        );

        debug!("Making request to: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "provider request for {} failed with status {}: {}",
                season,
                status,
                error_text
            ));
        }

        let json: Value = response.json().await?;

        let rows = json
            .as_array()
            .ok_or_else(|| anyhow!("provider returned non-array response for {}", season))?
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect::<Vec<_>>();

        debug!("Retrieved {} raw rows for season {}", rows.len(), season);
        Ok(RawSeason { rows })
    }
}
