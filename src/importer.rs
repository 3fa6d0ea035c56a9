use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiRateLimiter, BattingStatsProvider};
use crate::models::{ImportResult, ImportStatus, ManifestEntry, SeasonRange};
use crate::sink::SeasonSink;
use crate::transform;

/// Why one season failed. Every variant stays inside the per-season
/// boundary; none of them aborts the run.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("season excluded from import (known provider limitation)")]
    Excluded,
    #[error("fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),
    #[error("transform failed: {0}")]
    Transform(#[source] anyhow::Error),
    #[error("sink write failed: {0}")]
    Load(#[source] anyhow::Error),
}

/// Sequential fetch-transform-load over a season range.
///
/// Failure is isolated per season: a failing season is recorded and the
/// loop moves on. There is no retry within a run; reruns rely on the sink's
/// idempotence. The run escalates to an error result only when no season
/// loaded any records at all.
pub struct SeasonImporter<P, S> {
    provider: P,
    sink: S,
    limiter: ApiRateLimiter,
}

impl<P: BattingStatsProvider, S: SeasonSink> SeasonImporter<P, S> {
    pub fn new(provider: P, sink: S, rate_limit_per_minute: u32) -> Self {
        Self {
            provider,
            sink,
            limiter: ApiRateLimiter::new(rate_limit_per_minute),
        }
    }

    async fn import_season(&self, season: i32) -> Result<ManifestEntry, SeasonError> {
        let raw = self
            .provider
            .fetch_batting(season)
            .await
            .map_err(SeasonError::Fetch)?;

        let lines = transform::clean_season(&raw, season).map_err(SeasonError::Transform)?;

        self.sink
            .write_season(season, &lines)
            .await
            .map_err(SeasonError::Load)
    }

    /// Run the import over the whole range and aggregate the outcome.
    ///
    /// Always returns a structured result; `status` is `Error` only for a
    /// total failure (zero records across every attempted season).
    pub async fn run(&self, range: &SeasonRange) -> ImportResult {
        let started = Instant::now();

        info!(
            "📊 Importing seasons {} into {}",
            range.label(),
            self.sink.location()
        );

        let mut total_records = 0usize;
        let mut manifest: Vec<ManifestEntry> = Vec::new();
        let mut failed_seasons: Vec<i32> = Vec::new();
        let mut first_attempt = true;

        for season in range.seasons() {
            if range.is_excluded(season) {
                info!("⊘ {}: skipped ({})", season, SeasonError::Excluded);
                failed_seasons.push(season);
                continue;
            }

            if !first_attempt {
                self.limiter.wait().await;
            }
            first_attempt = false;

            match self.import_season(season).await {
                Ok(entry) => {
                    info!("✅ {}: {} records -> {}", season, entry.records, entry.location);
                    total_records += entry.records;
                    manifest.push(entry);
                }
                Err(e) => {
                    error!("❌ {}: failed - {}", season, e);
                    failed_seasons.push(season);
                }
            }
        }

        failed_seasons.sort_unstable();
        failed_seasons.dedup();

        let status = if total_records > 0 {
            ImportStatus::Success
        } else {
            ImportStatus::Error
        };

        if !failed_seasons.is_empty() {
            warn!("⚠️  Failed seasons: {:?}", failed_seasons);
        }

        let result = ImportResult {
            status,
            total_records,
            manifest,
            failed_seasons,
            sink_location: self.sink.location(),
            duration_seconds: started.elapsed().as_secs_f64(),
        };

        match result.status {
            ImportStatus::Success => info!(
                "✅ Import completed: {} records from {} seasons in {:.2}s",
                result.total_records,
                result.manifest.len(),
                result.duration_seconds
            ),
            ImportStatus::Error => error!(
                "❌ Import failed: no records loaded for {} ({} seasons failed)",
                range.label(),
                result.failed_seasons.len()
            ),
        }

        result
    }
}
