use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Unprocessed provider rows for one season.
///
/// The provider schema is not stable across seasons: columns may be missing
/// entirely, so rows stay as loose JSON maps until the transform step.
#[derive(Debug, Clone, Default)]
pub struct RawSeason {
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl RawSeason {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One normalized batter-season row, ready for sink persistence.
///
/// Counted stats are integers, rate stats are rounded to 3 decimal places.
/// `player_name` is never empty and `season` always carries the season the
/// row was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    pub player_name: String,
    pub season: i32,
    pub team: Option<String>,
    pub games: i64,
    pub at_bats: i64,
    pub runs: i64,
    pub hits: i64,
    pub doubles: i64,
    pub triples: i64,
    pub home_runs: i64,
    pub rbi: i64,
    pub stolen_bases: i64,
    pub batting_avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

/// Inclusive season range plus the set of seasons known to be unavailable
/// from the provider. Excluded seasons are reported as failed without a
/// fetch attempt.
#[derive(Debug, Clone)]
pub struct SeasonRange {
    pub start: i32,
    pub end: i32,
    pub excluded: BTreeSet<i32>,
}

impl SeasonRange {
    pub fn new(start: i32, end: i32, excluded: impl IntoIterator<Item = i32>) -> Self {
        Self {
            start,
            end,
            excluded: excluded.into_iter().collect(),
        }
    }

    /// Ordered sequence of seasons to attempt.
    pub fn seasons(&self) -> impl Iterator<Item = i32> + '_ {
        self.start..=self.end
    }

    pub fn is_excluded(&self, season: i32) -> bool {
        self.excluded.contains(&season)
    }

    /// Human-readable label, e.g. "2015-2025".
    pub fn label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Reference to one persisted output unit: where a season's rows landed and
/// how many there were. Created only on successful load, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub location: String,
    pub records: usize,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Error,
}

/// Aggregate outcome of one run over a season range.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub status: ImportStatus,
    pub total_records: usize,
    pub manifest: Vec<ManifestEntry>,
    pub failed_seasons: Vec<i32>,
    pub sink_location: String,
    pub duration_seconds: f64,
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        self.status == ImportStatus::Success
    }
}

/// Configuration for the importer binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub stats_api_url: String,
    pub database_url: String,
    pub s3_bucket: Option<String>,
    pub s3_prefix: String,
    pub start_season: i32,
    pub end_season: i32,
    pub excluded_seasons: Vec<i32>,
    pub min_plate_appearances: u32,
    pub rate_limit_per_minute: u32,
    pub slack_webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            stats_api_url: std::env::var("STATS_API_URL")
                .map_err(|_| anyhow::anyhow!("STATS_API_URL environment variable required"))?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "baseball.db".to_string()),
            s3_bucket: std::env::var("S3_BUCKET").ok(),
            s3_prefix: std::env::var("S3_PREFIX")
                .unwrap_or_else(|_| "batting_stats".to_string()),
            start_season: std::env::var("START_SEASON")
                .unwrap_or_else(|_| "2015".to_string())
                .parse()
                .unwrap_or(2015),
            end_season: std::env::var("END_SEASON")
                .unwrap_or_else(|_| "2025".to_string())
                .parse()
                .unwrap_or(2025),
            excluded_seasons: std::env::var("EXCLUDED_SEASONS")
                .unwrap_or_else(|_| "2022".to_string())
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect(),
            min_plate_appearances: std::env::var("MIN_PLATE_APPEARANCES")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            slack_webhook_url: std::env::var("SLACK_WEBHOOK_URL").ok(),
        })
    }

    pub fn season_range(&self) -> SeasonRange {
        SeasonRange::new(
            self.start_season,
            self.end_season,
            self.excluded_seasons.iter().copied(),
        )
    }
}
