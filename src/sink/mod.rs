use anyhow::Result;

use crate::models::{BattingLine, ManifestEntry};

pub mod database;
pub mod object_store;

pub use database::DatabaseManager;
pub use object_store::ParquetSeasonSink;

/// Persistence target for one season's clean rows.
///
/// `write_season` is one atomic unit per season: it either persists the
/// whole set or nothing, and re-running the same season must not create
/// duplicate logical rows (upsert for SQL, key overwrite for object stores).
#[async_trait::async_trait]
pub trait SeasonSink: Send + Sync {
    async fn write_season(&self, season: i32, lines: &[BattingLine]) -> Result<ManifestEntry>;

    /// Human-readable location for reporting, e.g. a table or bucket path.
    fn location(&self) -> String;
}
