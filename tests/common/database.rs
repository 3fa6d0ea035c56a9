//! Test database utilities

use anyhow::Result;
use baseball_etl::sink::DatabaseManager;
use tempfile::TempDir;

/// Create a fresh SQLite-backed sink in a temp directory. The directory
/// handle must stay alive for the duration of the test.
pub async fn init_fresh_test_database() -> Result<(DatabaseManager, TempDir)> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("test.db");
    let manager = DatabaseManager::new(db_path.to_str().unwrap()).await?;
    Ok((manager, dir))
}
