use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::models::{BattingLine, ManifestEntry};

use super::SeasonSink;

/// SQLX-based database sink for batting lines.
///
/// One row per (player_name, season); writes go through
/// `ON CONFLICT ... DO UPDATE` so re-importing a season is idempotent.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
    database_url: String,
}

impl DatabaseManager {
    /// Connect and create the schema if it does not exist yet.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(database_url)
                    .create_if_missing(true),
            )
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS batting_lines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name TEXT NOT NULL,
                season INTEGER NOT NULL,
                team TEXT,
                games INTEGER NOT NULL,
                at_bats INTEGER NOT NULL,
                runs INTEGER NOT NULL,
                hits INTEGER NOT NULL,
                doubles INTEGER NOT NULL,
                triples INTEGER NOT NULL,
                home_runs INTEGER NOT NULL,
                rbi INTEGER NOT NULL,
                stolen_bases INTEGER NOT NULL,
                batting_avg REAL NOT NULL,
                obp REAL NOT NULL,
                slg REAL NOT NULL,
                ops REAL NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(player_name, season)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_batting_lines_season ON batting_lines(season)",
        )
        .execute(&pool)
        .await?;

        info!("Database initialized at {}", database_url);

        Ok(Self {
            pool,
            database_url: database_url.to_string(),
        })
    }

    /// Number of rows stored for one season.
    pub async fn count_season(&self, season: i32) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM batting_lines WHERE season = ?")
            .bind(season)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Total rows stored across all seasons.
    pub async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM batting_lines")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Fetch one stored line, mainly for tests and spot checks.
    pub async fn get_line(&self, player_name: &str, season: i32) -> Result<Option<BattingLine>> {
        let row = sqlx::query(
            r#"
            SELECT player_name, season, team, games, at_bats, runs, hits,
                   doubles, triples, home_runs, rbi, stolen_bases,
                   batting_avg, obp, slg, ops
            FROM batting_lines
            WHERE player_name = ? AND season = ?
            "#,
        )
        .bind(player_name)
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => Some(BattingLine {
                player_name: row.try_get("player_name")?,
                season: row.try_get("season")?,
                team: row.try_get("team")?,
                games: row.try_get("games")?,
                at_bats: row.try_get("at_bats")?,
                runs: row.try_get("runs")?,
                hits: row.try_get("hits")?,
                doubles: row.try_get("doubles")?,
                triples: row.try_get("triples")?,
                home_runs: row.try_get("home_runs")?,
                rbi: row.try_get("rbi")?,
                stolen_bases: row.try_get("stolen_bases")?,
                batting_avg: row.try_get("batting_avg")?,
                obp: row.try_get("obp")?,
                slg: row.try_get("slg")?,
                ops: row.try_get("ops")?,
            }),
            None => None,
        })
    }
}

#[async_trait::async_trait]
impl SeasonSink for DatabaseManager {
    async fn write_season(&self, season: i32, lines: &[BattingLine]) -> Result<ManifestEntry> {
        // One transaction per season: the upsert batch lands fully or not at all.
        let mut tx = self.pool.begin().await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO batting_lines (
                    player_name, season, team, games, at_bats, runs, hits,
                    doubles, triples, home_runs, rbi, stolen_bases,
                    batting_avg, obp, slg, ops
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(player_name, season) DO UPDATE SET
                    team = excluded.team,
                    games = excluded.games,
                    at_bats = excluded.at_bats,
                    runs = excluded.runs,
                    hits = excluded.hits,
                    doubles = excluded.doubles,
                    triples = excluded.triples,
                    home_runs = excluded.home_runs,
                    rbi = excluded.rbi,
                    stolen_bases = excluded.stolen_bases,
                    batting_avg = excluded.batting_avg,
                    obp = excluded.obp,
                    slg = excluded.slg,
                    ops = excluded.ops
                "#,
            )
            .bind(&line.player_name)
            .bind(line.season)
            .bind(&line.team)
            .bind(line.games)
            .bind(line.at_bats)
            .bind(line.runs)
            .bind(line.hits)
            .bind(line.doubles)
            .bind(line.triples)
            .bind(line.home_runs)
            .bind(line.rbi)
            .bind(line.stolen_bases)
            .bind(line.batting_avg)
            .bind(line.obp)
            .bind(line.slg)
            .bind(line.ops)
            .execute(&mut tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ManifestEntry {
            location: format!("{}:batting_lines/season={}", self.database_url, season),
            records: lines.len(),
        })
    }

    fn location(&self) -> String {
        format!("{}:batting_lines", self.database_url)
    }
}
