//! Common test utilities and helpers

pub mod database;

pub mod logging {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize tracing output for tests (idempotent).
    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("baseball_etl=debug")
                .with_test_writer()
                .try_init();
        });
    }
}

/// Test data builders
pub mod test_data {
    use baseball_etl::models::BattingLine;
    use serde_json::{Map, Value};

    /// A complete raw provider row with every required column present.
    pub fn raw_row(name: &str, home_runs: i64) -> Map<String, Value> {
        serde_json::from_value(serde_json::json!({
            "Name": name,
            "Team": "NYY",
            "G": 148, "AB": 550, "R": 122, "H": 158,
            "2B": 28, "3B": 0, "HR": home_runs, "RBI": 144, "SB": 10,
            "AVG": 0.311, "OBP": 0.458, "SLG": 0.701, "OPS": 1.159
        }))
        .unwrap()
    }

    /// A raw season of `count` distinct players.
    pub fn raw_rows(count: usize) -> Vec<Map<String, Value>> {
        (0..count)
            .map(|i| raw_row(&format!("Player {}", i), i as i64))
            .collect()
    }

    pub fn batting_line(name: &str, season: i32) -> BattingLine {
        BattingLine {
            player_name: name.to_string(),
            season,
            team: Some("NYY".to_string()),
            games: 148,
            at_bats: 550,
            runs: 122,
            hits: 158,
            doubles: 28,
            triples: 0,
            home_runs: 58,
            rbi: 144,
            stolen_bases: 10,
            batting_avg: 0.311,
            obp: 0.458,
            slg: 0.701,
            ops: 1.159,
        }
    }
}
