//! End-to-end run: HTTP provider (wiremock) through the importer into SQLite

use baseball_etl::api::StatsApiClient;
use baseball_etl::importer::SeasonImporter;
use baseball_etl::models::{Config, ImportStatus, SeasonRange};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{database, logging, test_data};

fn test_config(base_url: &str) -> Config {
    Config {
        stats_api_url: base_url.to_string(),
        database_url: "unused".to_string(),
        s3_bucket: None,
        s3_prefix: "batting_stats".to_string(),
        start_season: 2023,
        end_season: 2024,
        excluded_seasons: vec![],
        min_plate_appearances: 100,
        rate_limit_per_minute: 60_000,
        slack_webhook_url: None,
    }
}

async fn mount_season(server: &MockServer, season: i32, rows: usize) {
    Mock::given(method("GET"))
        .and(path(format!("/batting/{}", season)))
        .and(query_param("qual", "100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::Value::Array(
                test_data::raw_rows(rows)
                    .into_iter()
                    .map(serde_json::Value::Object)
                    .collect(),
            )),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn http_to_sqlite_run_with_one_failing_season() {
    logging::init_test_logging();

    let server = MockServer::start().await;
    mount_season(&server, 2023, 4).await;
    Mock::given(method("GET"))
        .and(path("/batting/2024"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let provider = StatsApiClient::new(&config).unwrap();
    let importer = SeasonImporter::new(provider, db.clone(), config.rate_limit_per_minute);
    let result = importer.run(&config.season_range()).await;

    assert_eq!(result.status, ImportStatus::Success);
    assert_eq!(result.total_records, 4);
    assert_eq!(result.failed_seasons, vec![2024]);
    assert_eq!(db.count_season(2023).await.unwrap(), 4);
    assert_eq!(db.count_season(2024).await.unwrap(), 0);
}

#[tokio::test]
async fn rerunning_the_full_pipeline_is_idempotent() {
    logging::init_test_logging();

    let server = MockServer::start().await;
    mount_season(&server, 2023, 6).await;
    mount_season(&server, 2024, 8).await;

    let config = test_config(&server.uri());
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();
    let range = config.season_range();

    for _ in 0..2 {
        let provider = StatsApiClient::new(&config).unwrap();
        let importer = SeasonImporter::new(provider, db.clone(), config.rate_limit_per_minute);
        let result = importer.run(&range).await;

        assert_eq!(result.status, ImportStatus::Success);
        assert_eq!(result.total_records, 14);
        assert!(result.failed_seasons.is_empty());
    }

    // Same logical row count as a single run.
    assert_eq!(db.count_all().await.unwrap(), 14);
}

#[tokio::test]
async fn excluded_season_is_never_requested_over_http() {
    logging::init_test_logging();

    let server = MockServer::start().await;
    mount_season(&server, 2023, 3).await;
    // 2024 expects zero requests; an unmatched request would 404 and the
    // expectation below would also fail.
    Mock::given(method("GET"))
        .and(path("/batting/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.excluded_seasons = vec![2024];
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let provider = StatsApiClient::new(&config).unwrap();
    let importer = SeasonImporter::new(provider, db.clone(), config.rate_limit_per_minute);
    let result = importer.run(&config.season_range()).await;

    assert_eq!(result.status, ImportStatus::Success);
    assert_eq!(result.total_records, 3);
    assert_eq!(result.failed_seasons, vec![2024]);
}
