//! Database sink operation tests

use baseball_etl::sink::SeasonSink;
use pretty_assertions::assert_eq;

use crate::common::{database, test_data};

#[test_log::test(tokio::test)]
async fn write_season_upserts_rows() {
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let lines = vec![
        test_data::batting_line("Aaron Judge", 2024),
        test_data::batting_line("Juan Soto", 2024),
    ];

    let entry = db.write_season(2024, &lines).await.unwrap();
    assert_eq!(entry.records, 2);
    assert!(entry.location.contains("season=2024"));

    assert_eq!(db.count_season(2024).await.unwrap(), 2);
    assert_eq!(db.count_all().await.unwrap(), 2);

    let stored = db.get_line("Aaron Judge", 2024).await.unwrap().unwrap();
    assert_eq!(stored.home_runs, 58);
    assert_eq!(stored.team.as_deref(), Some("NYY"));
}

#[test_log::test(tokio::test)]
async fn rewriting_a_season_does_not_duplicate_rows() {
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let lines = vec![
        test_data::batting_line("Aaron Judge", 2024),
        test_data::batting_line("Juan Soto", 2024),
    ];

    db.write_season(2024, &lines).await.unwrap();
    let count_once = db.count_all().await.unwrap();

    db.write_season(2024, &lines).await.unwrap();
    let count_twice = db.count_all().await.unwrap();

    assert_eq!(count_once, count_twice);
}

#[test_log::test(tokio::test)]
async fn rewriting_updates_changed_values() {
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let mut line = test_data::batting_line("Aaron Judge", 2024);
    db.write_season(2024, std::slice::from_ref(&line))
        .await
        .unwrap();

    line.home_runs = 62;
    line.team = Some("LAD".to_string());
    db.write_season(2024, std::slice::from_ref(&line))
        .await
        .unwrap();

    let stored = db.get_line("Aaron Judge", 2024).await.unwrap().unwrap();
    assert_eq!(stored.home_runs, 62);
    assert_eq!(stored.team.as_deref(), Some("LAD"));
    assert_eq!(db.count_all().await.unwrap(), 1);
}

#[test_log::test(tokio::test)]
async fn same_player_in_different_seasons_is_two_rows() {
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    db.write_season(2023, &[test_data::batting_line("Aaron Judge", 2023)])
        .await
        .unwrap();
    db.write_season(2024, &[test_data::batting_line("Aaron Judge", 2024)])
        .await
        .unwrap();

    assert_eq!(db.count_all().await.unwrap(), 2);
    assert_eq!(db.count_season(2023).await.unwrap(), 1);
    assert_eq!(db.count_season(2024).await.unwrap(), 1);
}

#[test_log::test(tokio::test)]
async fn empty_season_writes_nothing() {
    let (db, _dir) = database::init_fresh_test_database().await.unwrap();

    let entry = db.write_season(2024, &[]).await.unwrap();
    assert_eq!(entry.records, 0);
    assert_eq!(db.count_all().await.unwrap(), 0);
}
