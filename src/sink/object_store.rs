use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use arrow_array::{Float64Array, Int32Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use aws_sdk_s3::primitives::ByteStream;
use parquet::arrow::ArrowWriter;
use tracing::info;

use crate::models::{BattingLine, ManifestEntry};

use super::SeasonSink;

/// Object-store sink: one Parquet object per season, written to
/// `{prefix}/season={year}/batting_stats.parquet` and overwritten in place.
pub struct ParquetSeasonSink {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl ParquetSeasonSink {
    pub fn new(client: aws_sdk_s3::Client, bucket: &str, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Build a sink using the default AWS credential/region chain.
    pub async fn from_env(bucket: &str, prefix: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, prefix)
    }

    pub fn season_key(&self, season: i32) -> String {
        format!("{}/season={}/batting_stats.parquet", self.prefix, season)
    }
}

fn batting_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("player_name", DataType::Utf8, false),
        Field::new("season", DataType::Int32, false),
        Field::new("team", DataType::Utf8, true),
        Field::new("games", DataType::Int64, false),
        Field::new("at_bats", DataType::Int64, false),
        Field::new("runs", DataType::Int64, false),
        Field::new("hits", DataType::Int64, false),
        Field::new("doubles", DataType::Int64, false),
        Field::new("triples", DataType::Int64, false),
        Field::new("home_runs", DataType::Int64, false),
        Field::new("rbi", DataType::Int64, false),
        Field::new("stolen_bases", DataType::Int64, false),
        Field::new("batting_avg", DataType::Float64, false),
        Field::new("obp", DataType::Float64, false),
        Field::new("slg", DataType::Float64, false),
        Field::new("ops", DataType::Float64, false),
    ]))
}

/// Encode one season's rows as a single-row-group Parquet buffer.
pub fn encode_parquet(lines: &[BattingLine]) -> Result<Vec<u8>> {
    let schema = batting_schema();

    let names = StringArray::from(
        lines
            .iter()
            .map(|l| Some(l.player_name.as_str()))
            .collect::<Vec<_>>(),
    );
    let seasons = Int32Array::from(lines.iter().map(|l| l.season).collect::<Vec<_>>());
    let teams = StringArray::from(lines.iter().map(|l| l.team.as_deref()).collect::<Vec<_>>());
    let games = Int64Array::from(lines.iter().map(|l| l.games).collect::<Vec<_>>());
    let at_bats = Int64Array::from(lines.iter().map(|l| l.at_bats).collect::<Vec<_>>());
    let runs = Int64Array::from(lines.iter().map(|l| l.runs).collect::<Vec<_>>());
    let hits = Int64Array::from(lines.iter().map(|l| l.hits).collect::<Vec<_>>());
    let doubles = Int64Array::from(lines.iter().map(|l| l.doubles).collect::<Vec<_>>());
    let triples = Int64Array::from(lines.iter().map(|l| l.triples).collect::<Vec<_>>());
    let home_runs = Int64Array::from(lines.iter().map(|l| l.home_runs).collect::<Vec<_>>());
    let rbi = Int64Array::from(lines.iter().map(|l| l.rbi).collect::<Vec<_>>());
    let stolen_bases = Int64Array::from(lines.iter().map(|l| l.stolen_bases).collect::<Vec<_>>());
    let batting_avg = Float64Array::from(lines.iter().map(|l| l.batting_avg).collect::<Vec<_>>());
    let obp = Float64Array::from(lines.iter().map(|l| l.obp).collect::<Vec<_>>());
    let slg = Float64Array::from(lines.iter().map(|l| l.slg).collect::<Vec<_>>());
    let ops = Float64Array::from(lines.iter().map(|l| l.ops).collect::<Vec<_>>());

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(names),
            Arc::new(seasons),
            Arc::new(teams),
            Arc::new(games),
            Arc::new(at_bats),
            Arc::new(runs),
            Arc::new(hits),
            Arc::new(doubles),
            Arc::new(triples),
            Arc::new(home_runs),
            Arc::new(rbi),
            Arc::new(stolen_bases),
            Arc::new(batting_avg),
            Arc::new(obp),
            Arc::new(slg),
            Arc::new(ops),
        ],
    )
    .context("building batting record batch")?;

    let mut buf = Vec::new();
    let mut writer =
        ArrowWriter::try_new(&mut buf, schema, None).context("opening parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    Ok(buf)
}

#[async_trait::async_trait]
impl SeasonSink for ParquetSeasonSink {
    async fn write_season(&self, season: i32, lines: &[BattingLine]) -> Result<ManifestEntry> {
        let key = self.season_key(season);
        let body = encode_parquet(lines)?;
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| anyhow!("failed to upload s3://{}/{}: {}", self.bucket, key, e))?;

        info!(
            "Wrote {} rows ({} bytes) to s3://{}/{}",
            lines.len(),
            size,
            self.bucket,
            key
        );

        Ok(ManifestEntry {
            location: format!("s3://{}/{}", self.bucket, key),
            records: lines.len(),
        })
    }

    fn location(&self) -> String {
        format!("s3://{}/{}/", self.bucket, self.prefix)
    }
}
