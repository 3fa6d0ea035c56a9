use std::collections::HashSet;

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{BattingLine, RawSeason};

/// How a mapped value is coerced into the clean schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Count,
    Rate,
}

/// One entry of the source-column to target-field mapping.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub source: &'static str,
    pub target: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Column mapping for the batting dataset. `required` columns must be
/// present in the provider response; rows missing a required value are
/// dropped.
pub const BATTING_FIELDS: &[FieldSpec] = &[
    FieldSpec { source: "Name", target: "player_name", kind: FieldKind::Text, required: true },
    FieldSpec { source: "Team", target: "team", kind: FieldKind::Text, required: false },
    FieldSpec { source: "G", target: "games", kind: FieldKind::Count, required: true },
    FieldSpec { source: "AB", target: "at_bats", kind: FieldKind::Count, required: true },
    FieldSpec { source: "R", target: "runs", kind: FieldKind::Count, required: true },
    FieldSpec { source: "H", target: "hits", kind: FieldKind::Count, required: true },
    FieldSpec { source: "2B", target: "doubles", kind: FieldKind::Count, required: true },
    FieldSpec { source: "3B", target: "triples", kind: FieldKind::Count, required: true },
    FieldSpec { source: "HR", target: "home_runs", kind: FieldKind::Count, required: true },
    FieldSpec { source: "RBI", target: "rbi", kind: FieldKind::Count, required: true },
    FieldSpec { source: "SB", target: "stolen_bases", kind: FieldKind::Count, required: true },
    FieldSpec { source: "AVG", target: "batting_avg", kind: FieldKind::Rate, required: true },
    FieldSpec { source: "OBP", target: "obp", kind: FieldKind::Rate, required: true },
    FieldSpec { source: "SLG", target: "slg", kind: FieldKind::Rate, required: true },
    FieldSpec { source: "OPS", target: "ops", kind: FieldKind::Rate, required: true },
];

/// Validate the static field mapping. Run once at startup, before the
/// season loop; a broken table is a programming error, not a season failure.
pub fn validate_field_map() -> Result<()> {
    let mut sources = HashSet::new();
    let mut targets = HashSet::new();

    for spec in BATTING_FIELDS {
        if !sources.insert(spec.source) {
            bail!("duplicate source column in field map: {}", spec.source);
        }
        if !targets.insert(spec.target) {
            bail!("duplicate target field in field map: {}", spec.target);
        }
    }

    if !targets.contains("player_name") {
        bail!("field map must include player_name");
    }

    Ok(())
}

fn as_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn as_rate(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if raw.is_finite() {
        Some((raw * 1000.0).round() / 1000.0)
    } else {
        None
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

macro_rules! required_count {
    ($row:expr, $source:expr) => {
        match $row.get($source).and_then(as_count) {
            Some(v) => v,
            None => return None,
        }
    };
}

macro_rules! required_rate {
    ($row:expr, $source:expr) => {
        match $row.get($source).and_then(as_rate) {
            Some(v) => v,
            None => return None,
        }
    };
}

fn clean_row(
    row: &serde_json::Map<String, Value>,
    season: i32,
) -> Option<BattingLine> {
    let player_name = row.get("Name").and_then(as_text)?;

    Some(BattingLine {
        player_name,
        season,
        team: row.get("Team").and_then(as_text),
        games: required_count!(row, "G"),
        at_bats: required_count!(row, "AB"),
        runs: required_count!(row, "R"),
        hits: required_count!(row, "H"),
        doubles: required_count!(row, "2B"),
        triples: required_count!(row, "3B"),
        home_runs: required_count!(row, "HR"),
        rbi: required_count!(row, "RBI"),
        stolen_bases: required_count!(row, "SB"),
        batting_avg: required_rate!(row, "AVG"),
        obp: required_rate!(row, "OBP"),
        slg: required_rate!(row, "SLG"),
        ops: required_rate!(row, "OPS"),
    })
}

/// Project one season's raw rows onto the clean schema.
///
/// Missing required columns fail the season up front; rows with missing or
/// unparseable required values are dropped individually. A non-empty raw set
/// that produces zero clean rows is treated as a malformed season.
pub fn clean_season(raw: &RawSeason, season: i32) -> Result<Vec<BattingLine>> {
    if let Some(first) = raw.rows.first() {
        for spec in BATTING_FIELDS.iter().filter(|s| s.required) {
            if !first.contains_key(spec.source) {
                return Err(anyhow!(
                    "season {} response missing required column '{}'",
                    season,
                    spec.source
                ));
            }
        }
    }

    let lines: Vec<BattingLine> = raw
        .rows
        .iter()
        .filter_map(|row| clean_row(row, season))
        .collect();

    let dropped = raw.len() - lines.len();
    if dropped > 0 {
        debug!("Dropped {} incomplete rows for season {}", dropped, season);
    }

    if lines.is_empty() && !raw.is_empty() {
        return Err(anyhow!(
            "season {}: all {} rows were missing required fields",
            season,
            raw.len()
        ));
    }

    Ok(lines)
}
