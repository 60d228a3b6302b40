//! Stage 7: batting + bowling + match counts + biography, one row per player

use std::collections::{HashMap, HashSet};

use super::coerce::span_columns;
use super::types::{PlayerRole, FORMAT_COLUMN, ROLE_COLUMN};
use crate::config::{ClassificationConfig, PipelineConfig};
use crate::dataframe::{DataFrame, JoinType, Value};
use crate::error::{Error, Result};
use crate::na::{sum_present, NA};

/// Suffix for biographical columns whose names are taken by the output
const METADATA_SUFFIX: &str = "_metadata";

/// Everything the merger combines
#[derive(Debug, Clone, Copy)]
pub struct MergeInputs<'a> {
    pub batting_wide: &'a DataFrame,
    pub bowling_wide: &'a DataFrame,
    pub batting_aggregated: &'a DataFrame,
    pub bowling_aggregated: &'a DataFrame,
    /// Filtered long table, source of the per-format match counts
    pub long: &'a DataFrame,
    pub metadata: Option<&'a DataFrame>,
}

/// Build the final wide table
///
/// Column order: player, biographical columns, batting metrics, bowling
/// metrics, `<Format>_Matches` per format, `Role`. Span columns present in
/// both roles are folded into one column in the batting block.
pub fn merge(inputs: MergeInputs<'_>, config: &PipelineConfig) -> Result<DataFrame> {
    let player = config.player_column.as_str();
    let mut merged = inputs.batting_wide.join(
        inputs.bowling_wide,
        player,
        JoinType::Outer,
        (config.suffixes.batting.as_str(), config.suffixes.bowling.as_str()),
    )?;

    for column in span_columns(&config.span) {
        let name = format!("{}_{}", column, config.span.format);
        merged = coalesce_roles(merged, &name, config)?;
    }

    let keys = merged.key_values(player)?;
    for format in &config.formats {
        let matches = first_per_player(
            inputs.long,
            player,
            &config.matches_column,
            format.as_str(),
        )?;
        let column = keys
            .iter()
            .map(|k| {
                k.as_ref()
                    .and_then(|k| matches.get(k))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        merged.add_column(format!("{}_Matches", format), column)?;
    }

    if let Some(metadata) = inputs.metadata {
        let key_column = config
            .metadata
            .as_ref()
            .map(|m| m.key_column.as_str())
            .unwrap_or(player);
        merged = attach_metadata(merged, metadata, key_column, player)?;
    }

    let batting_innings = innings_per_player(inputs.batting_aggregated, config)?;
    let bowling_innings = innings_per_player(inputs.bowling_aggregated, config)?;
    let roles = keys_after(&merged, player)?
        .iter()
        .map(|k| match k {
            Some(k) => {
                let bat = batting_innings.get(k).copied().unwrap_or(0.0);
                let bowl = bowling_innings.get(k).copied().unwrap_or(0.0);
                Value::from(classify(bat, bowl, &config.classification).as_str())
            }
            None => Value::NA,
        })
        .collect();
    merged.set_column(ROLE_COLUMN, roles)?;

    log::info!(
        "merged {} players x {} columns",
        merged.row_count(),
        merged.column_count()
    );
    Ok(merged)
}

/// Fold the `_batting`/`_bowling` copies of a column into one, preferring
/// the batting cell, at the batting copy's position
fn coalesce_roles(merged: DataFrame, name: &str, config: &PipelineConfig) -> Result<DataFrame> {
    let batting = format!("{}{}", name, config.suffixes.batting);
    let bowling = format!("{}{}", name, config.suffixes.bowling);
    let (Some(bat), Some(bowl)) = (merged.column(&batting), merged.column(&bowling)) else {
        return Ok(merged);
    };
    let combined: Vec<Value> = bat
        .iter()
        .zip(bowl)
        .map(|(a, b)| if a.is_na() { b.clone() } else { a.clone() })
        .collect();

    let order: Vec<String> = merged
        .column_names()
        .iter()
        .filter(|c| **c != bowling)
        .map(|c| if *c == batting { name.to_string() } else { c.clone() })
        .collect();
    let mut merged = merged;
    merged.remove_column(&batting);
    merged.remove_column(&bowling);
    merged.add_column(name, combined)?;
    merged.select(&order)
}

fn keys_after(df: &DataFrame, player: &str) -> Result<Vec<Option<String>>> {
    df.key_values(player)
        .map_err(|_| Error::column_not_found("merge", player))
}

/// First non-missing `column` value per player among rows of `format`
fn first_per_player(
    long: &DataFrame,
    player: &str,
    column: &str,
    format: &str,
) -> Result<HashMap<String, Value>> {
    let players = long.require_column("merge", player)?;
    let formats = long.require_column("merge", FORMAT_COLUMN)?;
    let values = long.require_column("merge", column)?;

    let mut first = HashMap::new();
    for ((p, f), v) in players.iter().zip(formats).zip(values) {
        if v.is_na() || f.as_key().as_deref() != Some(format) {
            continue;
        }
        if let Some(p) = p.as_key() {
            first.entry(p).or_insert_with(|| v.clone());
        }
    }
    Ok(first)
}

/// Total innings per player across formats, ignoring missing values
fn innings_per_player(
    aggregated: &DataFrame,
    config: &PipelineConfig,
) -> Result<HashMap<String, f64>> {
    let mut per_player: HashMap<String, Vec<NA<f64>>> = HashMap::new();
    if !aggregated.contains_column(&config.innings_column) {
        return Ok(HashMap::new());
    }
    let players = aggregated.key_values(&config.player_column)?;
    let innings = aggregated.numeric_values(&config.innings_column)?;
    for (player, inns) in players.into_iter().zip(innings) {
        if let Some(player) = player {
            per_player.entry(player).or_default().push(inns);
        }
    }
    Ok(per_player
        .into_iter()
        .map(|(player, values)| {
            let total = Option::<f64>::from(sum_present(values)).unwrap_or(0.0);
            (player, total)
        })
        .collect())
}

/// Classify a player from total batting and bowling innings
///
/// Batter if batting exceeds `ratio` times bowling, Bowler in the reverse
/// case, All-rounder otherwise. `strict` selects `>` over `>=`; with `>=`
/// two zero totals resolve to Batter.
pub fn classify(batting: f64, bowling: f64, config: &ClassificationConfig) -> PlayerRole {
    let dominates = |a: f64, b: f64| {
        if config.strict {
            a > b * config.ratio
        } else {
            a >= b * config.ratio
        }
    };
    if dominates(batting, bowling) {
        PlayerRole::Batter
    } else if dominates(bowling, batting) {
        PlayerRole::Bowler
    } else {
        PlayerRole::AllRounder
    }
}

/// Left-join the biographical table, deduplicated first-seen, and move its
/// columns right after the player column
fn attach_metadata(
    merged: DataFrame,
    metadata: &DataFrame,
    key_column: &str,
    player: &str,
) -> Result<DataFrame> {
    let keys = metadata
        .key_values(key_column)
        .map_err(|_| Error::column_not_found("merge", format!("{} (metadata)", key_column)))?;
    let mut seen = HashSet::new();
    let mut deduped = metadata.filter_rows(|i| match &keys[i] {
        Some(k) => seen.insert(k.clone()),
        None => false,
    });
    if deduped.row_count() < metadata.row_count() {
        log::debug!(
            "metadata: dropped {} duplicate or unnamed rows",
            metadata.row_count() - deduped.row_count()
        );
    }
    if key_column != player {
        if deduped.contains_column(player) {
            deduped.remove_column(player);
        }
        deduped.rename_column(key_column, player)?;
    }
    // The classification column is appended after the join
    if deduped.contains_column(ROLE_COLUMN) {
        let renamed = format!("{}{}", ROLE_COLUMN, METADATA_SUFFIX);
        log::warn!("metadata column '{}' renamed to '{}'", ROLE_COLUMN, renamed);
        deduped.rename_column(ROLE_COLUMN, &renamed)?;
    }

    let joined = merged.join(&deduped, player, JoinType::Left, ("", METADATA_SUFFIX))?;

    let metadata_columns: Vec<String> = joined
        .column_names()
        .iter()
        .skip(merged.column_count())
        .cloned()
        .collect();
    let mut order = vec![player.to_string()];
    order.extend(metadata_columns.iter().cloned());
    order.extend(
        merged
            .column_names()
            .iter()
            .filter(|c| c.as_str() != player)
            .cloned(),
    );
    joined.select(&order)
}
