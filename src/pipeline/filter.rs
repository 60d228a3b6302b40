//! Stage 4: keep only players present in every configured format

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Format, FORMAT_COLUMN};
use crate::config::PipelineConfig;
use crate::dataframe::DataFrame;
use crate::error::Result;

/// Distinct players with at least one row, per format
///
/// Name matching is exact and case-sensitive; rows without a player name
/// belong to no set.
pub fn players_by_format(
    df: &DataFrame,
    player_column: &str,
    formats: &[Format],
) -> Result<BTreeMap<Format, BTreeSet<String>>> {
    let players = df.require_column("filter", player_column)?;
    let row_formats = df.require_column("filter", FORMAT_COLUMN)?;

    let mut sets: BTreeMap<Format, BTreeSet<String>> =
        formats.iter().map(|&f| (f, BTreeSet::new())).collect();
    for (player, format) in players.iter().zip(row_formats) {
        let (Some(player), Some(format)) = (player.as_key(), format.as_key()) else {
            continue;
        };
        if let Some(set) = formats
            .iter()
            .find(|f| f.as_str() == format)
            .and_then(|f| sets.get_mut(f))
        {
            set.insert(player);
        }
    }
    Ok(sets)
}

/// Intersection of all per-format sets; empty if any set is empty
pub fn common_players(sets: &BTreeMap<Format, BTreeSet<String>>) -> BTreeSet<String> {
    let mut iter = sets.values();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    iter.fold(first.clone(), |acc, set| acc.intersection(set).cloned().collect())
}

/// Restrict the long table to players present in every format
///
/// A player missing from even one format loses all of their rows. An empty
/// intersection is a valid result, not an error.
pub fn filter_players(
    df: &DataFrame,
    config: &PipelineConfig,
) -> Result<(DataFrame, BTreeSet<String>)> {
    let sets = players_by_format(df, &config.player_column, &config.formats)?;
    for (format, set) in &sets {
        log::debug!("{}: {} distinct players", format, set.len());
    }
    let common = common_players(&sets);
    if common.is_empty() {
        log::warn!("no player appears in every format; output will be empty");
    }

    let players = df.require_column("filter", &config.player_column)?;
    let filtered = df.filter_rows(|i| {
        players[i]
            .as_key()
            .map_or(false, |p| common.contains(&p))
    });
    log::info!(
        "kept {} players common to {} formats: {} of {} rows",
        common.len(),
        config.formats.len(),
        filtered.row_count(),
        df.row_count()
    );
    Ok((filtered, common))
}
