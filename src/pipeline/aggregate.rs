//! Stage 5: collapse duplicate rows per (player, format) within a role
//!
//! Rate metrics (averages, strike rates, economy) are reduced with an
//! unweighted mean of the per-row values, not recomputed from the summed
//! counts. This is a known precision limitation.

use std::collections::HashSet;

use super::coerce::span_columns;
use super::types::{Role, FORMAT_COLUMN, ROLE_COLUMN};
use crate::config::PipelineConfig;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::groupby::AggFunc;

/// Reduce the rows of one role to one row per (player, format)
///
/// The result has the player column, `Format`, then one column per
/// reduction, in reduction-table order, followed by the span columns when
/// present.
pub fn aggregate(df: &DataFrame, role: Role, config: &PipelineConfig) -> Result<DataFrame> {
    let roles = df.require_column("aggregate", ROLE_COLUMN)?;
    let role_rows = df.filter_rows(|i| roles[i].as_key().as_deref() == Some(role.as_str()));

    let specs = reduction_specs(&role_rows, role, config);
    let aggregated = role_rows
        .groupby(&[config.player_column.as_str(), FORMAT_COLUMN])?
        .agg(&specs)?;
    ensure_unique(&aggregated, &config.player_column)?;

    log::info!(
        "aggregated {} {} rows into {}",
        role_rows.row_count(),
        role,
        aggregated.row_count()
    );
    Ok(aggregated)
}

/// The role's reduction table plus `first` for the derived span columns
///
/// Columns no source of this role provided are left out; the loader has
/// already rejected any source missing a required column.
fn reduction_specs(df: &DataFrame, role: Role, config: &PipelineConfig) -> Vec<(String, AggFunc)> {
    let mut specs: Vec<(String, AggFunc)> = config
        .role_schema(role)
        .aggregations
        .iter()
        .filter(|spec| df.contains_column(&spec.column))
        .map(|spec| (spec.column.clone(), spec.func))
        .collect();

    for column in span_columns(&config.span) {
        if df.contains_column(&column) && !specs.iter().any(|(c, _)| *c == column) {
            specs.push((column, AggFunc::First));
        }
    }
    specs
}

/// Fail if any (player, format) pair occurs more than once
pub fn ensure_unique(aggregated: &DataFrame, player_column: &str) -> Result<()> {
    let players = aggregated.key_values(player_column)?;
    let formats = aggregated.key_values(FORMAT_COLUMN)?;
    let mut seen = HashSet::new();
    for pair in players.into_iter().zip(formats) {
        if !seen.insert(pair.clone()) {
            return Err(Error::DuplicateKey {
                stage: "aggregate",
                key: format!("{:?}", pair),
            });
        }
    }
    Ok(())
}

/// Metric columns of an aggregated table that the pivot spreads per format
pub fn metric_columns(aggregated: &DataFrame, config: &PipelineConfig) -> Vec<String> {
    aggregated
        .column_names()
        .iter()
        .filter(|c| {
            **c != config.player_column && *c != FORMAT_COLUMN && **c != config.matches_column
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::Value;

    #[test]
    fn repeated_player_format_pair_fails_loudly() {
        let aggregated = DataFrame::from_columns(vec![
            (
                "Player",
                vec![Value::from("A"), Value::from("B"), Value::from("A")],
            ),
            (
                FORMAT_COLUMN,
                vec![Value::from("ODI"), Value::from("ODI"), Value::from("ODI")],
            ),
            ("Runs", vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        ])
        .unwrap();

        let err = ensure_unique(&aggregated, "Player").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { stage: "aggregate", .. }));

        let unique = aggregated.filter_rows(|i| i < 2);
        assert!(ensure_unique(&unique, "Player").is_ok());
    }

    #[test]
    fn duplicate_rows_collapse_per_role_and_format() {
        let long = DataFrame::from_columns(vec![
            (
                "Player",
                vec![Value::from("A"), Value::from("A"), Value::from("A")],
            ),
            (
                FORMAT_COLUMN,
                vec![Value::from("ODI"), Value::from("ODI"), Value::from("ODI")],
            ),
            (
                ROLE_COLUMN,
                vec![
                    Value::from("Batting"),
                    Value::from("Batting"),
                    Value::from("Bowling"),
                ],
            ),
            ("Runs", vec![Value::Int(10), Value::Int(15), Value::Int(99)]),
            (
                "HS",
                vec![Value::from("99"), Value::from("150"), Value::NA],
            ),
        ])
        .unwrap();

        let aggregated = aggregate(&long, Role::Batting, &PipelineConfig::default()).unwrap();
        assert_eq!(aggregated.row_count(), 1);
        assert_eq!(aggregated.value(0, "Runs"), Some(&Value::Int(25)));
        assert_eq!(aggregated.value(0, "HS"), Some(&Value::from("150")));
    }
}
