//! Stage 3: numeric coercion and career-span derivation

use lazy_static::lazy_static;
use regex::Regex;

use super::types::FORMAT_COLUMN;
use crate::config::{PipelineConfig, SpanConfig};
use crate::dataframe::{DataFrame, Value};
use crate::error::Result;

pub const START_YEAR_COLUMN: &str = "Start_Year";
pub const END_YEAR_COLUMN: &str = "End_Year";
pub const STATUS_COLUMN: &str = "CurrentStatus";
pub const STATUS_PLAYING: &str = "Currently Playing";
pub const STATUS_RETIRED: &str = "Retired";

lazy_static! {
    static ref SPAN_RE: Regex = Regex::new(r"^(\d{4})\s*-\s*(\d{4})$").unwrap();
}

/// Coerce the configured numeric columns and derive the span columns
///
/// Unparseable cells become NA; this stage never fails on cell content.
pub fn coerce(long: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let mut typed = long.clone();
    for column in &config.numeric_columns {
        if !typed.contains_column(column) {
            log::debug!("numeric column '{}' absent from every source", column);
            continue;
        }
        let mut lost = 0usize;
        typed.map_column(column, |cell| {
            let number = cell.to_numeric();
            if number.is_na() && !cell.is_na() {
                lost += 1;
            }
            number
        })?;
        if lost > 0 {
            log::debug!("'{}': {} cells were not numeric and became NA", column, lost);
        }
    }

    if config.span.enabled {
        derive_span(&mut typed, &config.span)?;
    }

    log::info!(
        "coerced {} numeric columns over {} rows",
        config.numeric_columns.len(),
        typed.row_count()
    );
    Ok(typed)
}

/// The span column and the columns derived from it; empty when disabled
pub fn span_columns(span: &SpanConfig) -> Vec<String> {
    if !span.enabled {
        return Vec::new();
    }
    vec![
        span.column.clone(),
        START_YEAR_COLUMN.to_string(),
        END_YEAR_COLUMN.to_string(),
        STATUS_COLUMN.to_string(),
    ]
}

/// Parse `"<start>-<end>"` into a pair of years
pub fn parse_span(text: &str) -> Option<(i64, i64)> {
    let caps = SPAN_RE.captures(text.trim())?;
    let start = caps.get(1)?.as_str().parse().ok()?;
    let end = caps.get(2)?.as_str().parse().ok()?;
    Some((start, end))
}

/// Add `Start_Year`, `End_Year` and `CurrentStatus` for rows of the span format
///
/// Rows of other formats, and rows whose span does not parse, get NA.
pub fn derive_span(df: &mut DataFrame, span: &SpanConfig) -> Result<()> {
    let Some(spans) = df.column(&span.column) else {
        log::debug!("no '{}' column, skipping span derivation", span.column);
        return Ok(());
    };
    let formats = df.require_column("coerce", FORMAT_COLUMN)?;

    let rows = df.row_count();
    let mut start_years = Vec::with_capacity(rows);
    let mut end_years = Vec::with_capacity(rows);
    let mut statuses = Vec::with_capacity(rows);
    for (cell, format) in spans.iter().zip(formats) {
        let parsed = match (cell, format) {
            (Value::Text(text), Value::Text(f)) if f.as_str() == span.format.as_str() => {
                parse_span(text)
            }
            _ => None,
        };
        match parsed {
            Some((start, end)) => {
                start_years.push(Value::Int(start));
                end_years.push(Value::Int(end));
                let status = if end == i64::from(span.current_year) {
                    STATUS_PLAYING
                } else {
                    STATUS_RETIRED
                };
                statuses.push(Value::from(status));
            }
            None => {
                start_years.push(Value::NA);
                end_years.push(Value::NA);
                statuses.push(Value::NA);
            }
        }
    }

    df.set_column(START_YEAR_COLUMN, start_years)?;
    df.set_column(END_YEAR_COLUMN, end_years)?;
    df.set_column(STATUS_COLUMN, statuses)?;
    Ok(())
}
