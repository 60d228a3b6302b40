//! Stage 6: one row per player, one column per (metric, format)

use super::aggregate::metric_columns;
use super::coerce::span_columns;
use super::types::FORMAT_COLUMN;
use crate::config::PipelineConfig;
use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::pivot::PivotTable;

/// Pivot an aggregated role table so each format's metrics become
/// `<metric>_<Format>` columns
///
/// Format columns follow the configured format order. A (player, format)
/// pair without an aggregated row leaves NA. Span columns are only kept for
/// the span format, the only format they are derived for.
pub fn widen(aggregated: &DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let order = config.formats.iter().map(|f| f.to_string()).collect();
    let mut wide = PivotTable::new(
        aggregated,
        config.player_column.as_str(),
        FORMAT_COLUMN,
        metric_columns(aggregated, config),
    )?
    .with_column_order(order)
    .execute()?;
    drop_off_format_span_columns(&mut wide, config);
    log::debug!(
        "widened to {} players x {} columns",
        wide.row_count(),
        wide.column_count()
    );
    Ok(wide)
}

fn drop_off_format_span_columns(wide: &mut DataFrame, config: &PipelineConfig) {
    for column in span_columns(&config.span) {
        for format in config.formats.iter().filter(|f| **f != config.span.format) {
            wide.remove_column(&format!("{}_{}", column, format));
        }
    }
}
