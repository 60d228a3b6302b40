//! Stage 2: one long table from all tagged tables

use super::loader::TaggedTable;
use crate::dataframe::{concat, DataFrame};
use crate::error::Result;

/// Concatenate tagged tables in input order; absent columns are NA
pub fn unify(tables: &[TaggedTable]) -> Result<DataFrame> {
    let frames: Vec<DataFrame> = tables.iter().map(|t| t.frame.clone()).collect();
    let long = concat(&frames)?;
    log::info!(
        "unified {} tables: {} rows, {} columns",
        tables.len(),
        long.row_count(),
        long.column_count()
    );
    Ok(long)
}
