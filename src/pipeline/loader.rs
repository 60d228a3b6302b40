//! Stage 1: fetch raw tables, canonicalise column names, validate the
//! schema and stamp every row with its format and role

use super::types::{SourceId, FORMAT_COLUMN, ROLE_COLUMN};
use crate::config::PipelineConfig;
use crate::dataframe::{DataFrame, Value};
use crate::error::{Error, Result};
use crate::io::TableSource;

/// A raw table tagged with the source it came from
#[derive(Debug, Clone)]
pub struct TaggedTable {
    pub id: SourceId,
    pub frame: DataFrame,
}

/// Load every configured source, in configuration order
///
/// Fails on the first identifier that does not decode as `<Role>_<Format>`
/// and on the first table missing a required column.
pub fn load(config: &PipelineConfig, source: &dyn TableSource) -> Result<Vec<TaggedTable>> {
    let mut tables = Vec::with_capacity(config.sources.len());
    for spec in &config.sources {
        let id: SourceId = spec.id.parse()?;
        let raw = source.fetch(&spec.id)?;
        let frame = tag(canonicalize(raw, config)?, id, config)?;
        log::info!(
            "loaded {}: {} rows, {} columns",
            id,
            frame.row_count(),
            frame.column_count()
        );
        tables.push(TaggedTable { id, frame });
    }
    Ok(tables)
}

/// Rename source columns to their canonical names
///
/// Two source columns mapping to the same canonical name (say `Inns` and
/// `Innings` in one table) are rejected.
pub fn canonicalize(mut frame: DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    let names: Vec<String> = frame.column_names().to_vec();
    for name in &names {
        let canonical = config.canonical_name(name);
        if canonical == name {
            continue;
        }
        if frame.contains_column(canonical) {
            return Err(Error::Consistency {
                stage: "load",
                message: format!(
                    "columns '{}' and '{}' both map to '{}'",
                    name, canonical, canonical
                ),
            });
        }
        frame.rename_column(name, canonical)?;
    }
    Ok(frame)
}

/// Check required columns and add the `Format` and `Role` tags
pub fn tag(mut frame: DataFrame, id: SourceId, config: &PipelineConfig) -> Result<DataFrame> {
    let missing: Vec<String> = config
        .required_columns(id)
        .into_iter()
        .filter(|c| !frame.contains_column(c))
        .collect();
    if !missing.is_empty() {
        return Err(Error::SchemaMismatch {
            source_id: id.to_string(),
            missing,
        });
    }

    let rows = frame.row_count();
    frame.set_column(FORMAT_COLUMN, vec![Value::from(id.format.as_str()); rows])?;
    frame.set_column(ROLE_COLUMN, vec![Value::from(id.role.as_str()); rows])?;
    Ok(frame)
}
