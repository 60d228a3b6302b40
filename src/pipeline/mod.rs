//! The seven-stage reshape from per-format raw tables to one wide row per
//! player
//!
//! ```text
//! load -> unify -> coerce -> filter -> aggregate (x2) -> widen (x2) -> merge
//! ```
//!
//! Every stage is a plain function over [`DataFrame`]s so each can be
//! exercised on its own; [`run`] chains them and [`run_and_save`] adds the
//! CSV input and output.

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod types;
pub mod unify;
pub mod widen;

use std::collections::BTreeSet;

pub use aggregate::aggregate;
pub use coerce::coerce;
pub use filter::filter_players;
pub use loader::{load, TaggedTable};
pub use merge::{classify, merge, MergeInputs};
pub use types::{Format, PlayerRole, Role, SourceId, FORMAT_COLUMN, ROLE_COLUMN};
pub use unify::unify;
pub use widen::widen;

use crate::config::PipelineConfig;
use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::io::{write_csv, CsvSource, TableSource, METADATA_SOURCE_ID};

/// Shape of a stage's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: &'static str,
    pub rows: usize,
    pub columns: usize,
}

impl StageSummary {
    fn of(stage: &'static str, df: &DataFrame) -> Self {
        StageSummary {
            stage,
            rows: df.row_count(),
            columns: df.column_count(),
        }
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The combined wide table
    pub output: DataFrame,
    /// Output shape of each stage, in execution order
    pub stages: Vec<StageSummary>,
    /// Players present in every required format
    pub players: BTreeSet<String>,
}

/// Run the whole pipeline against a table source
pub fn run(config: &PipelineConfig, source: &dyn TableSource) -> Result<PipelineReport> {
    config.validate()?;
    let mut stages = Vec::new();

    let tables = load(config, source)?;
    let long = unify(&tables)?;
    stages.push(StageSummary::of("unify", &long));

    let typed = coerce(&long, config)?;
    stages.push(StageSummary::of("coerce", &typed));

    let (filtered, players) = filter_players(&typed, config)?;
    stages.push(StageSummary::of("filter", &filtered));

    let batting_aggregated = aggregate(&filtered, Role::Batting, config)?;
    let bowling_aggregated = aggregate(&filtered, Role::Bowling, config)?;
    stages.push(StageSummary::of("aggregate batting", &batting_aggregated));
    stages.push(StageSummary::of("aggregate bowling", &bowling_aggregated));

    let batting_wide = widen(&batting_aggregated, config)?;
    let bowling_wide = widen(&bowling_aggregated, config)?;
    stages.push(StageSummary::of("widen batting", &batting_wide));
    stages.push(StageSummary::of("widen bowling", &bowling_wide));

    let metadata = match &config.metadata {
        Some(_) => Some(source.fetch(METADATA_SOURCE_ID)?),
        None => None,
    };

    let output = merge(
        MergeInputs {
            batting_wide: &batting_wide,
            bowling_wide: &bowling_wide,
            batting_aggregated: &batting_aggregated,
            bowling_aggregated: &bowling_aggregated,
            long: &filtered,
            metadata: metadata.as_ref(),
        },
        config,
    )?;
    stages.push(StageSummary::of("merge", &output));

    Ok(PipelineReport {
        output,
        stages,
        players,
    })
}

/// Run the pipeline over the configured CSV files and write the result to
/// `config.output`
///
/// Nothing is written when any stage fails.
pub fn run_and_save(config: &PipelineConfig) -> Result<PipelineReport> {
    let source = CsvSource::from_config(config);
    let report = run(config, &source)?;
    write_csv(&report.output, &config.output)?;
    log::info!(
        "wrote {} players x {} columns to {}",
        report.output.row_count(),
        report.output.column_count(),
        config.output.display()
    );
    Ok(report)
}
