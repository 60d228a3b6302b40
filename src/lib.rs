//! Reshape per-format cricket batting and bowling tables into one wide row
//! per player
//!
//! The crate carries a small column store ([`DataFrame`] of [`Value`] cells
//! with [`NA`] for missing data), group-by reduction, a pivot, key joins and
//! CSV I/O, and builds the [`pipeline`] on top of them.

pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod io;
pub mod na;
pub mod pipeline;
pub mod pivot;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use dataframe::{DataFrame, JoinType, Value};
pub use error::{Error, Result};
pub use groupby::AggFunc;
pub use io::{CsvSource, MemorySource, TableSource};
pub use na::NA;
pub use pipeline::{run, run_and_save, Format, PipelineReport, PlayerRole, Role, SourceId};
pub use pivot::PivotTable;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
