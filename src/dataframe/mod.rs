//! In-memory tables and the row/column operations the pipeline is built on

pub mod base;
pub mod concat;
pub mod join;
pub mod value;

pub use base::DataFrame;
pub use concat::concat;
pub use join::JoinType;
pub use value::Value;
