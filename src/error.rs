use std::path::PathBuf;

use thiserror::Error;

/// Error type for every fallible operation in the crate
///
/// Numeric coercion failures are deliberately absent: unparseable cells
/// become [`crate::NA::NA`] and never surface as errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("[load] cannot read source '{id}' from {}: {source}", path.display())]
    Source {
        id: String,
        path: PathBuf,
        source: Box<Error>,
    },

    #[error("source identifier '{0}' does not decode as <Role>_<Format>")]
    InvalidSourceId(String),

    #[error("[load] source '{source_id}' is missing required columns: {}", missing.join(", "))]
    SchemaMismatch {
        source_id: String,
        missing: Vec<String>,
    },

    #[error("[{stage}] column '{column}' not found")]
    ColumnNotFound { stage: &'static str, column: String },

    #[error("[{stage}] duplicate key {key}")]
    DuplicateKey { stage: &'static str, key: String },

    #[error("[{stage}] {message}")]
    Consistency {
        stage: &'static str,
        message: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::ColumnNotFound`]
    pub fn column_not_found(stage: &'static str, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            stage,
            column: column.into(),
        }
    }
}
