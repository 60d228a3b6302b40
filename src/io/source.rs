//! Where raw tables come from
//!
//! The pipeline never touches the network or the file system directly; it
//! asks a [`TableSource`] for each table by identifier. Scrapers, CSV
//! directories and test fixtures all sit behind this seam.

use std::collections::HashMap;
use std::path::PathBuf;

use super::csv::read_csv;
use crate::config::PipelineConfig;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

/// Identifier under which the biographical table is fetched
pub const METADATA_SOURCE_ID: &str = "Metadata";

/// Producer of raw tables
pub trait TableSource {
    /// Fetch the raw table registered under `id`
    fn fetch(&self, id: &str) -> Result<DataFrame>;
}

/// Reads tables from CSV files
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    paths: HashMap<String, PathBuf>,
}

impl CsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every source path of a config, plus the metadata table if any
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut source = CsvSource::new();
        for spec in &config.sources {
            source.insert(spec.id.clone(), spec.path.clone());
        }
        if let Some(metadata) = &config.metadata {
            source.insert(METADATA_SOURCE_ID, metadata.path.clone());
        }
        source
    }

    pub fn insert(&mut self, id: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(id.into(), path.into());
    }
}

impl TableSource for CsvSource {
    fn fetch(&self, id: &str) -> Result<DataFrame> {
        let path = self
            .paths
            .get(id)
            .ok_or_else(|| Error::Config(format!("no path registered for source '{}'", id)))?;
        log::debug!("reading {} from {}", id, path.display());
        read_csv(path).map_err(|e| Error::Source {
            id: id.to_string(),
            path: path.clone(),
            source: Box::new(e),
        })
    }
}

/// Serves tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, DataFrame>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, table: DataFrame) {
        self.tables.insert(id.into(), table);
    }

    /// Builder-style [`MemorySource::insert`]
    pub fn with(mut self, id: impl Into<String>, table: DataFrame) -> Self {
        self.insert(id, table);
        self
    }
}

impl TableSource for MemorySource {
    fn fetch(&self, id: &str) -> Result<DataFrame> {
        self.tables
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Config(format!("no table registered for source '{}'", id)))
    }
}
