//! Pipeline configuration
//!
//! Every setting that shapes the output lives in [`PipelineConfig`]: source
//! paths, the canonical column-name table, the numeric-column list, the
//! per-role reduction tables, the "current year" used for career status,
//! the role classification threshold and the required formats. The config
//! can be loaded from TOML or YAML; anything omitted falls back to the
//! defaults below.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::groupby::AggFunc;
use crate::pipeline::types::{Format, Role, SourceId};

/// Default location of the combined output
pub const DEFAULT_OUTPUT: &str = "Data/New_combined_cricket_stats.csv";

/// One raw source table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// `<Role>_<Format>` identifier, e.g. `Batting_ODI`
    pub id: String,
    /// CSV file holding the table
    pub path: PathBuf,
}

/// One row of a reduction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggSpec {
    pub column: String,
    pub func: AggFunc,
}

impl AggSpec {
    pub fn new(column: &str, func: AggFunc) -> Self {
        AggSpec {
            column: column.to_string(),
            func,
        }
    }
}

/// Schema and reduction table for one role
///
/// Every aggregated column is also a required column of that role's source
/// tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSchema {
    pub aggregations: Vec<AggSpec>,
}

impl RoleSchema {
    fn batting() -> Self {
        use AggFunc::*;
        RoleSchema {
            aggregations: vec![
                AggSpec::new("Inns", Sum),
                AggSpec::new("NO", Sum),
                AggSpec::new("Runs", Sum),
                AggSpec::new("HS", Max),
                AggSpec::new("Ave", Mean),
                AggSpec::new("BF", Sum),
                AggSpec::new("SR", Mean),
                AggSpec::new("100", Sum),
                AggSpec::new("50", Sum),
                AggSpec::new("0", Sum),
                AggSpec::new("Mat", First),
            ],
        }
    }

    fn bowling() -> Self {
        use AggFunc::*;
        RoleSchema {
            aggregations: vec![
                AggSpec::new("Inns", Sum),
                AggSpec::new("Balls", Sum),
                AggSpec::new("Runs", Sum),
                AggSpec::new("Wkts", Sum),
                AggSpec::new("BBI", Max),
                AggSpec::new("Ave", Mean),
                AggSpec::new("Econ", Mean),
                AggSpec::new("SR", Mean),
                AggSpec::new("4", Sum),
                AggSpec::new("5", Sum),
                AggSpec::new("Mat", First),
            ],
        }
    }
}

/// Career span derivation
///
/// For rows of `format`, the `column` text `"<start>-<end>"` is split into
/// `Start_Year`/`End_Year`, and `CurrentStatus` is `Currently Playing` when
/// the end year equals `current_year`, `Retired` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanConfig {
    pub enabled: bool,
    pub format: Format,
    pub column: String,
    pub current_year: i32,
}

impl Default for SpanConfig {
    fn default() -> Self {
        SpanConfig {
            enabled: true,
            format: Format::Test,
            column: "Span".to_string(),
            current_year: chrono::Local::now().year(),
        }
    }
}

/// Batter / Bowler / All-rounder threshold
///
/// A player is a Batter when total batting innings exceed `ratio` times the
/// bowling innings, a Bowler in the reverse case, an All-rounder otherwise.
/// With `strict` the comparison is `>`, without it `>=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub ratio: f64,
    pub strict: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        ClassificationConfig {
            ratio: 1.5,
            strict: true,
        }
    }
}

/// Biographical table joined onto the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub path: PathBuf,
    /// Column holding the player name in the metadata table
    #[serde(default = "default_metadata_key")]
    pub key_column: String,
}

fn default_metadata_key() -> String {
    "Name".to_string()
}

/// Suffixes for metric columns present in both the batting and bowling tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSuffixes {
    pub batting: String,
    pub bowling: String,
}

impl Default for JoinSuffixes {
    fn default() -> Self {
        JoinSuffixes {
            batting: "_batting".to_string(),
            bowling: "_bowling".to_string(),
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw tables, loaded in this order
    pub sources: Vec<SourceSpec>,
    pub output: PathBuf,
    /// Player name column (the player key)
    pub player_column: String,
    /// Matches-played column, reported per format
    pub matches_column: String,
    /// Innings column, used for role classification
    pub innings_column: String,
    /// Formats a player must appear in to be kept
    pub formats: Vec<Format>,
    /// Source column name -> canonical column name
    pub column_aliases: BTreeMap<String, String>,
    /// Columns coerced to numbers
    pub numeric_columns: Vec<String>,
    pub batting: RoleSchema,
    pub bowling: RoleSchema,
    pub span: SpanConfig,
    pub classification: ClassificationConfig,
    pub metadata: Option<MetadataConfig>,
    pub suffixes: JoinSuffixes,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let sources = [
            "Bowling_ODI",
            "Batting_ODI",
            "Bowling_T20",
            "Batting_T20",
            "Bowling_Test",
            "Batting_Test",
        ]
        .into_iter()
        .map(|id| SourceSpec {
            id: id.to_string(),
            path: PathBuf::from(format!("Data/{}.csv", id)),
        })
        .collect();

        let column_aliases = [
            ("Innings", "Inns"),
            ("Wickets", "Wkts"),
            ("Name", "Player"),
            ("Matches", "Mat"),
            ("Average", "Ave"),
            ("Economy", "Econ"),
            ("Not Outs", "NO"),
            ("Balls Faced", "BF"),
            ("Highest", "HS"),
            ("Best", "BBI"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let numeric_columns = [
            "Inns", "NO", "Runs", "Ave", "BF", "SR", "100", "50", "0", "Balls", "Wkts", "Econ",
            "4", "5", "Mat",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        PipelineConfig {
            sources,
            output: PathBuf::from(DEFAULT_OUTPUT),
            player_column: "Player".to_string(),
            matches_column: "Mat".to_string(),
            innings_column: "Inns".to_string(),
            formats: Format::ALL.to_vec(),
            column_aliases,
            numeric_columns,
            batting: RoleSchema::batting(),
            bowling: RoleSchema::bowling(),
            span: SpanConfig::default(),
            classification: ClassificationConfig::default(),
            metadata: None,
            suffixes: JoinSuffixes::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config file, choosing TOML or YAML by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => {
                return Err(Error::Config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reduction table of a role
    pub fn role_schema(&self, role: Role) -> &RoleSchema {
        match role {
            Role::Batting => &self.batting,
            Role::Bowling => &self.bowling,
        }
    }

    /// Canonical name of a source column
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.column_aliases
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Columns a source table must provide, after canonicalisation
    pub fn required_columns(&self, id: SourceId) -> Vec<String> {
        let mut required = vec![self.player_column.clone()];
        for spec in &self.role_schema(id.role).aggregations {
            if !required.contains(&spec.column) {
                required.push(spec.column.clone());
            }
        }
        if self.span.enabled && self.span.format == id.format && !required.contains(&self.span.column) {
            required.push(self.span.column.clone());
        }
        required
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.formats.is_empty() {
            return Err(Error::Config("at least one format is required".into()));
        }
        let mut formats = HashSet::new();
        for format in &self.formats {
            if !formats.insert(format) {
                return Err(Error::Config(format!("format {} listed twice", format)));
            }
        }
        if self.player_column.is_empty() {
            return Err(Error::Config("player_column must not be empty".into()));
        }
        if !(self.classification.ratio.is_finite() && self.classification.ratio > 0.0) {
            return Err(Error::Config(format!(
                "classification ratio must be a positive number, got {}",
                self.classification.ratio
            )));
        }
        if self.span.enabled && !formats.contains(&self.span.format) {
            return Err(Error::Config(format!(
                "span format {} is not one of the configured formats",
                self.span.format
            )));
        }

        if self.sources.is_empty() {
            return Err(Error::Config("at least one source is required".into()));
        }
        let mut ids = HashSet::new();
        for source in &self.sources {
            let id: SourceId = source.id.parse()?;
            if !ids.insert(id) {
                return Err(Error::Config(format!("source {} listed twice", id)));
            }
            if !formats.contains(&id.format) {
                return Err(Error::Config(format!(
                    "source {} has format {} which is not configured",
                    id, id.format
                )));
            }
        }

        for role in [Role::Batting, Role::Bowling] {
            for spec in &self.role_schema(role).aggregations {
                if spec.column == self.player_column {
                    return Err(Error::Config(format!(
                        "{} aggregations must not reduce the player column",
                        role
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sources.len(), 6);
        assert_eq!(config.sources[0].id, "Bowling_ODI");
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.canonical_name("Innings"), "Inns");
        assert_eq!(config.canonical_name("Runs"), "Runs");
    }

    #[test]
    fn span_column_required_only_for_span_format() {
        let config = PipelineConfig::default();
        let test = config.required_columns(SourceId::new(Role::Batting, Format::Test));
        let odi = config.required_columns(SourceId::new(Role::Batting, Format::Odi));
        assert!(test.contains(&"Span".to_string()));
        assert!(!odi.contains(&"Span".to_string()));
        assert_eq!(odi[0], "Player");
    }
}
