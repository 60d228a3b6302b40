//! Cricket domain types shared by the pipeline stages

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the column the loader stamps with the match format
pub const FORMAT_COLUMN: &str = "Format";

/// Name of the column the loader stamps with the statistical role
pub const ROLE_COLUMN: &str = "Role";

/// Match format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "ODI")]
    Odi,
    #[serde(rename = "T20")]
    T20,
    #[serde(rename = "Test")]
    Test,
}

impl Format {
    /// All formats, in canonical order
    pub const ALL: [Format; 3] = [Format::Odi, Format::T20, Format::Test];

    /// Label used in source identifiers and column names
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Odi => "ODI",
            Format::T20 => "T20",
            Format::Test => "Test",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    /// Exact, case-sensitive match on the label
    fn from_str(s: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown format '{}'", s)))
    }
}

/// Statistical record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Batting,
    Bowling,
}

impl Role {
    /// Label used in source identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batting => "Batting",
            Role::Bowling => "Bowling",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Batting" => Ok(Role::Batting),
            "Bowling" => Ok(Role::Bowling),
            other => Err(Error::Config(format!("unknown role '{}'", other))),
        }
    }
}

/// Identifier of one raw source table, encoded as `<Role>_<Format>`
/// (for example `Batting_ODI`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub role: Role,
    pub format: Format,
}

impl SourceId {
    pub fn new(role: Role, format: Format) -> Self {
        SourceId { role, format }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.role, self.format)
    }
}

impl FromStr for SourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSourceId(s.to_string());
        let (role, format) = s.split_once('_').ok_or_else(invalid)?;
        Ok(SourceId {
            role: role.parse().map_err(|_| invalid())?,
            format: format.parse().map_err(|_| invalid())?,
        })
    }
}

/// Derived playing role of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerRole {
    Batter,
    Bowler,
    AllRounder,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batter => "Batter",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-rounder",
        }
    }
}

impl Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_round_trip_through_text() {
        let id: SourceId = "Bowling_T20".parse().unwrap();
        assert_eq!(id, SourceId::new(Role::Bowling, Format::T20));
        assert_eq!(id.to_string(), "Bowling_T20");
    }

    #[test]
    fn malformed_source_ids_are_rejected() {
        for raw in ["Batting", "batting_ODI", "Batting_odi", "Batting-ODI", "Fielding_Test"] {
            let err = raw.parse::<SourceId>().unwrap_err();
            assert!(matches!(err, Error::InvalidSourceId(_)), "{raw}");
        }
    }
}
