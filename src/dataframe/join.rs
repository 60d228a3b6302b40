//! Key joins between DataFrames

use std::collections::{HashMap, HashSet};

use super::{DataFrame, Value};
use crate::error::{Error, Result};

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Only keys present on both sides
    Inner,
    /// All rows from the left, matching rows from the right (NA otherwise)
    Left,
    /// All rows from both sides (NA for non-matches)
    Outer,
}

impl DataFrame {
    /// Join two DataFrames on a common key column
    ///
    /// # Arguments
    /// * `other` - Right DataFrame
    /// * `on` - Key column, must exist on both sides
    /// * `how` - Join type
    /// * `suffixes` - Appended to non-key column names present on both sides
    ///
    /// Output columns are the left columns followed by the right columns
    /// minus the key. Output rows follow left order, then unmatched right rows
    /// in right order (outer joins). NA keys never match.
    pub fn join(
        &self,
        other: &DataFrame,
        on: &str,
        how: JoinType,
        suffixes: (&str, &str),
    ) -> Result<DataFrame> {
        let left_keys = self
            .key_values(on)
            .map_err(|_| Error::column_not_found("join", format!("{} (left)", on)))?;
        let right_keys = other
            .key_values(on)
            .map_err(|_| Error::column_not_found("join", format!("{} (right)", on)))?;

        // Build index map for the right side
        let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, key) in right_keys.iter().enumerate() {
            if let Some(key) = key {
                right_index.entry(key.as_str()).or_default().push(i);
            }
        }

        let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
        let mut right_matched = vec![false; right_keys.len()];
        for (left_idx, key) in left_keys.iter().enumerate() {
            match key.as_deref().and_then(|k| right_index.get(k)) {
                Some(matches) => {
                    for &right_idx in matches {
                        pairs.push((Some(left_idx), Some(right_idx)));
                        right_matched[right_idx] = true;
                    }
                }
                None if how != JoinType::Inner => pairs.push((Some(left_idx), None)),
                None => {}
            }
        }
        if how == JoinType::Outer {
            for (right_idx, matched) in right_matched.iter().enumerate() {
                if !matched {
                    pairs.push((None, Some(right_idx)));
                }
            }
        }

        let right_names: HashSet<&str> = other.column_names().iter().map(String::as_str).collect();
        let left_names: HashSet<&str> = self.column_names().iter().map(String::as_str).collect();
        let mut result = DataFrame::new();

        for name in self.column_names() {
            let cells = self.require_column("join", name)?;
            let values: Vec<Value> = if name == on {
                let right_cells = other.require_column("join", on)?;
                pairs
                    .iter()
                    .map(|&(l, r)| match (l, r) {
                        (Some(l), _) => cells[l].clone(),
                        (None, Some(r)) => right_cells[r].clone(),
                        (None, None) => Value::NA,
                    })
                    .collect()
            } else {
                pairs
                    .iter()
                    .map(|&(l, _)| l.map(|l| cells[l].clone()).unwrap_or_default())
                    .collect()
            };
            let out_name = if name != on && right_names.contains(name.as_str()) {
                format!("{}{}", name, suffixes.0)
            } else {
                name.clone()
            };
            result.add_column(out_name, values)?;
        }

        for name in other.column_names() {
            if name == on {
                continue;
            }
            let cells = other.require_column("join", name)?;
            let values: Vec<Value> = pairs
                .iter()
                .map(|&(_, r)| r.map(|r| cells[r].clone()).unwrap_or_default())
                .collect();
            let out_name = if left_names.contains(name.as_str()) {
                format!("{}{}", name, suffixes.1)
            } else {
                name.clone()
            };
            result.add_column(out_name, values)?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> DataFrame {
        DataFrame::from_columns(vec![
            ("Player", vec![Value::from("A"), Value::from("B")]),
            ("Runs", vec![Value::Int(100), Value::Int(200)]),
        ])
        .unwrap()
    }

    fn right() -> DataFrame {
        DataFrame::from_columns(vec![
            ("Player", vec![Value::from("B"), Value::from("C")]),
            ("Runs", vec![Value::Int(50), Value::Int(60)]),
            ("Wkts", vec![Value::Int(5), Value::Int(6)]),
        ])
        .unwrap()
    }

    #[test]
    fn outer_join_keeps_both_sides_and_suffixes_overlap() {
        let joined = left()
            .join(&right(), "Player", JoinType::Outer, ("_batting", "_bowling"))
            .unwrap();
        assert_eq!(
            joined.column_names(),
            &["Player", "Runs_batting", "Runs_bowling", "Wkts"]
        );
        assert_eq!(joined.row_count(), 3);
        assert_eq!(joined.value(0, "Runs_bowling"), Some(&Value::NA));
        assert_eq!(joined.value(1, "Wkts"), Some(&Value::Int(5)));
        assert_eq!(joined.value(2, "Player"), Some(&Value::from("C")));
        assert_eq!(joined.value(2, "Runs_batting"), Some(&Value::NA));
    }

    #[test]
    fn left_join_drops_unmatched_right() {
        let joined = left()
            .join(&right(), "Player", JoinType::Left, ("_l", "_r"))
            .unwrap();
        assert_eq!(joined.row_count(), 2);
    }

    #[test]
    fn inner_join_keeps_matches_only() {
        let joined = left()
            .join(&right(), "Player", JoinType::Inner, ("_l", "_r"))
            .unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(joined.value(0, "Player"), Some(&Value::from("B")));
    }

    #[test]
    fn missing_key_column_is_reported() {
        let err = left()
            .join(&right(), "Name", JoinType::Left, ("_l", "_r"))
            .unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { stage: "join", .. }));
    }
}
