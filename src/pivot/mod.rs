//! Long-to-wide reshaping

use std::collections::{BTreeMap, HashMap};

use crate::dataframe::{DataFrame, Value};
use crate::error::{Error, Result};

/// Reshape a long DataFrame so the values of one column become part of the
/// output column names
///
/// For every `value` column and every distinct entry `c` of the `columns`
/// column, the result has a column `<value>_<c>`. Rows are unique per
/// `index` entry and sorted ascending by it.
#[derive(Debug)]
pub struct PivotTable<'a> {
    /// Source DataFrame
    df: &'a DataFrame,

    /// Column whose entries become output rows
    index: String,

    /// Column whose entries become output column suffixes
    columns: String,

    /// Columns carried into the wide table
    values: Vec<String>,

    /// Preferred order for `columns` entries; unknown entries follow in first-seen order
    column_order: Vec<String>,
}

impl<'a> PivotTable<'a> {
    /// Create a new pivot, checking that every named column exists
    pub fn new(
        df: &'a DataFrame,
        index: impl Into<String>,
        columns: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self> {
        let index = index.into();
        let columns = columns.into();
        for name in std::iter::once(&index)
            .chain(std::iter::once(&columns))
            .chain(values.iter())
        {
            if !df.contains_column(name) {
                return Err(Error::column_not_found("pivot", name.as_str()));
            }
        }
        Ok(PivotTable {
            df,
            index,
            columns,
            values,
            column_order: Vec::new(),
        })
    }

    /// Set the preferred order of the `columns` entries
    pub fn with_column_order(mut self, order: Vec<String>) -> Self {
        self.column_order = order;
        self
    }

    /// Execute the pivot
    ///
    /// A repeated `(index, columns)` pair is a [`Error::DuplicateKey`]; a
    /// pair that never occurs leaves NA in the corresponding cells.
    pub fn execute(&self) -> Result<DataFrame> {
        let index_keys = self.df.key_values(&self.index)?;
        let column_keys = self.df.key_values(&self.columns)?;

        // Column entries: preferred order first, then anything else as seen
        let mut suffixes: Vec<String> = self
            .column_order
            .iter()
            .filter(|c| column_keys.iter().any(|k| k.as_deref() == Some(c.as_str())))
            .cloned()
            .collect();
        for key in column_keys.iter().flatten() {
            if !suffixes.contains(key) {
                suffixes.push(key.clone());
            }
        }

        // (index, column) -> source row
        let mut cell_rows: BTreeMap<&str, HashMap<&str, usize>> = BTreeMap::new();
        let mut index_cells: HashMap<&str, &Value> = HashMap::new();
        let index_source = self.df.require_column("pivot", &self.index)?;
        for (row, (ik, ck)) in index_keys.iter().zip(column_keys.iter()).enumerate() {
            let (Some(ik), Some(ck)) = (ik, ck) else {
                continue;
            };
            index_cells.entry(ik.as_str()).or_insert(&index_source[row]);
            let slot = cell_rows.entry(ik.as_str()).or_default();
            if slot.insert(ck.as_str(), row).is_some() {
                return Err(Error::DuplicateKey {
                    stage: "pivot",
                    key: format!("({}, {})", ik, ck),
                });
            }
        }

        let mut result = DataFrame::new();
        result.add_column(
            self.index.clone(),
            cell_rows
                .keys()
                .map(|k| index_cells.get(k).map(|v| (*v).clone()).unwrap_or_default())
                .collect(),
        )?;

        for value in &self.values {
            let source = self.df.require_column("pivot", value)?;
            for suffix in &suffixes {
                let cells = cell_rows
                    .values()
                    .map(|by_column| {
                        by_column
                            .get(suffix.as_str())
                            .map(|&row| source[row].clone())
                            .unwrap_or_default()
                    })
                    .collect();
                result.add_column(format!("{}_{}", value, suffix), cells)?;
            }
        }

        Ok(result)
    }
}

impl DataFrame {
    /// Pivot without aggregation, see [`PivotTable`]
    pub fn pivot(&self, index: &str, columns: &str, values: &[String]) -> Result<DataFrame> {
        PivotTable::new(self, index, columns, values.to_vec())?.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long() -> DataFrame {
        DataFrame::from_columns(vec![
            (
                "Player",
                vec![Value::from("B"), Value::from("A"), Value::from("A")],
            ),
            (
                "Format",
                vec![Value::from("ODI"), Value::from("Test"), Value::from("ODI")],
            ),
            ("Runs", vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        ])
        .unwrap()
    }

    #[test]
    fn pivot_spreads_formats_into_columns() {
        let wide = PivotTable::new(&long(), "Player", "Format", vec!["Runs".to_string()])
            .unwrap()
            .with_column_order(vec!["ODI".into(), "T20".into(), "Test".into()])
            .execute()
            .unwrap();

        assert_eq!(wide.column_names(), &["Player", "Runs_ODI", "Runs_Test"]);
        assert_eq!(wide.row_count(), 2);
        assert_eq!(wide.value(0, "Player"), Some(&Value::from("A")));
        assert_eq!(wide.value(0, "Runs_ODI"), Some(&Value::Int(3)));
        assert_eq!(wide.value(1, "Runs_Test"), Some(&Value::NA));
    }

    #[test]
    fn duplicate_pairs_fail_loudly() {
        let mut df = long();
        df.set_column(
            "Format",
            vec![Value::from("ODI"), Value::from("ODI"), Value::from("ODI")],
        )
        .unwrap();
        let err = df.pivot("Player", "Format", &["Runs".to_string()]).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { stage: "pivot", .. }));
    }

    #[test]
    fn empty_input_keeps_index_column() {
        let empty = long().filter_rows(|_| false);
        let wide = empty.pivot("Player", "Format", &["Runs".to_string()]).unwrap();
        assert_eq!(wide.row_count(), 0);
        assert!(wide.contains_column("Player"));
    }
}
