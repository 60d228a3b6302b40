use std::collections::{HashMap, HashSet};

use super::Value;
use crate::error::{Error, Result};
use crate::na::NA;

/// Column-ordered, in-memory table of [`Value`] cells
///
/// Column order is preserved exactly as columns are added; every column has
/// `row_count` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    data: HashMap<String, Vec<Value>>,
    row_count: usize,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a DataFrame from `(name, values)` pairs, in order
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut df = DataFrame::new();
        for (name, values) in columns {
            df.add_column(name, values)?;
        }
        Ok(df)
    }

    /// Create a DataFrame from a header and row-major cells
    ///
    /// Short rows are padded with NA; long rows are an error.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = header.len();
        let mut columns: Vec<Vec<Value>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(Error::Consistency {
                    stage: "dataframe",
                    message: format!(
                        "row {} has {} cells but the header has {}",
                        row_idx,
                        row.len(),
                        width
                    ),
                });
            }
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or_default());
            }
        }
        Self::from_columns(header.into_iter().zip(columns))
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Check whether a column exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A DataFrame without rows is empty, whatever its columns
    /// Append a column
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.data.contains_key(&name) {
            return Err(Error::Consistency {
                stage: "dataframe",
                message: format!("duplicate column name '{}'", name),
            });
        }
        if self.columns.is_empty() {
            self.row_count = values.len();
        } else if values.len() != self.row_count {
            return Err(Error::Consistency {
                stage: "dataframe",
                message: format!(
                    "column '{}' has {} rows but expected {}",
                    name,
                    values.len(),
                    self.row_count
                ),
            });
        }
        self.columns.push(name.clone());
        self.data.insert(name, values);
        Ok(())
    }

    /// Replace the cells of an existing column, or append it if absent
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if !self.data.contains_key(&name) {
            return self.add_column(name, values);
        }
        if values.len() != self.row_count {
            return Err(Error::Consistency {
                stage: "dataframe",
                message: format!(
                    "column '{}' has {} rows but expected {}",
                    name,
                    values.len(),
                    self.row_count
                ),
            });
        }
        self.data.insert(name, values);
        Ok(())
    }

    /// Remove a column, returning its cells
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let values = self.data.remove(name)?;
        self.columns.retain(|c| c != name);
        if self.columns.is_empty() {
            self.row_count = 0;
        }
        Some(values)
    }

    /// Borrow a column's cells
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Borrow a column's cells, reporting `stage` when it is absent
    pub fn require_column(&self, stage: &'static str, name: &str) -> Result<&[Value]> {
        self.column(name)
            .ok_or_else(|| Error::column_not_found(stage, name))
    }

    /// Apply `f` to every cell of a column in place
    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: FnMut(&Value) -> Value,
    {
        let values = self
            .data
            .get_mut(name)
            .ok_or_else(|| Error::column_not_found("dataframe", name))?;
        *values = values.iter().map(f).collect();
        Ok(())
    }

    /// Rename a column in place
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if self.data.contains_key(new) {
            return Err(Error::Consistency {
                stage: "dataframe",
                message: format!("cannot rename '{}' to existing column '{}'", old, new),
            });
        }
        let values = self
            .data
            .remove(old)
            .ok_or_else(|| Error::column_not_found("dataframe", old))?;
        self.data.insert(new.to_string(), values);
        for column in self.columns.iter_mut() {
            if column == old {
                *column = new.to_string();
            }
        }
        Ok(())
    }

    /// Cell at `(row, column)`
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.data.get(column)?.get(row)
    }

    /// Cells of one row, in column order
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.row_count {
            return None;
        }
        Some(
            self.columns
                .iter()
                .filter_map(|c| self.data.get(c).and_then(|v| v.get(row)))
                .collect(),
        )
    }

    /// Iterate rows, each as cells in column order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }

    /// New DataFrame holding the given rows, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> DataFrame {
        let mut result = DataFrame::new();
        for name in &self.columns {
            let source = &self.data[name];
            let values = indices
                .iter()
                .map(|&i| source.get(i).cloned().unwrap_or_default())
                .collect();
            // Names are unique and lengths equal, so this cannot fail
            let _ = result.add_column(name.clone(), values);
        }
        result
    }

    /// New DataFrame holding the rows for which `predicate(row_index)` holds
    pub fn filter_rows<F>(&self, mut predicate: F) -> DataFrame
    where
        F: FnMut(usize) -> bool,
    {
        let indices: Vec<usize> = (0..self.row_count).filter(|&i| predicate(i)).collect();
        self.take_rows(&indices)
    }

    /// New DataFrame with only the named columns, in the given order
    pub fn select(&self, names: &[String]) -> Result<DataFrame> {
        let mut seen = HashSet::new();
        let mut result = DataFrame::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let values = self
                .column(name)
                .ok_or_else(|| Error::column_not_found("dataframe", name.as_str()))?;
            result.add_column(name.clone(), values.to_vec())?;
        }
        Ok(result)
    }

    /// Key strings of a column; NA cells map to `None`
    pub fn key_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let values = self
            .column(name)
            .ok_or_else(|| Error::column_not_found("dataframe", name))?;
        Ok(values.iter().map(Value::as_key).collect())
    }

    /// Numeric view of a column
    pub fn numeric_values(&self, name: &str) -> Result<Vec<NA<f64>>> {
        let values = self
            .column(name)
            .ok_or_else(|| Error::column_not_found("dataframe", name))?;
        Ok(values.iter().map(Value::as_f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::from_columns(vec![
            ("Player", vec![Value::from("A"), Value::from("B"), Value::from("C")]),
            ("Runs", vec![Value::Int(10), Value::NA, Value::Int(30)]),
        ])
        .unwrap()
    }

    #[test]
    fn add_column_rejects_wrong_length() {
        let mut df = sample();
        assert!(df.add_column("Ave", vec![Value::Int(1)]).is_err());
        assert!(df.add_column("Runs", vec![Value::NA; 3]).is_err());
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let df = DataFrame::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int(1)], vec![Value::Int(2), Value::Int(3)]],
        )
        .unwrap();
        assert_eq!(df.value(0, "b"), Some(&Value::NA));
        assert_eq!(df.value(1, "b"), Some(&Value::Int(3)));
    }

    #[test]
    fn filter_and_select_keep_order() {
        let df = sample();
        let filtered = df.filter_rows(|i| i != 1);
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(filtered.value(1, "Player"), Some(&Value::from("C")));

        let selected = df.select(&["Runs".to_string(), "Player".to_string()]).unwrap();
        assert_eq!(selected.column_names(), &["Runs".to_string(), "Player".to_string()]);
    }

    #[test]
    fn rename_keeps_position() {
        let mut df = sample();
        df.rename_column("Player", "Name").unwrap();
        assert_eq!(df.column_names()[0], "Name");
        assert!(df.rename_column("Name", "Runs").is_err());
    }
}
