//! Grouping and per-column reduction

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataframe::{DataFrame, Value};
use crate::error::{Error, Result};
use crate::na::mean_present;

/// Reduction applied to one column within each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    /// Sum of present numbers; integer when every input is an integer
    Sum,
    /// Unweighted mean of present numbers
    Mean,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// First non-missing value
    First,
    /// Number of non-missing values
    Count,
}

impl AggFunc {
    /// Function name
    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Sum => "sum",
            AggFunc::Mean => "mean",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::First => "first",
            AggFunc::Count => "count",
        }
    }

    /// Reduce the cells of one group
    ///
    /// Missing cells are skipped; a group with nothing present reduces to NA
    /// (except `Count`, which gives 0). `Min`/`Max` compare numeric readings,
    /// so `"183*"` beats `"99"`, and fall back to the first present cell when
    /// any cell has no reading, so text such as `"5/20"` is carried through
    /// unchanged. The winning cell is returned as it was.
    pub fn apply(&self, cells: &[&Value]) -> Value {
        let present = || cells.iter().copied().filter(|v| !v.is_na());
        match self {
            AggFunc::Sum => sum(present()),
            AggFunc::Mean => Value::from(mean_present(present().map(Value::as_f64))),
            AggFunc::Min => extreme(present(), Ordering::Less),
            AggFunc::Max => extreme(present(), Ordering::Greater),
            AggFunc::First => present().next().cloned().unwrap_or_default(),
            AggFunc::Count => Value::Int(present().count() as i64),
        }
    }
}

impl FromStr for AggFunc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AggFunc::Sum),
            "mean" | "avg" | "average" => Ok(AggFunc::Mean),
            "min" | "minimum" => Ok(AggFunc::Min),
            "max" | "maximum" => Ok(AggFunc::Max),
            "first" => Ok(AggFunc::First),
            "count" => Ok(AggFunc::Count),
            other => Err(Error::Config(format!("unknown aggregation '{}'", other))),
        }
    }
}

fn sum<'a>(cells: impl Iterator<Item = &'a Value>) -> Value {
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;
    let mut any = false;
    for cell in cells {
        match cell {
            Value::Int(i) => {
                int_total = int_total.and_then(|t| t.checked_add(*i));
                float_total += *i as f64;
                any = true;
            }
            Value::Float(f) => {
                int_total = None;
                float_total += f;
                any = true;
            }
            // Text in a summed column was never coerced; it counts as missing
            Value::Text(_) | Value::NA => {}
        }
    }
    match (any, int_total) {
        (false, _) => Value::NA,
        (true, Some(i)) => Value::Int(i),
        (true, None) => Value::from(float_total),
    }
}

fn extreme<'a>(mut cells: impl Iterator<Item = &'a Value>, wanted: Ordering) -> Value {
    let Some(first) = cells.next() else {
        return Value::NA;
    };
    let mut best = first;
    for cell in cells {
        match cell.numeric_cmp(best) {
            Some(ord) if ord == wanted => best = cell,
            Some(_) => {}
            None => return first.clone(),
        }
    }
    best.clone()
}

/// Rows of a DataFrame partitioned by the values of one or more key columns
///
/// Groups are kept in first-seen order so results are reproducible. Rows
/// with an NA key cell belong to no group.
#[derive(Debug)]
pub struct DataFrameGroupBy<'a> {
    /// Source DataFrame
    source: &'a DataFrame,

    /// Key column names
    by: Vec<String>,

    /// Row indices of each group, in first-seen order
    groups: Vec<Vec<usize>>,
}

impl<'a> DataFrameGroupBy<'a> {
    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Size of each group, in group order
    pub fn size(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Reduce each group to one row
    ///
    /// The result has the key columns followed by one column per
    /// `(column, func)` spec, named after the source column.
    pub fn agg(&self, specs: &[(String, AggFunc)]) -> Result<DataFrame> {
        let mut result = DataFrame::new();

        for key in &self.by {
            let cells = self.source.require_column("groupby", key)?;
            let values = self
                .groups
                .iter()
                .map(|rows| cells[rows[0]].clone())
                .collect();
            result.add_column(key.clone(), values)?;
        }

        for (column, func) in specs {
            let cells = self.source.require_column("groupby", column)?;
            let values = self
                .groups
                .iter()
                .map(|rows| {
                    let group: Vec<&Value> = rows.iter().map(|&i| &cells[i]).collect();
                    func.apply(&group)
                })
                .collect();
            result.add_column(column.clone(), values)?;
        }

        Ok(result)
    }
}

impl DataFrame {
    /// Group rows by the given key columns
    pub fn groupby(&self, by: &[&str]) -> Result<DataFrameGroupBy<'_>> {
        let key_columns = by
            .iter()
            .map(|name| self.require_column("groupby", name))
            .collect::<Result<Vec<_>>>()?;

        let mut index: HashMap<Vec<String>, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for row in 0..self.row_count() {
            let key: Option<Vec<String>> =
                key_columns.iter().map(|cells| cells[row].as_key()).collect();
            let Some(key) = key else {
                continue;
            };
            match index.get(&key) {
                Some(&g) => groups[g].push(row),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![row]);
                }
            }
        }

        Ok(DataFrameGroupBy {
            source: self,
            by: by.iter().map(|s| s.to_string()).collect(),
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[Value]) -> Vec<&Value> {
        values.iter().collect()
    }

    #[test]
    fn sum_keeps_integers() {
        let values = [Value::Int(10), Value::NA, Value::Int(15)];
        assert_eq!(AggFunc::Sum.apply(&cells(&values)), Value::Int(25));

        let mixed = [Value::Int(1), Value::Float(0.5)];
        assert_eq!(AggFunc::Sum.apply(&cells(&mixed)), Value::Float(1.5));
    }

    #[test]
    fn all_missing_reduces_to_na() {
        let values = [Value::NA, Value::NA];
        for func in [AggFunc::Sum, AggFunc::Mean, AggFunc::Max, AggFunc::First] {
            assert_eq!(func.apply(&cells(&values)), Value::NA, "{}", func.name());
        }
        assert_eq!(AggFunc::Count.apply(&cells(&values)), Value::Int(0));
    }

    #[test]
    fn max_of_text_takes_first_present() {
        let values = [Value::NA, Value::from("5/20"), Value::from("6/12")];
        assert_eq!(AggFunc::Max.apply(&cells(&values)), Value::from("5/20"));

        let scores = [Value::from("99"), Value::from("150"), Value::from("183*")];
        assert_eq!(AggFunc::Max.apply(&cells(&scores)), Value::from("183*"));
        assert_eq!(AggFunc::Min.apply(&cells(&scores)), Value::from("99"));

        let numbers = [Value::Int(3), Value::Float(7.5), Value::Int(5)];
        assert_eq!(AggFunc::Max.apply(&cells(&numbers)), Value::Float(7.5));
        assert_eq!(AggFunc::Min.apply(&cells(&numbers)), Value::Int(3));
    }

    #[test]
    fn parse_names() {
        assert_eq!("Average".parse::<AggFunc>().unwrap(), AggFunc::Mean);
        assert!("median".parse::<AggFunc>().is_err());
    }

    #[test]
    fn groups_keep_first_seen_order_and_skip_na_keys() {
        let df = DataFrame::from_columns(vec![
            (
                "Player",
                vec![Value::from("B"), Value::from("A"), Value::NA, Value::from("B")],
            ),
            (
                "Runs",
                vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
            ),
        ])
        .unwrap();

        let grouped = df.groupby(&["Player"]).unwrap();
        assert_eq!(grouped.group_count(), 2);
        assert_eq!(grouped.size(), vec![2, 1]);

        let result = grouped
            .agg(&[("Runs".to_string(), AggFunc::Sum)])
            .unwrap();
        assert_eq!(result.value(0, "Player"), Some(&Value::from("B")));
        assert_eq!(result.value(0, "Runs"), Some(&Value::Int(5)));
        assert_eq!(result.value(1, "Runs"), Some(&Value::Int(2)));
    }
}
