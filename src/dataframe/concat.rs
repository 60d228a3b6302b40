use std::collections::HashSet;

use super::{DataFrame, Value};
use crate::error::Result;

/// Concatenate DataFrames row-wise
///
/// The result carries the union of all columns, in first-seen order. Cells
/// for columns a frame does not have are NA. Row order follows the input
/// order.
pub fn concat(frames: &[DataFrame]) -> Result<DataFrame> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for frame in frames {
        for name in frame.column_names() {
            if seen.insert(name.as_str()) {
                columns.push(name.clone());
            }
        }
    }

    let total_rows: usize = frames.iter().map(DataFrame::row_count).sum();
    let mut result = DataFrame::new();
    for name in &columns {
        let mut values = Vec::with_capacity(total_rows);
        for frame in frames {
            match frame.column(name) {
                Some(cells) => values.extend_from_slice(cells),
                None => values.extend(std::iter::repeat(Value::NA).take(frame.row_count())),
            }
        }
        result.add_column(name.clone(), values)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_unions_columns() {
        let a = DataFrame::from_columns(vec![
            ("Player", vec![Value::from("A")]),
            ("Inns", vec![Value::Int(3)]),
        ])
        .unwrap();
        let b = DataFrame::from_columns(vec![
            ("Player", vec![Value::from("B"), Value::from("C")]),
            ("Wkts", vec![Value::Int(1), Value::Int(2)]),
        ])
        .unwrap();

        let combined = concat(&[a, b]).unwrap();
        assert_eq!(combined.row_count(), 3);
        assert_eq!(combined.column_names(), &["Player", "Inns", "Wkts"]);
        assert_eq!(combined.value(0, "Wkts"), Some(&Value::NA));
        assert_eq!(combined.value(2, "Inns"), Some(&Value::NA));
        assert_eq!(combined.value(2, "Player"), Some(&Value::from("C")));
    }
}
