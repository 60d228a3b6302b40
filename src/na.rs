use std::fmt::{self, Debug, Display};
use std::ops::Add;

/// A value that may be missing (NA, Not Available)
///
/// Missing data is carried in the type system instead of a sentinel such as
/// `f64::NAN`, so arithmetic on an absent value has to be spelled out.
#[derive(Clone, Copy, PartialEq)]
pub enum NA<T> {
    /// A present value
    Value(T),
    /// No value
    NA,
}

impl<T> NA<T> {
    /// Check whether the value is missing
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    /// Check whether a value is present
    pub fn is_value(&self) -> bool {
        !self.is_na()
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

// NA is absorbing: any NA operand yields NA
impl<T: Add<Output = T>> Add for NA<T> {
    type Output = NA<T>;

    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => NA::Value(a + b),
            _ => NA::NA,
        }
    }
}

/// Sum the present values, skipping NA
///
/// Returns NA when nothing is present, so an all-missing group stays
/// missing instead of collapsing to zero.
pub fn sum_present<T, I>(values: I) -> NA<T>
where
    T: Add<Output = T>,
    I: IntoIterator<Item = NA<T>>,
{
    values
        .into_iter()
        .filter(NA::is_value)
        .fold(NA::NA, |acc, v| match acc {
            NA::NA => v,
            acc => acc + v,
        })
}

/// Arithmetic mean of the present values, skipping NA
pub fn mean_present<I>(values: I) -> NA<f64>
where
    I: IntoIterator<Item = NA<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(Option::<f64>::from)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        NA::NA
    } else {
        NA::Value(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_skips_missing() {
        let values = vec![NA::Value(10), NA::NA, NA::Value(15)];
        assert_eq!(sum_present(values), NA::Value(25));
    }

    #[test]
    fn sum_of_nothing_is_missing() {
        let values: Vec<NA<i64>> = vec![NA::NA, NA::NA];
        assert!(sum_present(values).is_na());
    }

    #[test]
    fn mean_ignores_missing() {
        let values = vec![NA::Value(20.0), NA::NA, NA::Value(40.0)];
        assert_eq!(mean_present(values), NA::Value(30.0));
        assert!(mean_present(Vec::new()).is_na());
    }

    #[test]
    fn na_absorbs_addition() {
        assert_eq!(NA::Value(1) + NA::NA, NA::NA);
        assert_eq!(NA::Value(1) + NA::Value(2), NA::Value(3));
    }
}
