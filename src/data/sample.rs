use polars::prelude::*;

use super::{CategoryTable, ColumnNames};
use crate::Result;

pub fn sample_frame() -> PolarsResult<DataFrame> {
  df! {
    "Gender" => &[
      "Male", "Female", "Non-binary", "Other", "Male", "Female", "Male", "Female", "Non-binary", "Other",
    ],
    "Count" => &[45i64, 55, 5, 3, 60, 50, 55, 45, 7, 6],
  }
}

/// The built-in gender distribution used when no input file is configured.
pub fn sample_table() -> Result<CategoryTable> { CategoryTable::new(sample_frame()?, &ColumnNames::default()) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_shape() {
    let table = sample_table().unwrap();
    assert_eq!(table.len(), 10);
    assert_eq!(table.total().unwrap(), 331);
  }
}
