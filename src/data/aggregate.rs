use polars::prelude::*;

use super::{CategoryTable, PERCENTAGE};
use crate::{Error, Result};

/// Returns a copy of `table` with the `Percentage` column set to `count / total * 100`.
///
/// An existing `Percentage` column is overwritten. Fails with `EmptyDataset` when the counts sum to zero, and
/// with `CountOverflow` when they do not fit in an `i64`.
pub fn aggregate(table: &CategoryTable) -> Result<CategoryTable> {
  let total = table.total()?;
  if total == 0 {
    return Err(Error::EmptyDataset);
  }

  let frame = table
    .frame()
    .clone()
    .lazy()
    .with_column(
      (col(table.count_column()).cast(DataType::Float64) / lit(total as f64) * lit(100.0))
        .alias(PERCENTAGE),
    )
    .collect()?;

  log::debug!("aggregated {} rows, total count {total}", frame.height());
  Ok(table.with_frame(frame))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{ColumnNames, sample_table};

  fn table(counts: &[i64]) -> CategoryTable {
    let labels = (0..counts.len()).map(|i| format!("c{i}")).collect::<Vec<_>>();
    let frame = df! { "Gender" => labels, "Count" => counts }.unwrap();
    CategoryTable::new(frame, &ColumnNames::default()).unwrap()
  }

  #[test]
  fn sample_percentages() {
    let table = aggregate(&sample_table().unwrap()).unwrap();
    let percentages = table.percentages().unwrap();

    assert!((percentages[0] - 13.595).abs() < 1e-3);
    assert!((percentages[3] - 0.906).abs() < 1e-3);
    assert!((percentages.iter().sum::<f64>() - 100.0).abs() < 1e-6);
  }

  #[test]
  fn shares_sum_to_hundred() {
    for counts in [vec![1, 2, 3], vec![7], vec![0, 0, 9, 1], vec![1_000_000, 1, 333, 17, 42]] {
      let percentages = aggregate(&table(&counts)).unwrap().percentages().unwrap();
      assert!((percentages.iter().sum::<f64>() - 100.0).abs() < 1e-6, "{counts:?}");
    }
  }

  #[test]
  fn single_record_is_exactly_hundred() {
    let percentages = aggregate(&table(&[42])).unwrap().percentages().unwrap();
    assert_eq!(percentages, [100.0]);
  }

  #[test]
  fn zero_total() {
    assert!(matches!(aggregate(&table(&[0, 0])), Err(Error::EmptyDataset)));
    assert!(matches!(aggregate(&table(&[])), Err(Error::EmptyDataset)));
  }

  #[test]
  fn overflowing_total() {
    assert!(matches!(aggregate(&table(&[i64::MAX, 10])), Err(Error::CountOverflow { row: 1 })));
  }

  #[test]
  fn overwrites_existing_column() {
    let once = aggregate(&table(&[1, 3])).unwrap();
    let twice = aggregate(&once).unwrap();

    assert_eq!(twice.frame().width(), once.frame().width());
    assert_eq!(twice.percentages().unwrap(), [25.0, 75.0]);
  }

  #[test]
  fn input_is_untouched() {
    let input = sample_table().unwrap();
    let before = input.frame().clone();

    aggregate(&input).unwrap();
    assert!(input.frame().equals(&before));
    assert!(!input.is_aggregated());
  }
}
