//! Category tables: loading, the built-in sample and percentage aggregation.

mod aggregate;
mod loader;
mod sample;

use std::collections::HashMap;

use polars::prelude::*;

pub use aggregate::aggregate;
pub use loader::{diagnostic, load_data, load_data_with, try_load_data};
pub use sample::{sample_frame, sample_table};

use crate::{Error, Result};

/// Name of the derived share column.
pub const PERCENTAGE: &str = "Percentage";

/// Which columns hold the category labels and the raw counts.
///
/// Lookup is case-insensitive, so `gender` matches a `Gender` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnNames {
  pub label: String,
  pub count: String,
}

impl Default for ColumnNames {
  fn default() -> Self { ColumnNames { label: "Gender".to_string(), count: "Count".to_string() } }
}

/// An ordered sequence of category records backed by a `DataFrame`.
///
/// The count column is always `Int64` and the label column always `String`. Once built, a table is never
/// mutated; [`aggregate`] returns a new table with the [`PERCENTAGE`] column.
#[derive(Clone, Debug)]
pub struct CategoryTable {
  frame: DataFrame,
  label: String,
  count: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRecord {
  pub label:      String,
  pub count:      i64,
  pub percentage: Option<f64>,
}

/// All records sharing one label, in table order.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryGroup {
  pub label:   String,
  pub records: Vec<CategoryRecord>,
}

impl CategoryTable {
  pub fn new(frame: DataFrame, columns: &ColumnNames) -> Result<Self> {
    let label = resolve_column(&frame, &columns.label)?;
    let count = resolve_column(&frame, &columns.count)?;

    let labels = frame.column(&label)?.cast(&DataType::String)?;
    if let Some(row) = labels.str()?.into_iter().position(|l| l.is_none()) {
      return Err(Error::InvalidLabel { row });
    }

    let raw = frame.column(&count)?;
    let counts = raw.cast(&DataType::Int64)?;
    let fractional: Vec<bool> = if raw.dtype().is_float() {
      raw.cast(&DataType::Float64)?.f64()?.into_iter().map(|v| v.is_some_and(|v| v.fract() != 0.0)).collect()
    } else {
      vec![false; raw.len()]
    };

    for (row, value) in counts.i64()?.into_iter().enumerate() {
      match value {
        Some(c) if c >= 0 && !fractional[row] => {}
        _ => {
          let value = raw.get(row).map(|v| v.to_string()).unwrap_or_else(|_| "null".to_string());
          return Err(Error::InvalidCount { row, value });
        }
      }
    }

    let mut frame = frame;
    frame.with_column(labels)?;
    frame.with_column(counts)?;

    Ok(CategoryTable { frame, label, count })
  }

  pub fn frame(&self) -> &DataFrame { &self.frame }
  pub fn label_column(&self) -> &str { &self.label }
  pub fn count_column(&self) -> &str { &self.count }

  pub fn len(&self) -> usize { self.frame.height() }
  pub fn is_empty(&self) -> bool { self.frame.height() == 0 }

  pub fn is_aggregated(&self) -> bool { self.frame.column(PERCENTAGE).is_ok() }

  /// Sum of all counts. Fails with `CountOverflow` instead of wrapping.
  pub fn total(&self) -> Result<i64> {
    self
      .counts()?
      .into_iter()
      .enumerate()
      .try_fold(0i64, |sum, (row, c)| sum.checked_add(c).ok_or(Error::CountOverflow { row }))
  }

  pub fn labels(&self) -> Result<Vec<String>> {
    Ok(self.frame.column(&self.label)?.str()?.into_iter().map(|l| l.unwrap_or_default().to_string()).collect())
  }

  pub fn counts(&self) -> Result<Vec<i64>> {
    Ok(self.frame.column(&self.count)?.i64()?.into_iter().map(|c| c.unwrap_or(0)).collect())
  }

  /// The derived shares. Fails with `MissingColumn` before the table is aggregated.
  pub fn percentages(&self) -> Result<Vec<f64>> {
    let column = self.frame.column(PERCENTAGE).map_err(|_| Error::MissingColumn(PERCENTAGE.to_string()))?;
    Ok(column.f64()?.into_iter().map(|p| p.unwrap_or(f64::NAN)).collect())
  }

  pub fn records(&self) -> Result<Vec<CategoryRecord>> {
    let labels = self.labels()?;
    let counts = self.counts()?;
    let percentages = if self.is_aggregated() { Some(self.percentages()?) } else { None };

    Ok(
      labels
        .into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (label, count))| CategoryRecord {
          label,
          count,
          percentage: percentages.as_ref().map(|p| p[i]),
        })
        .collect(),
    )
  }

  /// Groups records by label, ordered by each label's first appearance.
  pub fn groups(&self) -> Result<Vec<CategoryGroup>> {
    let mut groups: Vec<CategoryGroup> = vec![];
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in self.records()? {
      match index.get(&record.label) {
        Some(&i) => groups[i].records.push(record),
        None => {
          index.insert(record.label.clone(), groups.len());
          groups.push(CategoryGroup { label: record.label.clone(), records: vec![record] });
        }
      }
    }

    Ok(groups)
  }

  pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
    CategoryTable { frame, label: self.label.clone(), count: self.count.clone() }
  }
}

impl CategoryGroup {
  pub fn total(&self) -> i64 { self.records.iter().map(|r| r.count).sum() }

  pub fn mean(&self) -> f64 {
    if self.records.is_empty() { 0.0 } else { self.total() as f64 / self.records.len() as f64 }
  }

  pub fn percentage(&self) -> Option<f64> {
    self.records.iter().map(|r| r.percentage).sum::<Option<f64>>()
  }
}

fn resolve_column(frame: &DataFrame, name: &str) -> Result<String> {
  frame
    .get_column_names()
    .into_iter()
    .find(|c| c.as_str().eq_ignore_ascii_case(name))
    .map(|c| c.to_string())
    .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn columns_resolve_case_insensitively() {
    let frame = df! {
      "gender" => &["a", "b"],
      "COUNT" => &[1i64, 2],
    }
    .unwrap();

    let table = CategoryTable::new(frame, &ColumnNames::default()).unwrap();
    assert_eq!(table.label_column(), "gender");
    assert_eq!(table.count_column(), "COUNT");
    assert_eq!(table.total().unwrap(), 3);
  }

  #[test]
  fn missing_count_column() {
    let frame = df! { "Gender" => &["a"], "Total" => &[1i64] }.unwrap();

    let err = CategoryTable::new(frame, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(name) if name == "Count"));
  }

  #[test]
  fn negative_count_rejected() {
    let frame = df! { "Gender" => &["a", "b"], "Count" => &[3i64, -1] }.unwrap();

    let err = CategoryTable::new(frame, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { row: 1, .. }));
  }

  #[test]
  fn fractional_count_rejected() {
    let frame = df! { "Gender" => &["a", "b", "c"], "Count" => &[2.0f64, 4.0, 2.7] }.unwrap();

    let err = CategoryTable::new(frame, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { row: 2, .. }));
  }

  #[test]
  fn whole_float_counts_accepted() {
    let frame = df! { "Gender" => &["a", "b"], "Count" => &[2.0f64, 4.0] }.unwrap();

    let table = CategoryTable::new(frame, &ColumnNames::default()).unwrap();
    assert_eq!(table.counts().unwrap(), [2, 4]);
  }

  #[test]
  fn total_overflow_is_an_error() {
    let frame = df! { "Gender" => &["a", "b"], "Count" => &[i64::MAX, 10] }.unwrap();

    let table = CategoryTable::new(frame, &ColumnNames::default()).unwrap();
    assert!(matches!(table.total(), Err(Error::CountOverflow { row: 1 })));
  }

  #[test]
  fn groups_keep_first_appearance_order() {
    let table = sample_table().unwrap();
    let groups = table.groups().unwrap();

    let labels = groups.iter().map(|g| g.label.as_str()).collect::<Vec<_>>();
    assert_eq!(labels, ["Male", "Female", "Non-binary", "Other"]);

    let totals = groups.iter().map(CategoryGroup::total).collect::<Vec<_>>();
    assert_eq!(totals, [160, 150, 12, 9]);
    assert!((groups[0].mean() - 160.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn percentages_require_aggregation() {
    let table = sample_table().unwrap();
    assert!(!table.is_aggregated());
    assert!(matches!(table.percentages(), Err(Error::MissingColumn(_))));
  }
}
