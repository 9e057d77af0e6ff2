use std::{
  fs,
  io::{Cursor, ErrorKind},
  path::Path,
};

use polars::prelude::*;

use super::{CategoryTable, ColumnNames};
use crate::{Error, Result};

/// Loads a CSV file with the default `Gender`/`Count` columns.
///
/// Returns `None` on failure. A missing or empty file also prints a diagnostic to standard output.
pub fn load_data(path: impl AsRef<Path>) -> Option<CategoryTable> {
  load_data_with(path, &ColumnNames::default())
}

pub fn load_data_with(path: impl AsRef<Path>, columns: &ColumnNames) -> Option<CategoryTable> {
  let path = path.as_ref();

  match try_load_data(path, columns) {
    Ok(table) => Some(table),
    Err(e) => {
      if let Some(message) = diagnostic(&e) {
        println!("{message}");
      }
      log::warn!("failed to load {}: {e}", path.display());
      None
    }
  }
}

/// The user-facing line printed for a load failure, if the failure has one.
pub fn diagnostic(error: &Error) -> Option<&'static str> {
  match error {
    Error::FileNotFound(_) => Some("Error: File not found. Please check the file path."),
    Error::EmptyFile(_) => Some("Error: The file is empty."),
    _ => None,
  }
}

pub fn try_load_data(path: impl AsRef<Path>, columns: &ColumnNames) -> Result<CategoryTable> {
  let path = path.as_ref();

  let bytes = match fs::read(path) {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::FileNotFound(path.to_path_buf())),
    Err(e) => return Err(e.into()),
  };

  if bytes.trim_ascii().is_empty() {
    return Err(Error::EmptyFile(path.to_path_buf()));
  }

  let frame = match CsvReader::new(Cursor::new(bytes)).finish() {
    Ok(frame) => frame,
    Err(PolarsError::NoData(_)) => return Err(Error::EmptyFile(path.to_path_buf())),
    Err(e) => return Err(e.into()),
  };

  if frame.height() == 0 {
    return Err(Error::EmptyFile(path.to_path_buf()));
  }

  log::debug!("loaded {} rows from {}", frame.height(), path.display());
  CategoryTable::new(frame, columns)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
  }

  #[test]
  fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");

    let err = try_load_data(&path, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
    assert_eq!(diagnostic(&err), Some("Error: File not found. Please check the file path."));

    assert!(load_data(&path).is_none());
  }

  #[test]
  fn zero_byte_file() {
    let file = write_csv("");

    let err = try_load_data(file.path(), &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyFile(_)));
    assert_eq!(diagnostic(&err), Some("Error: The file is empty."));

    assert!(load_data(file.path()).is_none());
  }

  #[test]
  fn whitespace_only_file() {
    let file = write_csv(" \n\n\t\n");
    assert!(matches!(try_load_data(file.path(), &ColumnNames::default()), Err(Error::EmptyFile(_))));
  }

  #[test]
  fn header_only_file() {
    let file = write_csv("Gender,Count\n");

    let err = try_load_data(file.path(), &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyFile(_)));
    assert!(load_data(file.path()).is_none());
  }

  #[test]
  fn loads_rows_in_order() {
    let file = write_csv("Gender,Count\nMale,10\nFemale,30\nMale,5\n");

    let table = load_data(file.path()).unwrap();
    assert_eq!(table.labels().unwrap(), ["Male", "Female", "Male"]);
    assert_eq!(table.counts().unwrap(), [10, 30, 5]);
  }

  #[test]
  fn fractional_counts() {
    let file = write_csv("Gender,Count\nA,2.7\nB,1.2\n");

    let err = try_load_data(file.path(), &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { row: 0, .. }));
    assert_eq!(diagnostic(&err), None);
    assert!(load_data(file.path()).is_none());
  }

  #[test]
  fn custom_columns() {
    let file = write_csv("group,n\nx,1\ny,2\n");
    let columns = ColumnNames { label: "Group".to_string(), count: "N".to_string() };

    let table = try_load_data(file.path(), &columns).unwrap();
    assert_eq!(table.total().unwrap(), 3);

    assert!(matches!(
      try_load_data(file.path(), &ColumnNames::default()),
      Err(Error::MissingColumn(_))
    ));
  }
}
