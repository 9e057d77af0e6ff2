use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("file not found: {}", .0.display())]
  FileNotFound(PathBuf),

  #[error("file is empty: {}", .0.display())]
  EmptyFile(PathBuf),

  #[error("missing column '{0}'")]
  MissingColumn(String),

  #[error("missing label at row {row}")]
  InvalidLabel { row: usize },

  #[error("invalid count '{value}' at row {row}")]
  InvalidCount { row: usize, value: String },

  #[error("total count overflows at row {row}")]
  CountOverflow { row: usize },

  #[error("empty dataset: total count is zero")]
  EmptyDataset,

  #[error("polars error: {0}")]
  Polars(#[from] polars::error::PolarsError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),

  #[error("JSON serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("gpu error: {0}")]
  Gpu(String),

  #[error("window error: {0}")]
  Window(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Logs and discards errors that should not abort drawing.
pub trait ResultExt<T> {
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        log::warn!("{e}");
        None
      }
    }
  }
}
