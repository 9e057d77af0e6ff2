use std::path::PathBuf;

use crate::{Estimator, data::ColumnNames};

/// Where the category table comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DataSource {
  #[default]
  Sample,
  File(PathBuf),
}

/// What the static renderer does with its chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StaticOutput {
  /// Open a window and wait for it to close.
  #[default]
  Display,
  /// Write a PNG.
  Image(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractiveOutput {
  pub path: PathBuf,
  /// Open the written document in the default browser.
  pub open: bool,
}

impl Default for InteractiveOutput {
  fn default() -> Self { InteractiveOutput { path: PathBuf::from("gender_distribution.html"), open: false } }
}

/// Everything a pipeline run needs. A `None` output disables that renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
  pub source:             DataSource,
  pub columns:            ColumnNames,
  pub static_output:      Option<StaticOutput>,
  pub interactive_output: Option<InteractiveOutput>,
  pub estimator:          Estimator,
  pub width:              u32,
  pub height:             u32,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      source:             DataSource::Sample,
      columns:            ColumnNames::default(),
      static_output:      Some(StaticOutput::Display),
      interactive_output: Some(InteractiveOutput::default()),
      estimator:          Estimator::Sum,
      width:              1500,
      height:             900,
    }
  }
}
