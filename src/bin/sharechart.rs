use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use sharechart::{ColumnNames, Config, DataSource, Estimator, InteractiveOutput, StaticOutput, pipeline};

#[derive(Parser)]
#[clap(name = "sharechart")]
#[clap(about = "Bar charts of percentage shares from a count column", long_about = None)]
struct Cli {
  /// CSV file to load. Uses the built-in sample when omitted.
  #[clap(long)]
  input: Option<PathBuf>,

  #[clap(long, default_value = "Gender")]
  label_column: String,

  #[clap(long, default_value = "Count")]
  count_column: String,

  /// Write the static chart to this PNG instead of opening a window.
  #[clap(long)]
  static_output: Option<PathBuf>,

  #[clap(long)]
  no_static: bool,

  #[clap(long, default_value = "gender_distribution.html")]
  html_output: PathBuf,

  #[clap(long)]
  no_interactive: bool,

  /// Open the interactive chart in the default browser.
  #[clap(long)]
  open: bool,

  /// How repeated labels collapse into one static bar.
  #[clap(long, value_enum, default_value_t = EstimatorArg::Sum)]
  estimator: EstimatorArg,

  #[clap(long, default_value_t = 1500)]
  width: u32,

  #[clap(long, default_value_t = 900)]
  height: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum EstimatorArg {
  Sum,
  Mean,
}

impl From<Cli> for Config {
  fn from(cli: Cli) -> Self {
    Config {
      source:             cli.input.map_or(DataSource::Sample, DataSource::File),
      columns:            ColumnNames { label: cli.label_column, count: cli.count_column },
      static_output:      (!cli.no_static).then(|| cli.static_output.map_or(StaticOutput::Display, StaticOutput::Image)),
      interactive_output: (!cli.no_interactive)
        .then(|| InteractiveOutput { path: cli.html_output, open: cli.open }),
      estimator:          match cli.estimator {
        EstimatorArg::Sum => Estimator::Sum,
        EstimatorArg::Mean => Estimator::Mean,
      },
      width:              cli.width,
      height:             cli.height,
    }
  }
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let config = Config::from(Cli::parse());
  match pipeline::run(&config) {
    Ok(artifacts) => {
      for artifact in artifacts {
        log::debug!("produced {artifact:?}");
      }
      ExitCode::SUCCESS
    }
    Err(e) => {
      log::error!("{e}");
      ExitCode::FAILURE
    }
  }
}
