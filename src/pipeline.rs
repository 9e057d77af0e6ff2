//! `load_or_sample -> aggregate -> render_static / render_interactive`, driven by a [`Config`].

use std::io::{self, Write};

use crate::{
  Result, ResultExt,
  config::{Config, DataSource, InteractiveOutput, StaticOutput},
  data::{self, CategoryTable},
  renderer::{Artifact, InteractiveRenderer, Renderer, StaticRenderer},
};

/// Loads the configured data source.
///
/// A missing or empty input file prints the loader diagnostic and fails; it never falls back to the sample.
pub fn load_or_sample(config: &Config) -> Result<CategoryTable> { load_reporting(config, &mut io::stdout()) }

fn load_reporting(config: &Config, out: &mut impl Write) -> Result<CategoryTable> {
  match &config.source {
    DataSource::Sample => {
      log::info!("using built-in sample data");
      data::sample_table()
    }
    DataSource::File(path) => {
      log::info!("loading {}", path.display());
      data::try_load_data(path, &config.columns).inspect_err(|e| {
        if let Some(message) = data::diagnostic(e) {
          writeln!(out, "{message}").log_err();
        }
      })
    }
  }
}

pub fn render_static(table: &CategoryTable, output: StaticOutput, config: &Config) -> Result<Artifact> {
  render(&static_renderer(output, config), table)
}

pub fn render_interactive(table: &CategoryTable, output: InteractiveOutput) -> Result<Artifact> {
  render(&InteractiveRenderer::new(output), table)
}

/// Loads, aggregates and renders with every enabled renderer, static first.
pub fn run(config: &Config) -> Result<Vec<Artifact>> {
  let table = data::aggregate(&load_or_sample(config)?)?;
  log::info!("aggregated {} records, total count {}", table.len(), table.total()?);

  let mut artifacts = vec![];
  if let Some(output) = &config.static_output {
    artifacts.push(render_static(&table, output.clone(), config)?);
  }
  if let Some(output) = &config.interactive_output {
    artifacts.push(render_interactive(&table, output.clone())?);
  }

  if artifacts.is_empty() {
    log::warn!("no renderers enabled");
  }
  Ok(artifacts)
}

fn render(renderer: &dyn Renderer, table: &CategoryTable) -> Result<Artifact> {
  log::info!("rendering {} chart", renderer.name());
  renderer.render(table)
}

fn static_renderer(output: StaticOutput, config: &Config) -> StaticRenderer {
  StaticRenderer::new(output).estimator(config.estimator).size(config.width, config.height)
}
