use std::path::PathBuf;

use crate::{
  Estimator, GridLines, Plot, Result,
  config::{InteractiveOutput, StaticOutput},
  data::CategoryTable,
  interactive::InteractiveChart,
};

/// What a renderer produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
  /// A window was shown and has been closed.
  Window,
  Image(PathBuf),
  Document(PathBuf),
}

/// Turns an aggregated table into a chart. Renderers only borrow the table.
pub trait Renderer {
  fn name(&self) -> &'static str;
  fn render(&self, table: &CategoryTable) -> Result<Artifact>;
}

pub struct StaticRenderer {
  output:    StaticOutput,
  estimator: Estimator,
  width:     u32,
  height:    u32,
}

pub struct InteractiveRenderer {
  chart:  InteractiveChart,
  output: InteractiveOutput,
}

impl StaticRenderer {
  pub fn new(output: StaticOutput) -> Self {
    StaticRenderer { output, estimator: Estimator::Sum, width: 1500, height: 900 }
  }

  pub fn estimator(mut self, estimator: Estimator) -> Self {
    self.estimator = estimator;
    self
  }

  pub fn size(mut self, width: u32, height: u32) -> Self {
    self.width = width;
    self.height = height;
    self
  }

  /// The chart this renderer draws, without touching the GPU.
  pub fn plot(&self, table: &CategoryTable) -> Result<Plot> {
    let mut plot = Plot::new();
    plot.title("Gender Distribution in Population (Advanced Visualization)").size(self.width, self.height);
    plot.x.title(table.label_column()).tick_rotation(45.0);
    plot.y.title(table.count_column()).grid(GridLines::default());
    plot.bar_chart(table)?.estimator(self.estimator);
    Ok(plot)
  }
}

impl Renderer for StaticRenderer {
  fn name(&self) -> &'static str { "static" }

  fn render(&self, table: &CategoryTable) -> Result<Artifact> {
    let plot = self.plot(table)?;

    match &self.output {
      StaticOutput::Display => {
        plot.show()?;
        Ok(Artifact::Window)
      }
      StaticOutput::Image(path) => {
        plot.save(path)?;
        Ok(Artifact::Image(path.clone()))
      }
    }
  }
}

impl InteractiveRenderer {
  pub fn new(output: InteractiveOutput) -> Self { InteractiveRenderer { chart: InteractiveChart::new(), output } }

  pub fn chart(&self) -> &InteractiveChart { &self.chart }
}

impl Renderer for InteractiveRenderer {
  fn name(&self) -> &'static str { "interactive" }

  fn render(&self, table: &CategoryTable) -> Result<Artifact> {
    let path = &self.output.path;
    self.chart.save(table, path)?;

    if self.output.open {
      let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
      if let Err(e) = webbrowser::open(&target.to_string_lossy()) {
        log::warn!("could not open {} in a browser: {e}", target.display());
      }
    }

    Ok(Artifact::Document(path.clone()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{aggregate, sample_table};

  #[test]
  fn static_and_interactive_agree() {
    let table = aggregate(&sample_table().unwrap()).unwrap();

    let bars = StaticRenderer::new(StaticOutput::Display).plot(&table).unwrap().bars();
    let figure = InteractiveRenderer::new(InteractiveOutput::default()).chart().figure(&table).unwrap();

    let labels = bars.iter().map(|b| b.label.as_str()).collect::<Vec<_>>();
    assert_eq!(labels, figure.categories());

    let values = bars.iter().map(|b| b.value as i64).collect::<Vec<_>>();
    assert_eq!(values, figure.totals());
  }

  #[test]
  fn rendering_models_is_repeatable() {
    let table = aggregate(&sample_table().unwrap()).unwrap();
    let before = table.frame().clone();
    let renderer = StaticRenderer::new(StaticOutput::Display);
    let chart = InteractiveChart::new();

    assert_eq!(renderer.plot(&table).unwrap().bars(), renderer.plot(&table).unwrap().bars());
    assert_eq!(chart.figure(&table).unwrap(), chart.figure(&table).unwrap());
    assert!(table.frame().equals(&before));
  }

  #[test]
  fn interactive_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charts").join("out.html");
    let table = aggregate(&sample_table().unwrap()).unwrap();

    let artifact = InteractiveRenderer::new(InteractiveOutput { path: path.clone(), open: false })
      .render(&table)
      .unwrap();

    assert_eq!(artifact, Artifact::Document(path.clone()));
    assert!(std::fs::read_to_string(&path).unwrap().contains("Plotly.newPlot"));
  }
}
