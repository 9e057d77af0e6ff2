use peniko::Color;

use crate::theme::LINE_COLOR;

#[derive(Clone, Debug, Default)]
pub struct Axis {
  pub(crate) title:         Option<String>,
  pub(crate) tick_rotation: f64,
  pub(crate) grid:          Option<GridLines>,
  pub(crate) min:           Option<f64>,
  pub(crate) max:           Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLines {
  pub width: f64,
  pub color: Color,
  pub dash:  Option<Vec<f64>>,
}

impl Default for GridLines {
  fn default() -> Self { GridLines { width: 1.0, color: LINE_COLOR.with_alpha(0.7), dash: Some(vec![8.0, 5.0]) } }
}

impl Axis {
  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  /// Rotates tick labels counter-clockwise, in degrees.
  pub fn tick_rotation(&mut self, degrees: f64) -> &mut Self {
    self.tick_rotation = degrees;
    self
  }

  pub fn grid(&mut self, grid: GridLines) -> &mut Self {
    self.grid = Some(grid);
    self
  }

  pub fn min(&mut self, min: f64) -> &mut Self {
    self.min = Some(min);
    self
  }

  pub fn max(&mut self, max: f64) -> &mut Self {
    self.max = Some(max);
    self
  }
}
