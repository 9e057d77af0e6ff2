use kurbo::{Affine, Point, Rect, Vec2};
use parley::FontWeight;
use peniko::Color;

use crate::{
  Range,
  bounds::{DataBounds, DataRange},
  data::CategoryGroup,
  render::{Align, DrawText, Render},
  theme::{Palette, SET2, TEXT_COLOR},
};

/// How repeated labels collapse into one bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Estimator {
  #[default]
  Sum,
  Mean,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
  pub label: String,
  pub value: f64,
  pub color: Color,
}

pub struct BarChartAxes {
  groups:  Vec<CategoryGroup>,
  options: BarOptions,
}

pub struct BarOptions {
  /// Bar width as a fraction of one category slot.
  pub width:     f64,
  pub estimator: Estimator,
  pub palette:   Palette,
  pub annotate:  Option<Annotation>,
}

/// Value labels printed above each bar.
pub struct Annotation {
  pub decimals: usize,
  pub size:     f32,
  pub offset:   f64,
}

impl Default for BarOptions {
  fn default() -> Self {
    BarOptions {
      width:     0.8,
      estimator: Estimator::Sum,
      palette:   SET2,
      annotate:  Some(Annotation::default()),
    }
  }
}

impl Default for Annotation {
  fn default() -> Self { Annotation { decimals: 1, size: 18.0, offset: 5.0 } }
}

impl Estimator {
  pub fn apply(&self, group: &CategoryGroup) -> f64 {
    match self {
      Estimator::Sum => group.total() as f64,
      Estimator::Mean => group.mean(),
    }
  }
}

impl BarChartAxes {
  pub(crate) fn new(groups: Vec<CategoryGroup>) -> Self { BarChartAxes { groups, options: BarOptions::default() } }

  pub fn estimator(&mut self, estimator: Estimator) -> &mut Self {
    self.options.estimator = estimator;
    self
  }

  /// One bar per label, in order of first appearance.
  pub fn bars(&self) -> Vec<Bar> {
    self
      .groups
      .iter()
      .enumerate()
      .map(|(i, group)| Bar {
        label: group.label.clone(),
        value: self.options.estimator.apply(group),
        color: self.options.palette.color(i),
      })
      .collect()
  }

  pub(crate) fn labels(&self) -> impl Iterator<Item = &str> { self.groups.iter().map(|g| g.label.as_str()) }

  pub(crate) fn data_bounds(&self) -> DataBounds {
    let max = self.bars().iter().map(|b| b.value).fold(0.0, f64::max);

    DataBounds {
      x: DataRange::Categorical(self.groups.len()),
      y: DataRange::Continuous { range: Range::new(0.0, max), margin_min: false, margin_max: true },
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let half = self.options.width / 2.0;

    for (x, bar) in self.bars().iter().enumerate() {
      let x = x as f64;
      let rect = Rect::from_points(transform * Point::new(x - half, 0.0), transform * Point::new(x + half, bar.value));
      render.fill(&rect, Affine::IDENTITY, bar.color);
    }

    if let Some(annotation) = &self.options.annotate {
      for (x, bar) in self.bars().iter().enumerate() {
        let top = transform * Point::new(x as f64, bar.value);

        render.draw_text(DrawText {
          text: &format!("{:.*}", annotation.decimals, bar.value),
          size: annotation.size,
          weight: FontWeight::BOLD,
          brush: TEXT_COLOR.into(),
          position: top - Vec2::new(0.0, annotation.offset),
          horizontal_align: Align::Center,
          vertical_align: Align::End,
          ..Default::default()
        });
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::sample_table;

  fn sample_axes() -> BarChartAxes { BarChartAxes::new(sample_table().unwrap().groups().unwrap()) }

  #[test]
  fn sum_bars() {
    let bars = sample_axes().bars();

    let values = bars.iter().map(|b| b.value).collect::<Vec<_>>();
    assert_eq!(values, [160.0, 150.0, 12.0, 9.0]);
  }

  #[test]
  fn mean_bars() {
    let mut axes = sample_axes();
    axes.estimator(Estimator::Mean);

    let values = axes.bars().iter().map(|b| b.value).collect::<Vec<_>>();
    assert!((values[0] - 53.333).abs() < 1e-3);
    assert_eq!(&values[1..], [50.0, 6.0, 4.5]);
  }

  #[test]
  fn each_category_gets_a_color() {
    let bars = sample_axes().bars();
    for (i, a) in bars.iter().enumerate() {
      for b in &bars[i + 1..] {
        assert_ne!(a.color, b.color);
      }
    }
  }

  #[test]
  fn bounds_start_at_zero() {
    let bounds = sample_axes().data_bounds().resolve();
    assert_eq!(bounds.y.min, 0.0);
    assert!(bounds.y.max > 160.0);
    assert_eq!(bounds.x, Range::new(-0.5, 3.5));
  }
}
