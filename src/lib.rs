//! Percentage-share bar charts of categorical counts.
//!
//! A [`CategoryTable`] is loaded from CSV (or taken from the built-in sample), [`aggregate`]d into
//! percentage shares, and handed to one or more [`Renderer`]s: a static chart drawn with vello, and an
//! interactive plotly.js document.

use kurbo::{Affine, Cap, Line, Point, Size, Stroke};
use parley::FontWeight;

use crate::{
  render::{Align, DrawText, Render},
  theme::{LINE_COLOR, TEXT_COLOR},
};

mod axes;
mod axis;
mod bounds;
mod error;
mod render;

pub mod config;
pub mod data;
pub mod interactive;
pub mod pipeline;
pub mod renderer;
pub mod theme;

pub use axes::{Annotation, Bar, BarChartAxes, BarOptions, Estimator};
pub use axis::{Axis, GridLines};
pub use bounds::{Bounds, DataBounds, DataRange, NiceTicksIter, Range};
pub use config::{Config, DataSource, InteractiveOutput, StaticOutput};
pub use data::{CategoryRecord, CategoryTable, ColumnNames, aggregate, load_data, sample_table};
pub use error::{Error, Result, ResultExt};
pub use renderer::{Artifact, InteractiveRenderer, Renderer, StaticRenderer};

pub struct Plot {
  title:  Option<String>,
  pub x:  Axis,
  pub y:  Axis,
  width:  u32,
  height: u32,

  axes: Option<BarChartAxes>,
}

const MARGIN_LEFT: f64 = 110.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 90.0;
const MARGIN_BOTTOM: f64 = 180.0;

impl Default for Plot {
  fn default() -> Self {
    Plot { title: None, x: Axis::default(), y: Axis::default(), width: 1500, height: 900, axes: None }
  }
}

impl Plot {
  pub fn new() -> Plot { Plot::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  /// Canvas size in pixels used by [`Plot::save`].
  pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
    self.width = width.max(1);
    self.height = height.max(1);
    self
  }

  /// The bars as they will be drawn, left to right.
  pub fn bars(&self) -> Vec<Bar> { self.axes.as_ref().map(BarChartAxes::bars).unwrap_or_default() }

  /// Where data coordinates land on a canvas of `size`.
  pub fn layout(&self, size: Size) -> (Bounds, Bounds) {
    let viewport = Bounds::new(
      Range::new(MARGIN_LEFT, (size.width - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0)),
      Range::new((size.height - MARGIN_BOTTOM).max(MARGIN_TOP + 1.0), MARGIN_TOP),
    );

    let mut data = match &self.axes {
      Some(axes) => axes.data_bounds().resolve(),
      None => Bounds::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
    };
    if let Some(min) = self.y.min {
      data.y.min = min;
    }
    if let Some(max) = self.y.max {
      data.y.max = max;
    }

    (data, viewport)
  }

  pub(crate) fn draw(&self, render: &mut Render, size: Size) {
    let (data_bounds, viewport) = self.layout(size);
    let transform = data_bounds.transform_to(viewport);
    let border_stroke = Stroke::new(2.0);

    if let Some(title) = &self.title {
      render.draw_text(DrawText {
        text: title,
        size: 32.0,
        weight: FontWeight::BOLD,
        brush: TEXT_COLOR.into(),
        position: Point::new(viewport.x.min + viewport.width() / 2.0, MARGIN_TOP / 2.0),
        horizontal_align: Align::Center,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    if let Some(x_label) = &self.x.title {
      render.draw_text(DrawText {
        text: x_label,
        size: 24.0,
        position: Point::new(viewport.x.min + viewport.width() / 2.0, size.height - 20.0),
        brush: TEXT_COLOR.into(),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    if let Some(y_label) = &self.y.title {
      render.draw_text(DrawText {
        text: y_label,
        size: 24.0,
        position: Point::new(30.0, (viewport.y.min + viewport.y.max) / 2.0),
        brush: TEXT_COLOR.into(),
        transform: Affine::rotate(-std::f64::consts::FRAC_PI_2),
        horizontal_align: Align::Center,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    let ticks = data_bounds.y.nice_ticks(10);
    let decimals = ticks.decimals();
    for (y, vy) in ticks
      .map(|v| (v, (transform * Point::new(0.0, v)).y))
      .filter(|(_, vy)| viewport.y.contains(vy))
    {
      if let Some(grid) = &self.y.grid {
        render.stroke(
          &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.max, vy)),
          Affine::IDENTITY,
          grid.color,
          &grid.stroke(),
        );
      }

      render.stroke(
        &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.min - 10.0, vy)),
        Affine::IDENTITY,
        LINE_COLOR,
        &border_stroke.clone().with_start_cap(Cap::Butt),
      );
      render.draw_text(DrawText {
        text: &format!("{y:.decimals$}"),
        size: 18.0,
        position: Point::new(viewport.x.min - 15.0, vy),
        brush: TEXT_COLOR.into(),
        horizontal_align: Align::End,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    if let Some(axes) = &self.axes {
      let rotation = self.x.tick_rotation.to_radians();
      let (horizontal_align, vertical_align) =
        if rotation == 0.0 { (Align::Center, Align::Start) } else { (Align::End, Align::Start) };

      for (i, label) in axes.labels().enumerate() {
        let vx = (transform * Point::new(i as f64, 0.0)).x;

        if let Some(grid) = &self.x.grid {
          render.stroke(
            &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.max)),
            Affine::IDENTITY,
            grid.color,
            &grid.stroke(),
          );
        }

        render.stroke(
          &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 10.0)),
          Affine::IDENTITY,
          LINE_COLOR,
          &border_stroke.clone().with_start_cap(Cap::Butt),
        );
        render.draw_text(DrawText {
          text: label,
          size: 18.0,
          position: Point::new(vx, viewport.y.min + 15.0),
          brush: TEXT_COLOR.into(),
          transform: Affine::rotate(-rotation),
          horizontal_align,
          vertical_align,
          ..Default::default()
        });
      }

      log::debug!("drawing {} bars into {}x{}", axes.bars().len(), size.width, size.height);
      axes.draw(render, transform);
    }

    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.max, viewport.y.min),
      ),
      Affine::IDENTITY,
      LINE_COLOR,
      &border_stroke,
    );
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.min, viewport.y.max),
      ),
      Affine::IDENTITY,
      LINE_COLOR,
      &border_stroke,
    );
  }
}

impl GridLines {
  fn stroke(&self) -> Stroke {
    let stroke = Stroke::new(self.width);
    match &self.dash {
      Some(dash) => stroke.with_dashes(0.0, dash.iter().copied()),
      None => stroke,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn layout_flips_y() {
    let plot = Plot::new();
    let (_, viewport) = plot.layout(Size::new(1500.0, 900.0));

    assert_eq!(viewport.x, Range::new(MARGIN_LEFT, 1500.0 - MARGIN_RIGHT));
    assert!(viewport.y.min > viewport.y.max);
  }

  #[test]
  fn y_overrides() {
    let mut plot = Plot::new();
    plot.y.min(-10.0).max(500.0);

    let (data, _) = plot.layout(Size::new(800.0, 600.0));
    assert_eq!(data.y, Range::new(-10.0, 500.0));
  }

  #[test]
  fn no_bars_without_axes() {
    assert!(Plot::new().bars().is_empty());
  }
}
