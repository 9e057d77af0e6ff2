use kurbo::Affine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataBounds {
  pub x: DataRange,
  pub y: DataRange,
}

/// The extent of the data along one axis, before margins are applied.
#[derive(Clone, Debug, PartialEq)]
pub enum DataRange {
  Continuous { range: Range, margin_min: bool, margin_max: bool },
  /// One slot per category, centered on `0..count`.
  Categorical(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

const MARGIN: f64 = 0.05;

impl From<Range> for DataRange {
  fn from(range: Range) -> Self { DataRange::Continuous { range, margin_min: true, margin_max: true } }
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub fn width(&self) -> f64 { self.x.size() }

  /// Maps data coordinates onto `viewport`.
  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl DataBounds {
  pub fn resolve(&self) -> Bounds { Bounds::new(self.x.resolve(), self.y.resolve()) }
}

impl DataRange {
  pub fn resolve(&self) -> Range {
    match *self {
      DataRange::Continuous { range, margin_min, margin_max } => {
        let pad = range.size() * MARGIN;
        Range::new(
          if margin_min { range.min - pad } else { range.min },
          if margin_max { range.max + pad } else { range.max },
        )
      }
      DataRange::Categorical(count) => Range::new(-0.5, count.max(1) as f64 - 0.5),
    }
  }
}

impl Default for Range {
  fn default() -> Self { Range::empty() }
}

impl Range {
  pub const fn empty() -> Self { Range { min: 0.0, max: 0.0 } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  /// Ticks at a 1, 2, 2.5 or 5 multiple of a power of ten, about `count` of them.
  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    if self.size() == 0.0 || !self.size().is_finite() {
      return NiceTicksIter::new(self.min, self.min, 1.0, 0);
    }

    let step = self.size().abs() / f64::from(count);
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min.min(self.max) / step).floor() * step;
    let hi = (self.min.max(self.max) / step).ceil() * step;

    // 2.5 steps need one more digit than their power of ten.
    let decimals = (-k as i32 + i32::from(nice_base == 2.5)).max(0) as usize;
    NiceTicksIter::new(lo, hi, step, decimals)
  }
}

pub struct NiceTicksIter {
  current:  f64,
  step:     f64,
  hi:       f64,
  decimals: usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, decimals: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, decimals }
  }

  /// Number of decimals needed to print every tick exactly.
  pub fn decimals(&self) -> usize { self.decimals }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.decimals as i32 + 4);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use kurbo::Point;

  use super::*;

  #[test]
  fn nice_ticks_cover_range() {
    let ticks = Range::new(0.0, 168.0).nice_ticks(10).collect::<Vec<_>>();
    assert_eq!(ticks.first(), Some(&0.0));
    assert!(*ticks.last().unwrap() >= 168.0);

    let step = ticks[1] - ticks[0];
    assert_eq!(step, 20.0);
  }

  #[test]
  fn nice_ticks_decimals() {
    assert_eq!(Range::new(0.0, 1000.0).nice_ticks(10).decimals(), 0);
    assert_eq!(Range::new(0.0, 1.0).nice_ticks(10).decimals(), 1);
    assert_eq!(Range::new(0.0, 0.22).nice_ticks(10).decimals(), 3);

    let ticks = Range::new(0.0, 0.22).nice_ticks(10).collect::<Vec<_>>();
    assert_eq!(&ticks[..3], [0.0, 0.025, 0.05]);
  }

  #[test]
  fn empty_range_has_one_tick() {
    assert_eq!(Range::new(3.0, 3.0).nice_ticks(10).count(), 1);
  }

  #[test]
  fn categorical_range() {
    assert_eq!(DataRange::Categorical(4).resolve(), Range::new(-0.5, 3.5));
  }

  #[test]
  fn continuous_margins() {
    let range = DataRange::Continuous { range: Range::new(0.0, 100.0), margin_min: false, margin_max: true };
    assert_eq!(range.resolve(), Range::new(0.0, 105.0));
  }

  #[test]
  fn transform_maps_corners() {
    let data = Bounds::new(Range::new(0.0, 10.0), Range::new(0.0, 100.0));
    let viewport = Bounds::new(Range::new(50.0, 550.0), Range::new(400.0, 0.0));
    let transform = data.transform_to(viewport);

    assert_eq!(transform * Point::new(0.0, 0.0), Point::new(50.0, 400.0));
    assert_eq!(transform * Point::new(10.0, 100.0), Point::new(550.0, 0.0));
  }
}
