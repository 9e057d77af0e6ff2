use color::{Srgb, parse_color};
use peniko::Color;

use crate::ResultExt;

pub const TEXT_COLOR: Color = Color::from_rgb8(32, 32, 32);
pub const LINE_COLOR: Color = Color::from_rgb8(128, 128, 128);
pub const BACKGROUND: Color = Color::WHITE;

/// A categorical palette, cycled when there are more categories than colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
  colors: &'static [&'static str],
}

/// seaborn's `Set2`.
pub const SET2: Palette =
  Palette::new(&["#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3"]);

/// Plotly's default qualitative sequence.
pub const PLOTLY: Palette = Palette::new(&[
  "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880", "#ff97ff", "#fecb52",
]);

impl Palette {
  pub const fn new(colors: &'static [&'static str]) -> Self { Palette { colors } }

  pub fn hex(&self, index: usize) -> &'static str { self.colors[index % self.colors.len()] }

  pub fn color(&self, index: usize) -> Color {
    parse_color(self.hex(index)).map(|c| c.to_alpha_color::<Srgb>()).log_err().unwrap_or(TEXT_COLOR)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn palette_cycles() {
    assert_eq!(SET2.hex(0), SET2.hex(8));
    assert_ne!(PLOTLY.hex(0), PLOTLY.hex(1));
  }

  #[test]
  fn hex_colors_parse() {
    let color = SET2.color(0).to_rgba8();
    assert_eq!((color.r, color.g, color.b, color.a), (0x66, 0xc2, 0xa5, 0xff));
  }
}
