//! Interactive charts, written as standalone HTML documents driven by plotly.js.
//!
//! Each category becomes one bar trace, so every label keeps its own color. Repeated labels stack, which
//! makes the height of a bar the summed count of its category.

mod html;

use std::path::Path;

use serde::Serialize;

use crate::{
  Error, Result,
  data::{CategoryTable, PERCENTAGE},
  theme::{PLOTLY, Palette},
};

pub use html::document;

pub struct InteractiveChart {
  title:    String,
  x_title:  String,
  y_title:  String,
  palette:  Palette,
  outline:  Outline,
  decimals: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
  pub width: f64,
  pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
  pub data:   Vec<BarTrace>,
  pub layout: Layout,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarTrace {
  #[serde(rename = "type")]
  pub kind:          &'static str,
  pub name:          String,
  pub x:             Vec<String>,
  pub y:             Vec<i64>,
  pub text:          Vec<f64>,
  pub texttemplate:  String,
  pub textposition:  &'static str,
  pub hovertemplate: String,
  pub marker:        Marker,
  pub showlegend:    bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
  pub color: String,
  pub line:  MarkerLine,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerLine {
  pub width: f64,
  pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
  pub title:      Title,
  pub xaxis:      AxisLayout,
  pub yaxis:      AxisLayout,
  pub showlegend: bool,
  pub barmode:    &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Title {
  pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisLayout {
  pub title: Title,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub categoryorder: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub categoryarray: Option<Vec<String>>,
}

impl Default for Outline {
  fn default() -> Self { Outline { width: 2.0, color: "black".to_string() } }
}

impl Default for InteractiveChart {
  fn default() -> Self {
    InteractiveChart {
      title:    "Interactive Gender Distribution in Population".to_string(),
      x_title:  "Gender Categories".to_string(),
      y_title:  "Population Count".to_string(),
      palette:  PLOTLY,
      outline:  Outline::default(),
      decimals: 2,
    }
  }
}

impl InteractiveChart {
  pub fn new() -> Self { InteractiveChart::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = title.to_string();
    self
  }

  /// Builds the plotly figure for an aggregated table.
  pub fn figure(&self, table: &CategoryTable) -> Result<Figure> {
    if !table.is_aggregated() {
      return Err(Error::MissingColumn(PERCENTAGE.to_string()));
    }

    let groups = table.groups()?;
    let texttemplate = format!("%{{text:.{}f}}%", self.decimals);
    let hovertemplate = format!(
      "%{{x}}<br>{}: %{{y}}<br>Share: %{{text:.{}f}}%<extra></extra>",
      self.y_title, self.decimals
    );

    let data = groups
      .iter()
      .enumerate()
      .map(|(i, group)| BarTrace {
        kind:          "bar",
        name:          group.label.clone(),
        x:             group.records.iter().map(|r| r.label.clone()).collect(),
        y:             group.records.iter().map(|r| r.count).collect(),
        text:          group.records.iter().map(|r| r.percentage.unwrap_or(f64::NAN)).collect(),
        texttemplate:  texttemplate.clone(),
        textposition:  "outside",
        hovertemplate: hovertemplate.clone(),
        marker:        Marker {
          color: self.palette.hex(i).to_string(),
          line:  MarkerLine { width: self.outline.width, color: self.outline.color.clone() },
        },
        showlegend:    false,
      })
      .collect();

    Ok(Figure {
      data,
      layout: Layout {
        title:      Title { text: self.title.clone() },
        xaxis:      AxisLayout {
          title:         Title { text: self.x_title.clone() },
          categoryorder: Some("array"),
          categoryarray: Some(groups.iter().map(|g| g.label.clone()).collect()),
        },
        yaxis:      AxisLayout {
          title:         Title { text: self.y_title.clone() },
          categoryorder: None,
          categoryarray: None,
        },
        showlegend: false,
        barmode:    "relative",
      },
    })
  }

  pub fn html(&self, table: &CategoryTable) -> Result<String> { document(&self.title, &self.figure(table)?) }

  pub fn save(&self, table: &CategoryTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, self.html(table)?)?;

    log::info!("wrote interactive chart to {}", path.display());
    Ok(())
  }
}

impl Figure {
  /// Category names in axis order.
  pub fn categories(&self) -> Vec<&str> { self.data.iter().map(|t| t.name.as_str()).collect() }

  /// Height of each stacked bar, in axis order.
  pub fn totals(&self) -> Vec<i64> { self.data.iter().map(|t| t.y.iter().sum()).collect() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{aggregate, sample_table};

  fn sample_figure() -> Figure {
    let table = aggregate(&sample_table().unwrap()).unwrap();
    InteractiveChart::new().figure(&table).unwrap()
  }

  #[test]
  fn one_trace_per_category() {
    let figure = sample_figure();

    assert_eq!(figure.categories(), ["Male", "Female", "Non-binary", "Other"]);
    assert_eq!(figure.totals(), [160, 150, 12, 9]);
    assert_eq!(figure.data[0].y, [45, 60, 55]);
  }

  #[test]
  fn styling() {
    let figure = sample_figure();

    let colors = figure.data.iter().map(|t| t.marker.color.as_str()).collect::<Vec<_>>();
    assert_eq!(colors, ["#636efa", "#ef553b", "#00cc96", "#ab63fa"]);
    assert!(figure.data.iter().all(|t| t.marker.line.width == 2.0 && t.textposition == "outside"));
    assert_eq!(figure.data[0].texttemplate, "%{text:.2f}%");
    assert!(!figure.layout.showlegend);
  }

  #[test]
  fn text_is_percentage() {
    let figure = sample_figure();
    assert!((figure.data[0].text[0] - 13.595).abs() < 1e-3);
    assert!((figure.data[3].text[0] - 0.906).abs() < 1e-3);
  }

  #[test]
  fn requires_aggregated_table() {
    let result = InteractiveChart::new().figure(&sample_table().unwrap());
    assert!(matches!(result, Err(Error::MissingColumn(name)) if name == PERCENTAGE));
  }

  #[test]
  fn serializes_plotly_keys() {
    let value = serde_json::to_value(sample_figure()).unwrap();

    assert_eq!(value["data"][0]["type"], "bar");
    assert_eq!(value["layout"]["barmode"], "relative");
    assert_eq!(value["layout"]["xaxis"]["title"]["text"], "Gender Categories");
    assert!(value["layout"]["yaxis"].get("categoryarray").is_none());
  }
}
