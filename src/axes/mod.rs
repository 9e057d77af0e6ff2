mod bar_chart;

pub use bar_chart::{Annotation, Bar, BarChartAxes, BarOptions, Estimator};

use crate::{Plot, Result, data::CategoryTable};

impl Plot {
  /// Adds a bar chart of `table`, replacing any previous one.
  pub fn bar_chart(&mut self, table: &CategoryTable) -> Result<&mut BarChartAxes> {
    Ok(self.axes.insert(BarChartAxes::new(table.groups()?)))
  }
}
