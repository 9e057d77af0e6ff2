use super::Figure;
use crate::Result;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders `figure` into a standalone page.
pub fn document(title: &str, figure: &Figure) -> Result<String> {
  // Keep "</script>" inside strings from closing the script element.
  let figure = serde_json::to_string(figure)?.replace("</", "<\\/");

  Ok(format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <script src="{PLOTLY_JS}" charset="utf-8"></script>
  <style>
    html, body {{ margin: 0; height: 100%; font-family: sans-serif; }}
    #chart {{ width: 100%; height: 100%; }}
  </style>
</head>
<body>
  <div id="chart"></div>
  <script>
    const figure = {figure};
    Plotly.newPlot("chart", figure.data, figure.layout, {{ responsive: true, displaylogo: false }});
  </script>
</body>
</html>
"#,
    title = escape(title),
  ))
}

fn escape(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    data::{aggregate, sample_table},
    interactive::InteractiveChart,
  };

  #[test]
  fn embeds_figure() {
    let table = aggregate(&sample_table().unwrap()).unwrap();
    let html = InteractiveChart::new().html(&table).unwrap();

    assert!(html.contains(PLOTLY_JS));
    assert!(html.contains("<title>Interactive Gender Distribution in Population</title>"));
    assert!(html.contains(r#""name":"Non-binary""#));
    assert!(html.contains("Plotly.newPlot"));
  }

  #[test]
  fn escapes_markup() {
    let table = aggregate(&sample_table().unwrap()).unwrap();
    let html = InteractiveChart::new().title("a </script> & b").html(&table).unwrap();

    assert!(html.contains("<title>a &lt;/script&gt; &amp; b</title>"));
    assert_eq!(html.matches("</script>").count(), 2);
  }
}
