//! SVG line chart of one flow's jitter series.
//!
//! Hand-written SVG, no plotting dependency:
//! - Sequence number on the x axis, jitter on the y axis
//! - Red polyline through the samples in sequence order
//! - Optional zoom to a fixed y range around zero

use crate::aggregator::JitterStat;
use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, ZOOM_Y_RANGE};
use crate::utils::error::ChartError;
use log::{debug, info};

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: usize = 5;
const SERIES_COLOR: &str = "rgb(255, 0, 0)";
const AXIS_COLOR: &str = "rgb(64, 64, 64)";
const GRID_COLOR: &str = "rgb(220, 220, 220)";

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Title override. Defaults to the flow key.
    pub title: Option<String>,
    pub width: usize,
    pub height: usize,
    /// Fix the y axis to [-0.5, 0.5]
    pub zoom: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            zoom: false,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_zoom(mut self, zoom: bool) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Closed interval mapped onto one pixel axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Smallest range covering all values, widened when degenerate
    fn covering(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min == max {
            Self {
                min: min - 1.0,
                max: max + 1.0,
            }
        } else {
            Self { min, max }
        }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` as a fraction of the range, clamped to [0, 1]
    fn fraction(&self, value: f64) -> f64 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }

    fn tick(&self, i: usize) -> f64 {
        self.min + self.span() * i as f64 / TICKS as f64
    }
}

/// Generate an SVG chart for one flow
///
/// **Public** - main entry point for chart rendering
///
/// # Errors
/// * `ChartError::EmptySeries` - the flow has no finite jitter samples
pub fn generate_jitter_chart(stat: &JitterStat, config: &ChartConfig) -> Result<String, ChartError> {
    let (xs, ys) = stat.series();
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter(|(_, y)| y.is_finite())
        .collect();

    if points.is_empty() {
        return Err(ChartError::EmptySeries {
            key: stat.key().to_string(),
        });
    }

    debug!("Rendering jitter chart for {} ({} points)", stat.key(), points.len());

    let width = config.width as f64;
    let height = config.height as f64;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;

    let x_range = Range::covering(points.iter().map(|p| p.0));
    let y_range = if config.zoom {
        Range {
            min: ZOOM_Y_RANGE.0,
            max: ZOOM_Y_RANGE.1,
        }
    } else {
        Range::covering(points.iter().map(|p| p.1))
    };

    let to_px = |x: f64, y: f64| {
        (
            MARGIN_LEFT + x_range.fraction(x) * plot_w,
            MARGIN_TOP + (1.0 - y_range.fraction(y)) * plot_h,
        )
    };

    let mut svg = String::new();

    // Header
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    ));
    svg.push_str(r#"<style>.label { font: 11px sans-serif; } .axis { font: 13px sans-serif; }</style>"#);
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

    // Title
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| format!("Jitter {}", stat.key()));
    svg.push_str(&format!(
        r#"<text x="{}" y="24" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        escape_xml(&title)
    ));

    render_grid(&mut svg, x_range, y_range, plot_w, plot_h);
    render_axes(&mut svg, plot_w, plot_h);

    // Series
    let polyline: Vec<String> = points
        .iter()
        .map(|&(x, y)| {
            let (px, py) = to_px(x, y);
            format!("{:.2},{:.2}", px, py)
        })
        .collect();
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        SERIES_COLOR,
        polyline.join(" ")
    ));

    svg.push_str("</svg>");

    info!("Jitter chart generated for {} ({} bytes)", stat.key(), svg.len());
    Ok(svg)
}

fn render_grid(out: &mut String, x_range: Range, y_range: Range, plot_w: f64, plot_h: f64) {
    let bottom = MARGIN_TOP + plot_h;

    for i in 0..=TICKS {
        let frac = i as f64 / TICKS as f64;

        // Vertical line + sequence label
        let x = MARGIN_LEFT + frac * plot_w;
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
            x, MARGIN_TOP, x, bottom, GRID_COLOR
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>"#,
            x,
            bottom + 16.0,
            format_tick(x_range.tick(i))
        ));

        // Horizontal line + jitter label
        let y = bottom - frac * plot_h;
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_w,
            y,
            GRID_COLOR
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" class="label" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(y_range.tick(i))
        ));
    }
}

fn render_axes(out: &mut String, plot_w: f64, plot_h: f64) {
    let bottom = MARGIN_TOP + plot_h;

    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
        MARGIN_LEFT,
        bottom,
        MARGIN_LEFT + plot_w,
        bottom,
        AXIS_COLOR
    ));
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, bottom, AXIS_COLOR
    ));

    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" class="axis" text-anchor="middle">Sequence</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        bottom + 38.0
    ));
    let y_mid = MARGIN_TOP + plot_h / 2.0;
    out.push_str(&format!(
        r#"<text x="16" y="{:.2}" class="axis" text-anchor="middle" transform="rotate(-90 16 {:.2})">Jitter</text>"#,
        y_mid, y_mid
    ));
}

/// Compact numeric label for tick marks
fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{compute_jitter, FlowKey};
    use crate::parser::parse_trace;

    fn sample_stat() -> JitterStat {
        let records = parse_trace([
            "r 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100",
            "r 2.0 0 1 tcp 1000 - 7 0.0 1.0 2 101",
            "r 2.2 0 1 tcp 1000 - 7 0.0 1.0 3 102",
        ])
        .unwrap();
        compute_jitter(&records)
            .remove(&FlowKey::new(0, 1, "tcp"))
            .unwrap()
    }

    #[test]
    fn test_chart_structure() {
        let svg = generate_jitter_chart(&sample_stat(), &ChartConfig::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Jitter 0:1:tcp"));
        assert!(svg.contains(">Sequence</text>"));
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn test_custom_title_escaped() {
        let config = ChartConfig::new().with_title("a < b");
        let svg = generate_jitter_chart(&sample_stat(), &config).unwrap();
        assert!(svg.contains("a &lt; b"));
    }

    #[test]
    fn test_zoom_uses_fixed_range() {
        let config = ChartConfig::new().with_zoom(true);
        let svg = generate_jitter_chart(&sample_stat(), &config).unwrap();
        assert!(svg.contains(">-0.500</text>"));
        assert!(svg.contains(">0.500</text>"));
    }

    #[test]
    fn test_flow_without_samples() {
        // A negative first sequence number never produces a sample
        let records = parse_trace(["r 1.0 4 5 udp 64 - 1 4.0 5.0 -1 9"]).unwrap();
        let flows = compute_jitter(&records);
        let stat = &flows[&FlowKey::new(4, 5, "udp")];
        assert!(stat.is_empty());

        let err = generate_jitter_chart(stat, &ChartConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries { ref key } if key == "4:5:udp"));
    }

    #[test]
    fn test_range_degenerate_widened() {
        let range = Range::covering([3.0, 3.0].into_iter());
        assert_eq!(range, Range { min: 2.0, max: 4.0 });
        assert_eq!(range.fraction(10.0), 1.0);
        assert_eq!(range.fraction(0.0), 0.0);
    }
}
