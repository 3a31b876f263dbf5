//! Comparison chart description
//!
//! A `ChartSpec` holds everything the backend needs to draw: the two series
//! in fixed order, their legend entries, axis labels and ranges. Building it
//! is pure so the plotted content can be checked without rendering.

use crate::config::PlotConfig;
use crate::timing::TimingTable;
use std::ops::Range;

/// Marker drawn for every point (and its legend entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
}

impl MarkerShape {
    /// Parse from string value
    ///
    /// Validation happens in PropertyReader.get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "square" => Self::Square,
            "triangle" => Self::Triangle,
            "cross" => Self::Cross,
            _ => Self::Circle,
        }
    }
}

/// One named, consistently styled set of points
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: [u8; 3],
    pub points: Vec<(f64, f64)>,
}

/// One row of the legend box
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: [u8; 3],
    pub shape: MarkerShape,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Draw axis lines around the plot area
    pub frame: bool,
    pub marker: MarkerShape,
    pub marker_size: f64,
    /// Drawn in order; later series are painted over earlier ones
    pub series: Vec<Series>,
    /// Top-left corner of the legend box in data coordinates
    ///
    /// The renderer keeps the box inside the plotting area, so an anchor
    /// outside the axis ranges still yields a visible legend.
    pub legend_anchor: (f64, f64),
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

impl ChartSpec {
    /// Overlay the unscaled no-memo series and the rescaled memo series
    ///
    /// `memo` must already be in seconds; this only arranges the data.
    /// Axis ranges follow the data only; the legend anchor does not widen them.
    pub fn comparison(no_memo: &TimingTable, memo: &TimingTable, config: &PlotConfig) -> Self {
        let series = vec![
            Series {
                label: config.no_memo.label.clone(),
                color: config.no_memo.color,
                points: no_memo.points(),
            },
            Series {
                label: config.memo.label.clone(),
                color: config.memo.color,
                points: memo.points(),
            },
        ];

        let all_points = || series.iter().flat_map(|s| s.points.iter().copied());
        let x_range = padded_range(all_points().map(|(x, _)| x));
        let y_range = padded_range(all_points().map(|(_, y)| y));

        Self {
            width: config.plot_width,
            height: config.plot_height,
            title: config.plot_title.clone(),
            x_label: config.x_axis_label.clone(),
            y_label: config.y_axis_label.clone(),
            frame: config.frame,
            marker: config.to_marker_shape(),
            marker_size: config.point_size,
            series,
            legend_anchor: config.legend_position,
            x_range,
            y_range,
        }
    }

    /// Total number of plotted points across all series
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Legend rows, one per series in drawing order
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.series
            .iter()
            .map(|s| LegendEntry {
                label: s.label.clone(),
                color: s.color,
                shape: self.marker,
            })
            .collect()
    }
}

/// Range spanning `values` with 5% padding on each side
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }

    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else if lo != 0.0 {
        lo.abs() * 0.05
    } else {
        1.0
    };
    (lo - pad)..(hi + pad)
}
