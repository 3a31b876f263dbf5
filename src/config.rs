//! Plot configuration from plot properties
//!
//! Configuration is loaded from properties declared in plot.json. All
//! default values come from plot.json; this module only converts and
//! validates them.

use crate::render::{MarkerShape, OutputFormat};
use crate::timing::properties::registry;
use crate::timing::{parse_color, ConfigError, PropertyReader};
use std::path::PathBuf;

/// Label and color of one plotted series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub color: [u8; 3],
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Timings without memoization, `time` already in seconds
    pub no_memo_path: PathBuf,

    /// Timings with memoization, `time` in a smaller unit
    pub memo_path: PathBuf,

    /// Divisor bringing the memoized `time` column to seconds
    pub memo_time_divisor: f64,

    /// Where the chart is written (None = output disabled)
    pub output_path: Option<PathBuf>,

    /// "auto", "svg" or "png"
    pub output_format: String,

    /// Plot width in pixels
    pub plot_width: u32,

    /// Plot height in pixels
    pub plot_height: u32,

    pub plot_title: Option<String>,

    /// Draw axis lines around the plot area
    pub frame: bool,

    /// Marker size in pixels, shared by both series
    pub point_size: f64,

    /// "circle", "square", "triangle" or "cross"
    pub point_shape: String,

    pub no_memo: SeriesStyle,

    pub memo: SeriesStyle,

    pub x_axis_label: String,

    pub y_axis_label: String,

    /// Top-left corner of the legend box in data coordinates
    pub legend_position: (f64, f64),
}

impl PlotConfig {
    /// Create config from plot properties
    ///
    /// Invalid user values fall back to the plot.json defaults with a
    /// warning. The only hard error is a divisor that would make the
    /// memoized series meaningless (zero, NaN or infinite).
    pub fn from_properties(props: &PropertyReader) -> Result<Self, ConfigError> {
        let memo_time_divisor = props.get_f64("memo.time.divisor");
        if !memo_time_divisor.is_finite() || memo_time_divisor == 0.0 {
            return Err(ConfigError::InvalidDivisor(memo_time_divisor));
        }

        let output_path = props
            .get_optional_string("output.path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let legend_position = props
            .get_point("legend.position")
            .unwrap_or_else(default_legend_position);

        Ok(Self {
            no_memo_path: PathBuf::from(props.get_string("input.no_memo")),
            memo_path: PathBuf::from(props.get_string("input.memo")),
            memo_time_divisor,
            output_path,
            output_format: props.get_enum("output.format"),
            plot_width: props.get_i32_in_range("plot.width", 100, 10000) as u32,
            plot_height: props.get_i32_in_range("plot.height", 100, 10000) as u32,
            plot_title: props.get_optional_string("plot.title"),
            frame: props.get_bool("plot.frame"),
            point_size: props.get_f64_in_range("point.size", 0.5, 100.0),
            point_shape: props.get_enum("point.shape"),
            no_memo: series_style(props, "series.no_memo"),
            memo: series_style(props, "series.memo"),
            x_axis_label: props.get_string("axis.x.label"),
            y_axis_label: props.get_string("axis.y.label"),
            legend_position,
        })
    }

    /// Config with every property at its plot.json default
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_properties(&PropertyReader::new())
    }

    /// Convert point.shape to the renderer's marker
    pub fn to_marker_shape(&self) -> MarkerShape {
        MarkerShape::parse(&self.point_shape)
    }

    /// Resolve output.format, looking at the file extension for "auto"
    pub fn to_output_format(&self) -> OutputFormat {
        match self.output_format.as_str() {
            "png" => OutputFormat::Png,
            "svg" => OutputFormat::Svg,
            _ => self
                .output_path
                .as_deref()
                .map(OutputFormat::from_path)
                .unwrap_or(OutputFormat::Svg),
        }
    }
}

/// Read `<prefix>.label` and `<prefix>.color`
fn series_style(props: &PropertyReader, prefix: &str) -> SeriesStyle {
    let color_prop = format!("{prefix}.color");
    let value = props.get_string(&color_prop);

    let color = parse_color(&value).unwrap_or_else(|| {
        let default = registry().get_default(&color_prop).unwrap_or("");
        tracing::warn!(
            "Invalid color '{}' for property '{}'. Using default: '{}'",
            value,
            color_prop,
            default
        );
        parse_color(default).unwrap_or([128, 128, 128]) // Gray fallback
    });

    SeriesStyle {
        label: props.get_string(&format!("{prefix}.label")),
        color,
    }
}

fn default_legend_position() -> (f64, f64) {
    registry()
        .get_default("legend.position")
        .and_then(|s| {
            let (x, y) = s.split_once(',')?;
            Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .unwrap_or((2.0, 140.0))
}
