//! Drawing a `ChartSpec` with plotters
//!
//! SVG is always available. PNG needs the `bitmap` feature, which pulls in
//! the bitmap backend and TTF text rendering.

use super::chart::{ChartSpec, MarkerShape};
use super::error::RenderError;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Image format of the rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from a file extension, defaulting to SVG
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Svg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where and how the chart is written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl OutputTarget {
    /// Fails with `RenderError::NoOutput` when no path is configured
    pub fn new(path: Option<&Path>, format: OutputFormat) -> Result<Self, RenderError> {
        let path = path.ok_or(RenderError::NoOutput)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
        })
    }
}

/// A chart written to disk
#[derive(Debug, Clone)]
pub struct RenderedPlot {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// File size in bytes
    pub size: u64,
}

/// Render the chart to the target file
pub fn render(spec: &ChartSpec, target: &OutputTarget) -> Result<RenderedPlot, RenderError> {
    let path = target.path.as_path();

    match target.format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, (spec.width, spec.height)).into_drawing_area();
            draw_chart(root, spec)?;
        }
        OutputFormat::Png => render_bitmap(path, spec)?,
    }

    let size = std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), format = %target.format, size, "chart written");

    Ok(RenderedPlot {
        path: path.to_path_buf(),
        format: target.format,
        width: spec.width,
        height: spec.height,
        size,
    })
}

/// Render the chart as an SVG document in memory
pub fn render_svg_string(spec: &ChartSpec) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        draw_chart(root, spec)?;
    }
    Ok(svg)
}

#[cfg(feature = "bitmap")]
fn render_bitmap(path: &Path, spec: &ChartSpec) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
    draw_chart(root, spec)
}

#[cfg(not(feature = "bitmap"))]
fn render_bitmap(_path: &Path, _spec: &ChartSpec) -> Result<(), RenderError> {
    Err(RenderError::UnsupportedFormat(
        "png (rebuild with --features bitmap)".to_string(),
    ))
}

/// Legend text size in pixels
const LEGEND_FONT_SIZE: f64 = 12.0;
/// Padding inside the legend box
const LEGEND_MARGIN: i32 = 10;
/// Width reserved for the marker swatch left of each label
const LEGEND_SWATCH_WIDTH: i32 = 30;

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(backend_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70);
    if let Some(title) = &spec.title {
        builder.caption(
            title,
            FontDesc::new(FontFamily::SansSerif, 20.0, FontStyle::Normal),
        );
    }
    let mut chart = builder
        .build_cartesian_2d(spec.x_range.clone(), spec.y_range.clone())
        .map_err(backend_error)?;

    // Transparent axis lines and ticks leave only the tick labels
    let axis_style = if spec.frame {
        BLACK.stroke_width(1)
    } else {
        TRANSPARENT.stroke_width(1)
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(axis_style)
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()
        .map_err(backend_error)?;

    let size = spec.marker_size.round().max(1.0) as i32;

    for series in &spec.series {
        let [r, g, b] = series.color;
        let style = RGBColor(r, g, b).filled();
        let points = series.points.iter().copied();

        let anno = match spec.marker {
            MarkerShape::Circle => chart
                .draw_series(points.map(|p| Circle::new(p, size, style)))
                .map_err(backend_error)?
                .legend(move |c| Circle::new(c, size, style)),
            MarkerShape::Square => chart
                .draw_series(points.map(|p| {
                    EmptyElement::at(p) + Rectangle::new([(-size, -size), (size, size)], style)
                }))
                .map_err(backend_error)?
                .legend(move |(x, y)| {
                    Rectangle::new([(x - size, y - size), (x + size, y + size)], style)
                }),
            MarkerShape::Triangle => chart
                .draw_series(points.map(|p| TriangleMarker::new(p, size, style)))
                .map_err(backend_error)?
                .legend(move |c| TriangleMarker::new(c, size, style)),
            MarkerShape::Cross => chart
                .draw_series(points.map(|p| Cross::new(p, size, style)))
                .map_err(backend_error)?
                .legend(move |c| Cross::new(c, size, style)),
        };
        anno.label(series.label.as_str());
    }

    // Anchor is in data coordinates; the box is kept inside the plotting area
    let legend_font = FontDesc::new(FontFamily::SansSerif, LEGEND_FONT_SIZE, FontStyle::Normal);
    let text_style = TextStyle::from(legend_font.clone());
    let line_height = (LEGEND_FONT_SIZE * 1.25).ceil() as i32;
    let (mut text_w, mut text_h) = (0, 0);
    for series in &spec.series {
        let (w, h) = root
            .estimate_text_size(&series.label, &text_style)
            .map_err(backend_error)?;
        text_w = text_w.max(w as i32);
        text_h += (h as i32).max(line_height);
    }
    let box_size = (
        text_w + LEGEND_SWATCH_WIDTH + 2 * LEGEND_MARGIN,
        text_h + 2 * LEGEND_MARGIN,
    );

    let (anchor_x, anchor_y) = chart.backend_coord(&spec.legend_anchor);
    let (base_x, base_y) = chart.plotting_area().get_base_pixel();
    let (area_w, area_h) = chart.plotting_area().dim_in_pixel();
    let (legend_x, legend_y) = legend_origin(
        (anchor_x - base_x, anchor_y - base_y),
        box_size,
        (area_w as i32, area_h as i32),
    );

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::Coordinate(legend_x, legend_y))
        .label_font(legend_font)
        .margin(LEGEND_MARGIN)
        .legend_area_size(LEGEND_SWATCH_WIDTH)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(backend_error)?;

    root.present().map_err(backend_error)?;
    Ok(())
}

/// Top-left corner of the legend box, relative to the plotting area
///
/// The box starts at `anchor` when it fits; otherwise it is shifted back
/// inside `area`. A box larger than the area is pinned to the top-left.
fn legend_origin(anchor: (i32, i32), size: (i32, i32), area: (i32, i32)) -> (i32, i32) {
    let x = anchor.0.min(area.0 - size.0).max(0);
    let y = anchor.1.min(area.1 - size.1).max(0);
    (x, y)
}

fn backend_error<E>(err: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use crate::timing::{TimingRecord, TimingTable, MEMO_TIME_DIVISOR};

    fn comparison_chart() -> ChartSpec {
        let no_memo = TimingTable::new(
            "no-memo.csv",
            vec![
                TimingRecord { n: 1, time: 0.0001 },
                TimingRecord { n: 2, time: 0.0002 },
            ],
        );
        let memo = TimingTable::new(
            "memo.csv",
            vec![
                TimingRecord { n: 1, time: 50.0 },
                TimingRecord { n: 2, time: 60.0 },
            ],
        )
        .rescale(MEMO_TIME_DIVISOR);

        ChartSpec::comparison(&no_memo, &memo, &PlotConfig::defaults().unwrap())
    }

    #[test]
    fn test_svg_contains_points_and_legend() {
        let svg = render_svg_string(&comparison_chart()).unwrap();

        // 4 data points + 2 legend swatches
        assert_eq!(svg.matches("<circle").count(), 6);

        let lower = svg.to_lowercase();
        assert!(lower.contains("#0000ff"));
        assert!(lower.contains("#ff0000"));

        let without = svg.find("W/o memoization").unwrap();
        let with = svg.find("With memoization").unwrap();
        assert!(without < with);

        assert!(svg.contains("Time (seconds)"));
    }

    /// Numeric attribute of an SVG tag, e.g. `cx="121"`
    fn attr(tag: &str, name: &str) -> Option<f64> {
        let key = format!(" {name}=\"");
        let start = tag.find(&key)? + key.len();
        let len = tag[start..].find('"')?;
        tag[start..start + len].parse().ok()
    }

    /// (fill, cx, cy) of every circle in the document
    fn circles(svg: &str) -> Vec<(String, f64, f64)> {
        svg.split("<circle")
            .skip(1)
            .filter_map(|rest| {
                let tag = &rest[..rest.find('>')?];
                let fill = if tag.to_lowercase().contains("#0000ff") {
                    "blue"
                } else if tag.to_lowercase().contains("#ff0000") {
                    "red"
                } else {
                    "other"
                };
                Some((fill.to_string(), attr(tag, "cx")?, attr(tag, "cy")?))
            })
            .collect()
    }

    /// (x, y) of the text element holding `label`
    fn text_position(svg: &str, label: &str) -> (f64, f64) {
        let end = svg.find(label).unwrap();
        let start = svg[..end].rfind("<text").unwrap();
        let tag = &svg[start..end];
        (attr(tag, "x").unwrap(), attr(tag, "y").unwrap())
    }

    fn table(source: &str, rows: &[(u64, f64)]) -> TimingTable {
        TimingTable::new(
            source,
            rows.iter()
                .map(|&(n, time)| TimingRecord { n, time })
                .collect(),
        )
    }

    #[test]
    fn test_series_markers_at_distinct_pixels() {
        let svg = render_svg_string(&comparison_chart()).unwrap();
        let markers = circles(&svg);

        let blue: Vec<(f64, f64)> = markers
            .iter()
            .filter(|(fill, _, _)| fill == "blue")
            .map(|&(_, x, y)| (x, y))
            .collect();
        let red: Vec<(f64, f64)> = markers
            .iter()
            .filter(|(fill, _, _)| fill == "red")
            .map(|&(_, x, y)| (x, y))
            .collect();

        // 2 points + 1 legend swatch each
        assert_eq!(blue.len(), 3);
        assert_eq!(red.len(), 3);
        for position in &blue {
            assert!(!red.contains(position), "red marker hides blue at {position:?}");
        }
    }

    #[test]
    fn test_legend_stays_on_canvas_for_outside_anchor() {
        // (2, 140) lies above the data and on the right edge of the x range
        let chart = comparison_chart();
        let svg = render_svg_string(&chart).unwrap();

        for label in ["W/o memoization", "With memoization"] {
            let (x, y) = text_position(&svg, label);
            assert!(x >= 0.0 && y >= 0.0);
            // Label text must end before the canvas edge
            assert!(x + 80.0 <= chart.width as f64, "{label} starts at x={x}");
            assert!(y + 12.0 <= chart.height as f64);
        }
    }

    #[test]
    fn test_legend_placed_at_anchor_inside_data() {
        let no_memo = table("no-memo.csv", &[(0, 0.0), (10, 20.0), (20, 150.0)]);
        let memo = table("memo.csv", &[(0, 0.0), (20, 0.5)]);
        let chart = ChartSpec::comparison(&no_memo, &memo, &PlotConfig::defaults().unwrap());
        let svg = render_svg_string(&chart).unwrap();

        // Anchor (2, 140) is near the top-left of the data
        let (x, y) = text_position(&svg, "W/o memoization");
        assert!(x < chart.width as f64 / 2.0, "legend at x={x}");
        assert!(y < chart.height as f64 / 2.0, "legend at y={y}");
    }

    #[test]
    fn test_legend_origin_clamps_into_area() {
        // Fits: kept at the anchor
        assert_eq!(legend_origin((50, 40), (140, 60), (700, 500)), (50, 40));
        // Past the right and bottom edges
        assert_eq!(legend_origin((680, 490), (140, 60), (700, 500)), (560, 440));
        // Above and left of the area
        assert_eq!(legend_origin((-30, -9000), (140, 60), (700, 500)), (0, 0));
        // Larger than the area
        assert_eq!(legend_origin((10, 10), (900, 60), (700, 500)), (0, 10));
    }

    #[test]
    fn test_no_frame_draws_no_axis_lines() {
        let chart = comparison_chart();
        assert!(!chart.frame);
        let svg = render_svg_string(&chart).unwrap();

        assert_eq!(svg.matches("<polyline").count(), 0);
        assert_eq!(svg.matches("<line").count(), 0);
        // Axis descriptions are still drawn
        assert!(svg.contains(">\nn\n</text>"));
        assert!(svg.contains("Time (seconds)"));
        // Tick labels survive without the frame
        assert!(svg.matches("<text").count() > 4);
    }

    #[test]
    fn test_frame_draws_axis_lines() {
        let mut chart = comparison_chart();
        chart.frame = true;
        let svg = render_svg_string(&chart).unwrap();

        assert!(svg.contains("<polyline") || svg.contains("<line"));
    }

    #[test]
    fn test_svg_marker_shape_applies_to_all_series() {
        let mut chart = comparison_chart();
        chart.marker = MarkerShape::Square;
        let svg = render_svg_string(&chart).unwrap();
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn test_render_to_file() {
        let chart = comparison_chart();
        let path = std::env::temp_dir().join(format!("chart_{}.svg", uuid::Uuid::new_v4()));
        let target = OutputTarget::new(Some(&path), OutputFormat::Svg).unwrap();

        let rendered = render(&chart, &target).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(rendered.format, OutputFormat::Svg);
        assert_eq!((rendered.width, rendered.height), (800, 600));
        assert_eq!(rendered.size, contents.len() as u64);
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn test_no_output_target() {
        assert!(matches!(
            OutputTarget::new(None, OutputFormat::Svg),
            Err(RenderError::NoOutput)
        ));
    }

    #[cfg(not(feature = "bitmap"))]
    #[test]
    fn test_png_unsupported_without_bitmap_feature() {
        let path = std::env::temp_dir().join(format!("chart_{}.png", uuid::Uuid::new_v4()));
        let target = OutputTarget::new(Some(&path), OutputFormat::Png).unwrap();
        assert!(matches!(
            render(&comparison_chart(), &target),
            Err(RenderError::UnsupportedFormat(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a")), OutputFormat::Svg);
    }
}
