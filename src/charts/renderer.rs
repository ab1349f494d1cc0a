//! Static Chart Renderer
//! Draws the deviation charts into PNG files with plotters.
//!
//! Every routine gets its own [`ChartCanvas`]: the drawing area is created for
//! that call, presented (written to disk) at the end and dropped, so nothing
//! drawn for one chart leaks into the next.

use crate::config::PlotConfig;
use crate::data::{
    CornerMean, DeviationProcessor, FloorCeilingSplit, ProcessorError, MEAN_COL,
};
use crate::stats::{HistogramBins, StatsCalculator};
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

// Colors
const BAR_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue
const CEILING_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue
const FLOOR_COLOR: RGBColor = RGBColor(231, 76, 60); // Red

pub const CEILING_GREATER_LABEL: &str = "Ceiling deviation greater";
pub const FLOOR_GREATER_LABEL: &str = "Floor deviation greater";

const POINT_RADIUS: i32 = 3;
const AXIS_PAD: f64 = 0.05;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart backend error: {0}")]
    Backend(String),
    #[error("Failed to prepare chart data: {0}")]
    Processor(#[from] ProcessorError),
    #[error("Cannot draw {axis} axis over {start}..{end}")]
    AxisRange {
        axis: &'static str,
        start: f64,
        end: f64,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// One output image. Owns the target path and pixel size; the plotters
/// drawing area only lives inside [`ChartCanvas::render`].
pub struct ChartCanvas {
    path: PathBuf,
    size: (u32, u32),
}

impl ChartCanvas {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Fill a fresh white bitmap, let `draw` paint it, then write it out,
    /// replacing any existing file. Returns the written path.
    pub fn render<F>(&self, draw: F) -> Result<PathBuf, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
        Ok(self.path.clone())
    }
}

/// Checks that an axis can be laid out over `range` before plotters tries
/// to place key points on it.
fn axis_range(axis: &'static str, range: Range<f64>) -> Result<Range<f64>, RenderError> {
    let (start, end) = (range.start, range.end);
    StatsCalculator::drawable_range(range).ok_or(RenderError::AxisRange { axis, start, end })
}

/// Distribution of mean deviations, binned over their observed range.
pub fn plot_mean_hist(
    df: &DataFrame,
    canvas: &ChartCanvas,
    config: &PlotConfig,
) -> Result<PathBuf, RenderError> {
    let values = DeviationProcessor::column_values(df, MEAN_COL)?;
    let hist = StatsCalculator::histogram(&values, config.histogram_bins);
    canvas.render(|root| draw_histogram(root, &hist))
}

/// Mean deviation per number of ground-truth corners.
pub fn plot_corners_mean_bar(
    df: &DataFrame,
    canvas: &ChartCanvas,
    _config: &PlotConfig,
) -> Result<PathBuf, RenderError> {
    let means = DeviationProcessor::corner_means(df)?;
    canvas.render(|root| draw_corner_bars(root, &means))
}

/// Floor vs ceiling mean deviation, colored by which bound is larger.
pub fn plot_ceiling_floor_mean_scatter(
    df: &DataFrame,
    canvas: &ChartCanvas,
    _config: &PlotConfig,
) -> Result<PathBuf, RenderError> {
    let split = DeviationProcessor::split_floor_ceiling(df)?;
    canvas.render(|root| draw_floor_ceiling_scatter(root, &split))
}

pub fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    hist: &HistogramBins,
) -> Result<(), RenderError> {
    let x_range = axis_range("x", hist.range().unwrap_or(0.0..1.0))?;
    let y_max = hist.max_count().max(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Mean deviation")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(hist.bars().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], BAR_COLOR.filled())
    }))?;

    Ok(())
}

pub fn draw_corner_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    means: &[CornerMean],
) -> Result<(), RenderError> {
    let labels: Vec<String> = means.iter().map(|m| m.label.clone()).collect();
    let heights: Vec<f64> = means.iter().map(|m| m.mean).collect();
    let y_range = axis_range("y", StatsCalculator::bar_range(&heights, AXIS_PAD))?;
    let n_bars = labels.len().max(1);

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n_bars as i32).into_segmented(), y_range)?;

    // Category labels sit horizontally under the bar centers
    let label_of = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_bars)
        .x_label_formatter(&label_of)
        .x_desc("Number of corners")
        .y_desc("Mean deviation")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(12)
            .data(
                heights
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| h.is_finite())
                    .map(|(i, &h)| (i as i32, h)),
            ),
    )?;

    Ok(())
}

pub fn draw_floor_ceiling_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    split: &FloorCeilingSplit,
) -> Result<(), RenderError> {
    let floors: Vec<f64> = split.points().map(|&(floor, _)| floor).collect();
    let ceilings: Vec<f64> = split.points().map(|&(_, ceiling)| ceiling).collect();
    let x_range = axis_range("x", StatsCalculator::padded_range(&floors, AXIS_PAD))?;
    let y_range = axis_range("y", StatsCalculator::padded_range(&ceilings, AXIS_PAD))?;

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Floor mean")
        .y_desc("Ceiling mean")
        .draw()?;

    chart
        .draw_series(
            split
                .ceiling_greater
                .iter()
                .map(|&point| Circle::new(point, POINT_RADIUS, CEILING_COLOR.filled())),
        )?
        .label(CEILING_GREATER_LABEL)
        .legend(|(x, y)| Circle::new((x, y), POINT_RADIUS, CEILING_COLOR.filled()));

    chart
        .draw_series(
            split
                .floor_greater
                .iter()
                .map(|&point| Circle::new(point, POINT_RADIUS, FLOOR_COLOR.filled())),
        )?
        .label(FLOOR_GREATER_LABEL)
        .legend(|(x, y)| Circle::new((x, y), POINT_RADIUS, FLOOR_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
