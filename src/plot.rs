//! Overlaid class histograms rendered to SVG with `plotters`.
//!
//! # Examples
//!
//! ```rust
//! use linclass::plot::HistogramChart;
//! use ndarray::array;
//! use plotters::style::{BLUE, RED};
//!
//! let chart = HistogramChart::new("Scores by class", "score", 10)
//!     .series("negative", array![-2.0, -1.5, -0.5], RED)
//!     .series("positive", array![0.5, 1.0, 2.5], BLUE);
//! let svg = chart.render_svg_string().unwrap();
//! assert!(svg.contains("<svg"));
//! ```

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::Vector;
use crate::error::{ClassifyError, Result};

const CHART_SIZE: (u32, u32) = (800, 600);
const BAR_OPACITY: f64 = 0.5;

/// Per-group counts over equal-width bins shared by every group.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `n_bins + 1` ascending bin boundaries spanning the pooled range.
    pub edges: Vec<f64>,
    /// `counts[g][b]`: samples of group `g` falling in bin `b`.
    pub counts: Vec<Vec<usize>>,
}

impl Histogram {
    pub fn new(groups: &[Vector], n_bins: usize) -> Result<Self> {
        if n_bins == 0 {
            return Err(ClassifyError::invalid("n_bins", "must be at least 1"));
        }
        if groups.iter().any(|group| group.iter().any(|v| !v.is_finite())) {
            return Err(ClassifyError::invalid("groups", "values must be finite"));
        }

        let (lo, hi) = groups
            .iter()
            .flat_map(|group| group.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo > hi {
            return Err(ClassifyError::EmptyInput);
        }
        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };

        let width = (hi - lo) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins)
            .map(|i| if i == n_bins { hi } else { lo + width * i as f64 })
            .collect();

        let counts = groups
            .iter()
            .map(|group| {
                let mut counts = vec![0; n_bins];
                for &v in group.iter() {
                    let bin = (((v - lo) / width).floor() as usize).min(n_bins - 1);
                    counts[bin] += 1;
                }
                counts
            })
            .collect();

        Ok(Self { edges, counts })
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub struct HistogramSeries {
    pub label: String,
    pub values: Vector,
    pub color: RGBColor,
}

/// Semi-transparent histograms drawn on shared axes, with a legend.
#[derive(Clone, Debug)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub n_bins: usize,
    pub series: Vec<HistogramSeries>,
}

impl HistogramChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, n_bins: usize) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            n_bins,
            series: Vec::new(),
        }
    }

    pub fn series(mut self, label: impl Into<String>, values: Vector, color: RGBColor) -> Self {
        self.series.push(HistogramSeries { label: label.into(), values, color });
        self
    }

    pub fn render_svg_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = SVGBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(plot_error)?;
        debug!(path = %path.as_ref().display(), "wrote histogram");
        Ok(())
    }

    pub fn render_svg_string(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(plot_error)?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let groups: Vec<Vector> = self.series.iter().map(|s| s.values.clone()).collect();
        let histogram = Histogram::new(&groups, self.n_bins)?;
        let n_bins = histogram.n_bins();
        let y_top = (histogram.max_count() as f64 * 1.1).max(1.0);

        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(histogram.edges[0]..histogram.edges[n_bins], 0f64..y_top)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc("count")
            .draw()
            .map_err(plot_error)?;

        for (series, counts) in self.series.iter().zip(histogram.counts.iter()) {
            let color = series.color;
            let edges = &histogram.edges;
            let bars = counts
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(move |(bin, &count)| {
                    Rectangle::new(
                        [(edges[bin], 0.0), (edges[bin + 1], count as f64)],
                        color.mix(BAR_OPACITY).filled(),
                    )
                });

            chart
                .draw_series(bars)
                .map_err(plot_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(BAR_OPACITY).filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_error)?;

        Ok(())
    }
}

fn plot_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ClassifyError {
    ClassifyError::Plot(err.to_string())
}
