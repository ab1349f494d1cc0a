//! Statistics Calculator Module
//! Histogram binning and axis ranges for the deviation charts.

use statrs::statistics::Statistics;
use std::ops::Range;

/// Equal-width histogram: `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub counts: Vec<u32>,
}

impl HistogramBins {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left edge, right edge, count)` for every bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, u32)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    /// Span covered by the bins, or `None` when there are none.
    pub fn range(&self) -> Option<Range<f64>> {
        match (self.edges.first(), self.edges.last()) {
            (Some(&lo), Some(&hi)) if !self.is_empty() => Some(lo..hi),
            _ => None,
        }
    }
}

/// Widest axis span the chart mesh is asked to subdivide.
pub const MAX_AXIS_SPAN: f64 = 1e300;

/// Handles descriptive calculations over plain value slices.
///
/// Spans are computed from halves (`hi / 2 - lo / 2`) so that values near
/// `f64::MAX` of opposite sign never overflow to infinity.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Observed `(min, max)` of the finite values.
    pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        Some((Statistics::min(&finite), Statistics::max(&finite)))
    }

    /// Bin `values` into `bins` equal-width bins over their observed range.
    ///
    /// The last bin is closed on the right so the maximum is counted. When
    /// every value is equal the range is widened to `value ± 0.5`.
    pub fn histogram(values: &[f64], bins: usize) -> HistogramBins {
        let Some((lo, hi)) = Self::value_range(values) else {
            return HistogramBins::default();
        };
        let bins = bins.max(1);
        let (lo, hi) = if lo == hi { Self::widen(lo) } else { (lo, hi) };
        let half_span = hi * 0.5 - lo * 0.5;

        let edges: Vec<f64> = (0..=bins)
            .map(|i| {
                let t = i as f64 / bins as f64;
                if i == bins {
                    hi
                } else {
                    lo * (1.0 - t) + hi * t
                }
            })
            .collect();

        let mut counts = vec![0u32; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            let frac = (v * 0.5 - lo * 0.5) / half_span;
            let idx = ((frac * bins as f64) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        HistogramBins { edges, counts }
    }

    /// Axis range around `values` with `pad_fraction` of the span added on
    /// both sides. Degenerate inputs still give a non-empty range.
    pub fn padded_range(values: &[f64], pad_fraction: f64) -> Range<f64> {
        match Self::value_range(values) {
            None => 0.0..1.0,
            Some((lo, hi)) if lo == hi => {
                let (lo, hi) = Self::widen(lo);
                lo..hi
            }
            Some((lo, hi)) => {
                let pad = hi * pad_fraction - lo * pad_fraction;
                Self::clamped(lo - pad, hi + pad)
            }
        }
    }

    /// Range for bar heights: always includes the zero baseline.
    pub fn bar_range(values: &[f64], pad_fraction: f64) -> Range<f64> {
        let Some((lo, hi)) = Self::value_range(values) else {
            return 0.0..1.0;
        };
        let lo = lo.min(0.0);
        let hi = hi.max(0.0);
        if lo == hi {
            return 0.0..1.0;
        }
        let pad = hi * pad_fraction - lo * pad_fraction;
        let lo = if lo < 0.0 { lo - pad } else { lo };
        let hi = if hi > 0.0 { hi + pad } else { hi };
        Self::clamped(lo, hi)
    }

    /// `range` if an axis can be drawn over it: finite, increasing and no
    /// wider than [`MAX_AXIS_SPAN`].
    pub fn drawable_range(range: Range<f64>) -> Option<Range<f64>> {
        let finite = range.start.is_finite() && range.end.is_finite();
        let half_span = range.end * 0.5 - range.start * 0.5;
        (finite && half_span > 0.0 && half_span <= MAX_AXIS_SPAN * 0.5).then_some(range)
    }

    /// Non-empty interval around a single value, `± 0.5` or one relative
    /// epsilon for magnitudes where `0.5` is lost to rounding.
    fn widen(value: f64) -> (f64, f64) {
        let pad = 0.5f64.max(value.abs() * f64::EPSILON);
        Self::clamped_pair(value - pad, value + pad)
    }

    fn clamped(lo: f64, hi: f64) -> Range<f64> {
        let (lo, hi) = Self::clamped_pair(lo, hi);
        lo..hi
    }

    fn clamped_pair(lo: f64, hi: f64) -> (f64, f64) {
        (lo.max(f64::MIN), hi.min(f64::MAX))
    }
}
