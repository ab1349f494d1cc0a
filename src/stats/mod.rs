//! Stats module - histogram binning and axis ranges

mod calculator;

pub use calculator::{HistogramBins, StatsCalculator, MAX_AXIS_SPAN};
