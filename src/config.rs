//! Plot Configuration
//! Output location and image geometry shared by every chart.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_SAVE_DIR: &str = "plots";

/// Default number of equal-width bins for the mean deviation histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 100;

/// Settings for a [`Plotter`](crate::charts::Plotter) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Directory the chart images are written into. Created on demand.
    pub save_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    /// Open every saved chart with the system viewer after it is written.
    pub show: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            width: 800,
            height: 600,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            show: false,
        }
    }
}

impl PlotConfig {
    pub fn with_save_dir(mut self, save_dir: impl AsRef<Path>) -> Self {
        self.save_dir = save_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.max(1);
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
