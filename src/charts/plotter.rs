//! Chart Plotter Module
//! Loads a deviation dataset and writes every registered chart for it.
//!
//! Writes are not atomic. Two runs sharing an output directory may overwrite
//! each other's images.

use super::renderer::{
    plot_ceiling_floor_mean_scatter, plot_corners_mean_bar, plot_mean_hist, ChartCanvas,
    RenderError,
};
use crate::config::PlotConfig;
use crate::data::{DataLoader, LoaderError};
use polars::prelude::DataFrame;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoaderError),
    #[error("Failed to create output directory {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to render {file_name}: {source}")]
    Render {
        file_name: &'static str,
        source: RenderError,
    },
}

/// Signature shared by every plotting routine: draw one chart for the table
/// onto the canvas and return the written path.
pub type RenderFn = fn(&DataFrame, &ChartCanvas, &PlotConfig) -> Result<PathBuf, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    MeanHistogram,
    CornersMeanBar,
    CeilingFloorMeanScatter,
}

/// Registry entry: which chart, where it goes, how it is drawn.
#[derive(Clone, Copy)]
pub struct PlotEntry {
    pub kind: PlotKind,
    pub file_name: &'static str,
    pub render: RenderFn,
}

/// Every chart produced by [`Plotter::draw`], in output order.
pub const PLOT_REGISTRY: [PlotEntry; 3] = [
    PlotEntry {
        kind: PlotKind::MeanHistogram,
        file_name: "mean_hist.png",
        render: plot_mean_hist,
    },
    PlotEntry {
        kind: PlotKind::CornersMeanBar,
        file_name: "corners_mean_bar.png",
        render: plot_corners_mean_bar,
    },
    PlotEntry {
        kind: PlotKind::CeilingFloorMeanScatter,
        file_name: "ceiling_floor_mean_scatter.png",
        render: plot_ceiling_floor_mean_scatter,
    },
];

/// Draws the deviation charts into the configured output directory.
pub struct Plotter {
    config: PlotConfig,
    registry: Vec<PlotEntry>,
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new()
    }
}

impl Plotter {
    pub fn new() -> Self {
        Self::with_config(PlotConfig::default())
    }

    pub fn with_config(config: PlotConfig) -> Self {
        Self {
            config,
            registry: PLOT_REGISTRY.to_vec(),
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn registry(&self) -> &[PlotEntry] {
        &self.registry
    }

    pub fn save_dir(&self) -> &Path {
        &self.config.save_dir
    }

    /// Load the data file at `path` and draw every chart for it.
    ///
    /// Returns the written image paths in registry order.
    pub fn draw(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>, PlotError> {
        let path = path.as_ref();
        let mut loader = DataLoader::new();
        let df = loader.load(path)?;
        log::info!("loaded {} rows from {}", df.height(), path.display());
        self.draw_frame(df)
    }

    /// Draw every chart for an already loaded table.
    pub fn draw_frame(&self, df: &DataFrame) -> Result<Vec<PathBuf>, PlotError> {
        self.ensure_save_dir()?;

        let mut plot_paths = Vec::with_capacity(self.registry.len());
        for entry in &self.registry {
            let canvas = ChartCanvas::new(self.save_path(entry.file_name), self.config.size());
            let saved = (entry.render)(df, &canvas, &self.config).map_err(|source| {
                PlotError::Render {
                    file_name: entry.file_name,
                    source,
                }
            })?;
            log::info!("saved {:?} chart to {}", entry.kind, saved.display());

            if self.config.show {
                Self::show(&saved);
            }
            plot_paths.push(saved);
        }

        Ok(plot_paths)
    }

    /// Path an image named `file_name` is saved to.
    pub fn save_path(&self, file_name: &str) -> PathBuf {
        self.config.save_dir.join(file_name)
    }

    fn ensure_save_dir(&self) -> Result<(), PlotError> {
        let dir = &self.config.save_dir;
        fs::create_dir_all(dir).map_err(|source| PlotError::Io {
            path: dir.clone(),
            source,
        })
    }

    fn show(path: &Path) {
        if let Err(e) = open::that(path) {
            log::warn!("could not open {}: {}", path.display(), e);
        }
    }
}
