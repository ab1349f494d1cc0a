//! Deviation Plots - diagnostic charts for model-evaluation deviations
//!
//! Loads a record-oriented dataset with `mean`, `gt_corners`, `ceiling_mean`
//! and `floor_mean` columns and writes a fixed set of PNG charts for it.
//!
//! ```rust,ignore
//! use deviation_plots::Plotter;
//!
//! let paths = Plotter::new().draw("deviations.json")?;
//! // ["plots/mean_hist.png", "plots/corners_mean_bar.png", "plots/ceiling_floor_mean_scatter.png"]
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod stats;

pub use charts::{PlotError, PlotKind, Plotter, PLOT_REGISTRY};
pub use config::PlotConfig;
