//! Data module - dataset loading and per-chart extraction

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{CornerMean, DeviationProcessor, FloorCeilingSplit, ProcessorError};

/// Averaged deviation per item.
pub const MEAN_COL: &str = "mean";
/// Ground-truth corner count, the grouping key of the bar chart.
pub const CORNERS_COL: &str = "gt_corners";
pub const CEILING_MEAN_COL: &str = "ceiling_mean";
pub const FLOOR_MEAN_COL: &str = "floor_mean";

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [MEAN_COL, CORNERS_COL, CEILING_MEAN_COL, FLOOR_MEAN_COL];
