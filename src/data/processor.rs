//! Deviation Processor Module
//! Extracts the series each chart needs from the loaded dataset.

use super::{CEILING_MEAN_COL, CORNERS_COL, FLOOR_MEAN_COL, MEAN_COL};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Mean deviation of one `gt_corners` group.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerMean {
    pub label: String,
    pub mean: f64,
}

/// `(floor_mean, ceiling_mean)` points split by which bound deviates more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorCeilingSplit {
    /// Rows where `ceiling_mean > floor_mean`.
    pub ceiling_greater: Vec<(f64, f64)>,
    /// Every other row with both values present, ties included.
    pub floor_greater: Vec<(f64, f64)>,
}

impl FloorCeilingSplit {
    pub fn len(&self) -> usize {
        self.ceiling_greater.len() + self.floor_greater.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All points regardless of partition.
    pub fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.ceiling_greater.iter().chain(self.floor_greater.iter())
    }
}

/// Stateless helpers over the deviation DataFrame.
pub struct DeviationProcessor;

impl DeviationProcessor {
    /// Values of a column as `f64`, with nulls and NaNs dropped.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        Ok(values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Arithmetic mean of `mean` per `gt_corners` group, ordered by group key.
    ///
    /// NaN deviations count as missing, so they neither poison a group's mean
    /// nor add to its size.
    pub fn corner_means(df: &DataFrame) -> Result<Vec<CornerMean>, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .select([
                col(CORNERS_COL),
                col(MEAN_COL).cast(DataType::Float64).fill_nan(lit(NULL)),
            ])
            .filter(col(CORNERS_COL).is_not_null())
            .group_by([col(CORNERS_COL)])
            .agg([col(MEAN_COL).mean()])
            .sort([CORNERS_COL], SortMultipleOptions::default())
            .collect()?;

        let keys = grouped.column(CORNERS_COL)?;
        let means = grouped.column(MEAN_COL)?.cast(&DataType::Float64)?;
        let means = means.f64()?;

        let mut result = Vec::with_capacity(grouped.height());
        for i in 0..grouped.height() {
            // Groups holding only null or NaN deviations have no mean to draw
            let Some(mean) = means.get(i) else {
                continue;
            };
            let label = keys.get(i)?.to_string().trim_matches('"').to_string();
            result.push(CornerMean { label, mean });
        }

        Ok(result)
    }

    /// Partition rows by `ceiling_mean > floor_mean`.
    ///
    /// Rows where either bound is null, NaN or infinite have no place on the
    /// chart and are dropped from both sides.
    pub fn split_floor_ceiling(df: &DataFrame) -> Result<FloorCeilingSplit, ProcessorError> {
        let points = |predicate: Expr| -> Result<Vec<(f64, f64)>, ProcessorError> {
            let part = df
                .clone()
                .lazy()
                .select([
                    col(FLOOR_MEAN_COL).cast(DataType::Float64),
                    col(CEILING_MEAN_COL).cast(DataType::Float64),
                ])
                .filter(
                    col(FLOOR_MEAN_COL)
                        .is_not_null()
                        .and(col(CEILING_MEAN_COL).is_not_null()),
                )
                .filter(predicate)
                .collect()?;

            let floor = part.column(FLOOR_MEAN_COL)?.f64()?;
            let ceiling = part.column(CEILING_MEAN_COL)?.f64()?;

            Ok(floor
                .into_iter()
                .zip(ceiling.into_iter())
                .filter_map(|(f, c)| Some((f?, c?)))
                .filter(|(f, c)| f.is_finite() && c.is_finite())
                .collect())
        };

        let ceiling_greater = col(CEILING_MEAN_COL).gt(col(FLOOR_MEAN_COL));

        Ok(FloorCeilingSplit {
            ceiling_greater: points(ceiling_greater.clone())?,
            floor_greater: points(ceiling_greater.not())?,
        })
    }
}
