//! Dataset Loader Module
//! Reads record-oriented JSON, JSON lines and CSV files into a Polars DataFrame.

use super::REQUIRED_COLUMNS;
use polars::prelude::*;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to load table: {0}")]
    Polars(#[from] PolarsError),
    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("Malformed data file: {0}")]
    Malformed(String),
    #[error("Missing required column `{0}`")]
    MissingColumn(String),
}

/// Named column values collected from JSON before typing.
type RawColumns = Vec<(String, Vec<JsonValue>)>;

/// Loads the deviation dataset and checks the required columns are present.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a data file, dispatching on its extension.
    ///
    /// Supported formats:
    /// * `.json`   – `[{"mean": 0.1, "gt_corners": 4, ...}, ...]` or the
    ///   column-oriented `{"mean": {"0": 0.1, ...}, ...}`
    /// * `.jsonl` / `.ndjson` – one JSON record per line
    /// * `.csv`    – header row with the column names
    pub fn load(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }
        self.file_path = Some(file_path.to_path_buf());

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let df = match ext.as_str() {
            "json" => Self::load_json(file_path)?,
            "jsonl" | "ndjson" => Self::load_json_lines(file_path)?,
            "csv" => Self::load_csv(file_path)?,
            other => return Err(LoaderError::UnsupportedFormat(other.to_string())),
        };
        let df = Self::ensure_required_columns(df)?;

        log::debug!(
            "loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        Ok(self.df.insert(df))
    }

    fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn load_json(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let text = fs::read_to_string(file_path)?;
        let root: JsonValue = serde_json::from_str(&text)?;

        let columns = match root {
            JsonValue::Array(rows) => {
                let records = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| match row {
                        JsonValue::Object(obj) => Ok(obj),
                        _ => Err(LoaderError::Malformed(format!(
                            "row {i} is not a JSON object"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::columns_from_records(records)
            }
            JsonValue::Object(obj) => Self::columns_from_object(obj)?,
            _ => {
                return Err(LoaderError::Malformed(
                    "expected a top-level JSON array or object".to_string(),
                ))
            }
        };

        Self::build_frame(columns)
    }

    fn load_json_lines(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let text = fs::read_to_string(file_path)?;
        let mut records = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<JsonValue>(line)? {
                JsonValue::Object(obj) => records.push(obj),
                _ => {
                    return Err(LoaderError::Malformed(format!(
                        "line {} is not a JSON object",
                        i + 1
                    )))
                }
            }
        }

        Self::build_frame(Self::columns_from_records(records))
    }

    /// Pivot row records into columns. Keys absent from a record become nulls.
    fn columns_from_records(records: Vec<Map<String, JsonValue>>) -> RawColumns {
        let mut names: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }

        names
            .into_iter()
            .map(|name| {
                let values = records
                    .iter()
                    .map(|record| record.get(&name).cloned().unwrap_or(JsonValue::Null))
                    .collect();
                (name, values)
            })
            .collect()
    }

    /// Column-oriented layout: `{"col": [..]}` or `{"col": {"<row index>": value}}`.
    fn columns_from_object(obj: Map<String, JsonValue>) -> Result<RawColumns, LoaderError> {
        let mut columns: RawColumns = Vec::with_capacity(obj.len());

        for (name, values) in obj {
            let values = match values {
                JsonValue::Array(values) => values,
                JsonValue::Object(by_index) => {
                    let mut indexed: Vec<(u64, JsonValue)> = by_index
                        .into_iter()
                        .map(|(key, value)| {
                            key.parse::<u64>().map(|idx| (idx, value)).map_err(|_| {
                                LoaderError::Malformed(format!(
                                    "column `{name}` has non-numeric row index `{key}`"
                                ))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    indexed.sort_by_key(|(idx, _)| *idx);
                    indexed.into_iter().map(|(_, value)| value).collect()
                }
                _ => {
                    return Err(LoaderError::Malformed(format!(
                        "column `{name}` is neither an array nor an object"
                    )))
                }
            };
            columns.push((name, values));
        }

        if let Some((first, rest)) = columns.split_first() {
            if let Some((name, values)) = rest.iter().find(|(_, v)| v.len() != first.1.len()) {
                return Err(LoaderError::Malformed(format!(
                    "column `{name}` has {} rows, `{}` has {}",
                    values.len(),
                    first.0,
                    first.1.len()
                )));
            }
        }

        Ok(columns)
    }

    fn build_frame(columns: RawColumns) -> Result<DataFrame, LoaderError> {
        let columns = columns
            .iter()
            .map(|(name, values)| Self::json_column(name, values))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    /// Pick the narrowest dtype that holds every non-null value.
    fn json_column(name: &str, values: &[JsonValue]) -> Column {
        let non_null = || values.iter().filter(|v| !v.is_null());

        if non_null().all(|v| v.is_i64()) && non_null().next().is_some() {
            let ints: Vec<Option<i64>> = values.iter().map(JsonValue::as_i64).collect();
            return Column::new(name.into(), ints);
        }
        if non_null().all(JsonValue::is_number) {
            let floats: Vec<Option<f64>> = values.iter().map(JsonValue::as_f64).collect();
            return Column::new(name.into(), floats);
        }
        if non_null().all(JsonValue::is_boolean) {
            let bools: Vec<Option<bool>> = values.iter().map(JsonValue::as_bool).collect();
            return Column::new(name.into(), bools);
        }

        let strings: Vec<Option<String>> = values
            .iter()
            .map(|v| match v {
                JsonValue::Null => None,
                JsonValue::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), strings)
    }

    /// Reject frames without the required columns. An empty frame gets empty
    /// placeholder columns instead, so it still renders as blank charts.
    fn ensure_required_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_ok() {
                continue;
            }
            if df.height() > 0 {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
            df.with_column(Column::new(name.into(), Vec::<f64>::new()))?;
        }
        Ok(df)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
