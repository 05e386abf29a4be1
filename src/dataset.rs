//! In-memory tabular dataset backing a sweep

use crate::error::{Result, SweepError};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// An immutable tabular dataset with a designated numeric target column.
///
/// Rows are never mutated after construction; every component of the sweep
/// reads the same frame.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    target_column: String,
}

impl Dataset {
    /// Wrap an in-memory frame. The target column must exist and be castable
    /// to `Float64`.
    pub fn new(frame: DataFrame, target_column: impl Into<String>) -> Result<Self> {
        let target_column = target_column.into();
        let dataset = Self {
            frame,
            target_column,
        };
        // Target must be extractable up front
        dataset.column_values(&dataset.target_column)?;
        Ok(dataset)
    }

    /// Load a CSV file and wrap it as a dataset
    pub fn from_csv_path(path: &Path, target_column: impl Into<String>) -> Result<Self> {
        let file = File::open(path).map_err(|e| SweepError::DataError(e.to_string()))?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| SweepError::DataError(e.to_string()))?;

        Self::new(frame, target_column)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    /// The designated target column name
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Underlying frame
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Verify every required feature column exists, before any fitting begins
    pub fn validate_schema(&self, features: &[String]) -> Result<()> {
        for name in features {
            if self.frame.column(name).is_err() {
                return Err(SweepError::SchemaMismatch(name.clone()));
            }
        }
        Ok(())
    }

    /// Extract the target as a dense vector
    pub fn target(&self) -> Result<Array1<f64>> {
        let values = self.column_values(&self.target_column)?;
        Ok(Array1::from_vec(values))
    }

    /// Extract named feature columns into a row-major matrix.
    ///
    /// Column order in the matrix follows `features`, which is the subset's
    /// insertion order from the candidate list.
    pub fn feature_matrix(&self, features: &[String]) -> Result<Array2<f64>> {
        let n_rows = self.frame.height();
        let n_cols = features.len();

        let col_data: Vec<Vec<f64>> = features
            .iter()
            .map(|name| self.column_values(name))
            .collect::<Result<Vec<_>>>()?;

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
            col_refs[c][r]
        }))
    }

    /// Extract a column as f64 values. Nulls are rejected rather than
    /// imputed; callers hand over complete data for every touched column.
    fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| SweepError::SchemaMismatch(name.to_string()))?;

        let as_f64 = column
            .cast(&DataType::Float64)
            .map_err(|e| SweepError::DataError(e.to_string()))?;

        let values = as_f64
            .f64()
            .map_err(|e| SweepError::DataError(e.to_string()))?;
        if values.null_count() > 0 {
            return Err(SweepError::DataError(format!(
                "column '{name}' contains {} null value(s)",
                values.null_count()
            )));
        }

        Ok(values.into_no_null_iter().collect())
    }
}
