//! CSV reader for the cleaned satisfaction dataset.
//!
//! The cleaning step (column dropping, label mapping) happens upstream;
//! this reader expects an all-numeric CSV with a header row, typically
//! including the binary `target` column.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;

use crate::data_handling::Dataset;

/// Read a cleaned, all-numeric CSV file into a `Dataset`.
pub fn read_csv_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

    let columns: Vec<String> = reader
        .headers()
        .context("Failed to read dataset header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() {
        return Err(anyhow!("Dataset header contains no columns"));
    }

    let mut data = Vec::new();
    let mut n_rows = 0usize;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        if record.len() != columns.len() {
            return Err(anyhow!(
                "Row {} has {} fields, expected {}",
                row_idx + 1,
                record.len(),
                columns.len()
            ));
        }
        for field in record.iter() {
            let value = field.trim().parse::<f32>().with_context(|| {
                format!("Invalid numeric value '{}' at row {}", field, row_idx + 1)
            })?;
            data.push(value);
        }
        n_rows += 1;
    }

    let values = Array2::from_shape_vec((n_rows, columns.len()), data)
        .context("Dataset rows do not form a rectangular matrix")?;

    log::debug!(
        "loaded dataset: {} rows x {} columns from {}",
        n_rows,
        columns.len(),
        path.as_ref().display()
    );

    Ok(Dataset::new(columns, values))
}
