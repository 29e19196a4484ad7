//! Data structures and helpers for tabular satisfaction datasets.
//!
//! This module defines `Dataset` (named columns over a dense matrix) and the
//! stratified train/validation/test splitter. Every operation returns a new
//! value; input datasets are never mutated in place.
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitConfig;
use crate::error::PipelineError;

/// An ordered, named-column view of tabular data.
///
/// Rows are samples, columns are numeric features (plus, before splitting,
/// the binary target column).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f32>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, values: Array2<f32>) -> Self {
        assert_eq!(
            columns.len(),
            values.ncols(),
            "column names must match matrix width"
        );
        Dataset { columns, values }
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Extract a single column by name.
    pub fn column(&self, name: &str) -> Option<Array1<f32>> {
        self.column_index(name)
            .map(|idx| self.values.column(idx).to_owned())
    }

    /// New dataset containing only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols());
        for &row in indices {
            data.extend(self.values.row(row).iter().copied());
        }
        let values = Array2::from_shape_vec((indices.len(), self.n_cols()), data)
            .expect("select_rows: shape mismatch");
        Dataset {
            columns: self.columns.clone(),
            values,
        }
    }

    /// New dataset projected onto exactly `names`, in `names` order.
    ///
    /// Row order is preserved. Fails if any requested column is absent,
    /// listing every missing column; columns are never silently invented.
    pub fn select_columns(&self, names: &[String]) -> Result<Dataset, PipelineError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::ColumnMismatch { missing });
        }

        let indices: Vec<usize> = names
            .iter()
            .map(|name| self.column_index(name).expect("checked above"))
            .collect();

        let mut data = Vec::with_capacity(self.n_rows() * indices.len());
        for row in 0..self.n_rows() {
            for &col in &indices {
                data.push(self.values[(row, col)]);
            }
        }
        let values = Array2::from_shape_vec((self.n_rows(), indices.len()), data)
            .expect("select_columns: shape mismatch");
        Ok(Dataset {
            columns: names.to_vec(),
            values,
        })
    }

    /// New dataset with one column removed, other columns keeping their order.
    pub fn drop_column(&self, name: &str) -> Dataset {
        let keep: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.as_str() != name)
            .cloned()
            .collect();
        self.select_columns(&keep)
            .expect("drop_column: kept columns must exist")
    }
}

/// One labeled partition: feature columns plus the aligned target vector.
#[derive(Debug, Clone)]
pub struct Split {
    pub x: Dataset,
    pub y: Array1<i32>,
}

/// The three disjoint partitions produced by `split_dataset`.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub train: Split,
    pub valid: Split,
    pub test: Split,
}

/// Stratified train/validation/test split.
///
/// The training partition takes `train_fraction` of each class; the
/// remainder is split 50/50, again per class, into validation and test.
/// Partition index lists are sorted ascending, so each output preserves the
/// source's relative row order. Identical seed and input always produce
/// identical partitions.
pub fn split_dataset(ds: &Dataset, cfg: &SplitConfig) -> Result<SplitResult, PipelineError> {
    assert!(
        cfg.train_fraction > 0.0 && cfg.train_fraction < 1.0,
        "train_fraction must lie in (0, 1)"
    );

    let target_idx = ds
        .column_index(&cfg.target_column)
        .ok_or_else(|| PipelineError::MissingTarget(cfg.target_column.clone()))?;

    let y_all: Array1<i32> = ds.values().column(target_idx).mapv(|v| v.round() as i32);
    let features = ds.drop_column(&cfg.target_column);

    // Per-class index pools, shuffled once by the threaded seed.
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut classes: Vec<i32> = y_all.iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();

    let mut train_idx = Vec::new();
    let mut valid_idx = Vec::new();
    let mut test_idx = Vec::new();

    for &class in &classes {
        let mut pool: Vec<usize> = (0..ds.n_rows()).filter(|&i| y_all[i] == class).collect();
        pool.shuffle(&mut rng);

        let n_train = (pool.len() as f32 * cfg.train_fraction).round() as usize;
        let temp = pool.split_off(n_train);
        train_idx.extend(pool);

        // 50/50 of the remainder; floor goes to validation.
        let n_valid = temp.len() / 2;
        valid_idx.extend_from_slice(&temp[..n_valid]);
        test_idx.extend_from_slice(&temp[n_valid..]);
    }

    train_idx.sort_unstable();
    valid_idx.sort_unstable();
    test_idx.sort_unstable();

    let result = SplitResult {
        train: take_split(&features, &y_all, &train_idx),
        valid: take_split(&features, &y_all, &valid_idx),
        test: take_split(&features, &y_all, &test_idx),
    };

    for (name, split) in [
        ("train", &result.train),
        ("valid", &result.valid),
        ("test", &result.test),
    ] {
        let classes = distinct_classes(&split.y);
        if classes < 2 {
            return Err(PipelineError::DegenerateSplit {
                partition: name,
                classes,
            });
        }
        log::info!(
            "{} partition: {} rows x {} features ({} positive)",
            name,
            split.x.n_rows(),
            split.x.n_cols(),
            split.y.iter().filter(|&&v| v == 1).count()
        );
    }

    Ok(result)
}

fn take_split(features: &Dataset, y: &Array1<i32>, indices: &[usize]) -> Split {
    let y_part: Array1<i32> = indices.iter().map(|&i| y[i]).collect();
    Split {
        x: features.select_rows(indices),
        y: y_part,
    }
}

fn distinct_classes(y: &Array1<i32>) -> usize {
    let mut seen: Vec<i32> = y.iter().copied().collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
