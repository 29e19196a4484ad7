//! Preprocessing utilities shared by the pipeline and models.
//!
//! Provides a standard scaler for per-column mean/std standardization. The
//! scaling statistics are computed once from the data passed to the fit call
//! and reapplied unchanged to any later data, which is what keeps validation
//! and test scoring honest.

use ndarray::{Array2, Axis};

/// Per-column mean/std standardizer.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl StandardScaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f32 = 1e-6;
}

/// Fit a `StandardScaler` from a matrix where rows are samples and columns
/// are features.
pub fn fit_scaler(x: &Array2<f32>) -> StandardScaler {
    assert!(
        x.nrows() > 0 && x.ncols() > 0,
        "fit_scaler requires non-empty matrix"
    );

    let n = x.nrows() as f32;
    let mean = x.mean_axis(Axis(0)).expect("non-empty matrix");

    let mut std = vec![0.0f32; x.ncols()];
    for (c, col) in x.columns().into_iter().enumerate() {
        let var = col.iter().map(|v| (v - mean[c]).powi(2)).sum::<f32>() / n;
        std[c] = var.sqrt().max(StandardScaler::MIN_STD);
    }

    StandardScaler {
        mean: mean.to_vec(),
        std,
    }
}

/// Transform all rows using the provided scaler and return a new matrix.
pub fn transform_all(x: &Array2<f32>, sc: &StandardScaler) -> Array2<f32> {
    assert_eq!(
        x.ncols(),
        sc.mean.len(),
        "transform_all: column count must match fitted scaler"
    );

    let mut out = x.clone();
    for (c, mut col) in out.columns_mut().into_iter().enumerate() {
        col.mapv_inplace(|v| (v - sc.mean[c]) / sc.std[c]);
    }
    out
}

/// Fit a scaler and return the transformed matrix in one call.
pub fn fit_transform(x: &Array2<f32>) -> Array2<f32> {
    let sc = fit_scaler(x);
    transform_all(x, &sc)
}
