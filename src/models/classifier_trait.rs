use ndarray::{Array1, Array2};

/// Trait abstraction for binary classifiers used by the pipeline and the
/// evaluator. Centralizing the contract here lets stage-2 implementations
/// live next to model code and be swapped without touching the scaler stage.
pub trait ClassifierModel {
    /// Fit the model. `y` uses the crate convention (1 positive, 0 negative).
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>);

    /// Predict hard class labels (0 or 1).
    fn predict(&self, x: &Array2<f32>) -> Array1<i32>;

    /// Predict probabilities of the positive class, when available.
    ///
    /// Models producing only hard labels return `None`; downstream metric
    /// code reports AUC as undefined rather than failing.
    fn predict_proba(&self, _x: &Array2<f32>) -> Option<Array1<f32>> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<M: ClassifierModel + ?Sized> ClassifierModel for Box<M> {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Array1<i32> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Option<Array1<f32>> {
        (**self).predict_proba(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Capability interface for estimators that can rank features.
///
/// Kept separate from `ClassifierModel` so the auxiliary elimination
/// estimator and the final classifier can be swapped independently.
pub trait FeatureImportance {
    /// Per-feature importance scores for the most recent fit, aligned with
    /// the fitted feature columns.
    fn importances(&self) -> Array1<f32>;
}
