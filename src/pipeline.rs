//! Two-stage model pipeline: standard scaling composed with a classifier.
//!
//! Scaling statistics are fit exactly once, inside `fit`, from the training
//! data; scoring validation or test data reuses the frozen scaler. The
//! classifier stage is anything implementing `ClassifierModel`, so it can be
//! swapped without touching the scaling stage.
use ndarray::{Array1, Array2};

use crate::config::ModelConfig;
use crate::data_handling::Dataset;
use crate::error::PipelineError;
use crate::models::{build_model, ClassifierModel, LogisticRegression};
use crate::preprocessing::{fit_scaler, transform_all, StandardScaler};

#[derive(Debug, Clone)]
pub struct Pipeline<C> {
    scaler: Option<StandardScaler>,
    classifier: C,
}

impl<C: ClassifierModel> Pipeline<C> {
    pub fn new(classifier: C) -> Self {
        Pipeline {
            scaler: None,
            classifier,
        }
    }

    /// The scaler fitted by the last `fit` call, if any.
    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    fn transform(&self, x: &Array2<f32>) -> Array2<f32> {
        let sc = self
            .scaler
            .as_ref()
            .expect("pipeline must be fit before predict");
        transform_all(x, sc)
    }
}

impl<C: ClassifierModel> ClassifierModel for Pipeline<C> {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) {
        let sc = fit_scaler(x);
        let scaled = transform_all(x, &sc);
        self.scaler = Some(sc);
        self.classifier.fit(&scaled, y);
    }

    fn predict(&self, x: &Array2<f32>) -> Array1<i32> {
        self.classifier.predict(&self.transform(x))
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Option<Array1<f32>> {
        self.classifier.predict_proba(&self.transform(x))
    }

    fn name(&self) -> &str {
        self.classifier.name()
    }
}

/// Standard logistic-regression pipeline with scaling.
pub fn make_logreg_pipeline(max_iter: usize, seed: u64) -> Pipeline<LogisticRegression> {
    Pipeline::new(LogisticRegression::new(max_iter, 0.1, 1e-3, seed))
}

/// Pipeline over a factory-built classifier, for configurable stage-2 swaps.
pub fn build_pipeline(config: &ModelConfig) -> Pipeline<Box<dyn ClassifierModel + Send + Sync>> {
    Pipeline::new(build_model(config))
}

/// The deployable bundle handed to the serving collaborator: the ordered
/// selected feature set and a pipeline fitted on exactly those features.
#[derive(Debug, Clone)]
pub struct ModelArtifact<C> {
    pub feature_set: Vec<String>,
    pub pipeline: Pipeline<C>,
}

impl<C: ClassifierModel> ModelArtifact<C> {
    pub fn new(feature_set: Vec<String>, pipeline: Pipeline<C>) -> Self {
        ModelArtifact {
            feature_set,
            pipeline,
        }
    }

    /// Predict labels for a dataset that carries at least the artifact's
    /// feature columns. Aligning arbitrary incoming rows to the feature set
    /// (defaulting missing fields, dropping extras) is the serving
    /// collaborator's job; here missing columns are an error.
    pub fn predict(&self, ds: &Dataset) -> Result<Array1<i32>, PipelineError> {
        let projected = ds.select_columns(&self.feature_set)?;
        Ok(self.pipeline.predict(projected.values()))
    }

    /// Positive-class probabilities, when the classifier can produce them.
    pub fn predict_proba(&self, ds: &Dataset) -> Result<Option<Array1<f32>>, PipelineError> {
        let projected = ds.select_columns(&self.feature_set)?;
        Ok(self.pipeline.predict_proba(projected.values()))
    }
}
