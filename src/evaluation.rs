//! Split and cross-validated evaluation of fitted and unfit models.
//!
//! Point metrics never mutate the model or the data; cross-validation takes
//! the estimator as a builder closure so every fold trains a fresh instance.
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::models::ClassifierModel;
use crate::stats::{accuracy_score, f1_score, roc_auc_score, Scoring};

/// Point metrics for one split. `auc` is `None` (undefined, not an error)
/// when the model produces no probability scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub auc: Option<f64>,
    pub accuracy: f64,
    pub f1: f64,
}

/// Aggregate cross-validated scores for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvScores {
    pub scores: Vec<f64>,
    pub mean: f64,
    pub std: f64,
}

impl CvScores {
    fn from_scores(scores: Vec<f64>) -> Self {
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        CvScores {
            scores,
            mean,
            std: var.sqrt(),
        }
    }
}

/// Stratified k-fold assignment: per-class index pools are shuffled by the
/// seed and dealt round-robin, so every fold holds at least one instance of
/// each class whenever the minority class count reaches `k`.
///
/// Returns `(train_indices, test_indices)` per fold, both sorted ascending.
pub fn stratified_kfold_indices(
    y: &Array1<i32>,
    k: usize,
    seed: u64,
) -> Result<Vec<(Vec<usize>, Vec<usize>)>, PipelineError> {
    let mut classes: Vec<i32> = y.iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();

    let minority_count = classes
        .iter()
        .map(|&class| y.iter().filter(|&&v| v == class).count())
        .min()
        .unwrap_or(0);

    if k < 2 || minority_count < k {
        return Err(PipelineError::InsufficientFolds {
            folds: k,
            minority_count,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_of = vec![0usize; y.len()];
    for &class in &classes {
        let mut pool: Vec<usize> = (0..y.len()).filter(|&i| y[i] == class).collect();
        pool.shuffle(&mut rng);
        for (slot, &idx) in pool.iter().enumerate() {
            fold_of[idx] = slot % k;
        }
    }

    let folds = (0..k)
        .map(|fold| {
            let mut train = Vec::new();
            let mut test = Vec::new();
            for (idx, &assigned) in fold_of.iter().enumerate() {
                if assigned == fold {
                    test.push(idx);
                } else {
                    train.push(idx);
                }
            }
            (train, test)
        })
        .collect();

    Ok(folds)
}

/// K-fold cross-validated scores for an unfit estimator.
///
/// `make_model` builds a fresh estimator per fold. Folds are evaluated in
/// parallel; fold membership depends only on the seed and fold count, never
/// on scheduling.
pub fn cross_val_score<M, F>(
    make_model: F,
    x: &Array2<f32>,
    y: &Array1<i32>,
    k: usize,
    scoring: Scoring,
    seed: u64,
) -> Result<CvScores, PipelineError>
where
    M: ClassifierModel,
    F: Fn() -> M + Sync,
{
    let folds = stratified_kfold_indices(y, k, seed)?;

    let scores: Vec<f64> = folds
        .par_iter()
        .map(|(train, test)| {
            let mut model = make_model();
            model.fit(&x.select(Axis(0), train), &y.select(Axis(0), train));

            let x_test = x.select(Axis(0), test);
            let y_test = y.select(Axis(0), test);
            let y_pred = model.predict(&x_test);
            let proba = model.predict_proba(&x_test);
            scoring.compute(&y_test, &y_pred, proba.as_ref())
        })
        .collect();

    log::debug!(
        "{}-fold cross-validation ({}) scores: {:?}",
        k,
        scoring.as_str(),
        scores
    );

    Ok(CvScores::from_scores(scores))
}

/// Score a fitted model on one split.
pub fn evaluate_split<M: ClassifierModel>(
    model: &M,
    x: &Array2<f32>,
    y: &Array1<i32>,
) -> MetricsRecord {
    let y_pred = model.predict(x);
    let auc = model
        .predict_proba(x)
        .and_then(|proba| roc_auc_score(y, &proba));

    MetricsRecord {
        auc,
        accuracy: accuracy_score(y, &y_pred),
        f1: f1_score(y, &y_pred),
    }
}

/// Training and validation metrics for a fitted model, in one call.
pub fn get_model_metrics<M: ClassifierModel>(
    model: &M,
    x_train: &Array2<f32>,
    y_train: &Array1<i32>,
    x_valid: &Array2<f32>,
    y_valid: &Array1<i32>,
) -> (MetricsRecord, MetricsRecord) {
    (
        evaluate_split(model, x_train, y_train),
        evaluate_split(model, x_valid, y_valid),
    )
}
