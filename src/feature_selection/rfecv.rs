//! Recursive feature elimination with cross-validated subset scoring.
use ndarray::{Array1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SelectionConfig;
use crate::data_handling::Dataset;
use crate::error::PipelineError;
use crate::evaluation::stratified_kfold_indices;
use crate::models::{ClassifierModel, FeatureImportance};

/// One row of the ranking table, aligned with the original column order.
///
/// Rank 1 marks a feature retained in the final subset; larger ranks were
/// eliminated earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRank {
    pub feature: String,
    pub selected: bool,
    pub rank: usize,
}

/// Mean cross-validated score recorded for one subset size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetScore {
    pub n_features: usize,
    pub mean_score: f64,
}

/// The fitted result of `RfeCv`: the ranking table, the ordered selected
/// feature set, and the score trail that chose it.
#[derive(Debug, Clone)]
pub struct FeatureSelection {
    /// One entry per original feature, in original column order.
    pub ranking: Vec<FeatureRank>,
    /// Selected feature names, original relative order preserved.
    pub feature_set: Vec<String>,
    pub n_features_selected: usize,
    /// Scores per subset size, recorded from the full set down to the
    /// minimum. Feeds the report's elimination curve.
    pub cv_scores: Vec<SubsetScore>,
}

impl FeatureSelection {
    /// Project a dataset onto exactly the selected feature set, preserving
    /// row order. The dataset must already contain every selected column.
    pub fn project(&self, ds: &Dataset) -> Result<Dataset, PipelineError> {
        ds.select_columns(&self.feature_set)
    }

    /// Project several datasets; all outputs share identical column
    /// names and order.
    pub fn project_all(&self, datasets: &[&Dataset]) -> Result<Vec<Dataset>, PipelineError> {
        datasets.iter().map(|ds| self.project(ds)).collect()
    }
}

/// Cross-validated recursive feature elimination.
///
/// Each round scores the current working subset by stratified k-fold
/// cross-validation, then drops the single feature the auxiliary estimator
/// ranks least important (earliest original column on ties) until the
/// minimum retained count is reached. The winning subset size is the one
/// with the best recorded mean score, ties resolved toward the larger
/// subset. Folds are computed once from the seed and reused by every round,
/// so per-size scores are comparable.
#[derive(Debug, Clone)]
pub struct RfeCv {
    config: SelectionConfig,
}

impl RfeCv {
    pub fn new(config: SelectionConfig) -> Self {
        assert!(config.min_features >= 1, "min_features must be at least 1");
        RfeCv { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Run elimination on the training split.
    ///
    /// `estimator` is the unfit auxiliary ensemble; a fresh clone is fitted
    /// per fold and per round, the original is never mutated.
    pub fn fit<E>(
        &self,
        estimator: &E,
        x: &Dataset,
        y: &Array1<i32>,
    ) -> Result<FeatureSelection, PipelineError>
    where
        E: ClassifierModel + FeatureImportance + Clone + Sync,
    {
        let n_total = x.n_cols();
        let min_features = self.config.min_features;
        if min_features > n_total {
            return Err(PipelineError::InvalidMinFeatures {
                requested: min_features,
                available: n_total,
            });
        }

        let folds = stratified_kfold_indices(y, self.config.folds, self.config.seed)?;
        let values = x.values();

        // Working set of original column indices, kept sorted ascending so
        // the lowest-importance scan breaks ties toward the earliest column.
        let mut working: Vec<usize> = (0..n_total).collect();
        let mut removed: Vec<usize> = Vec::new();
        let mut trail: Vec<SubsetScore> = Vec::new();

        loop {
            let sub = values.select(Axis(1), &working);

            // Collected in fold order so the mean is reduced the same way
            // on every run regardless of scheduling.
            let fold_scores: Vec<f64> = folds
                .par_iter()
                .map(|(train, test)| {
                    let mut est = estimator.clone();
                    est.fit(&sub.select(Axis(0), train), &y.select(Axis(0), train));

                    let x_test = sub.select(Axis(0), test);
                    let y_test = y.select(Axis(0), test);
                    let y_pred = est.predict(&x_test);
                    let proba = est.predict_proba(&x_test);
                    self.config.scoring.compute(&y_test, &y_pred, proba.as_ref())
                })
                .collect();
            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;

            trail.push(SubsetScore {
                n_features: working.len(),
                mean_score,
            });
            log::debug!(
                "elimination round: {} features, mean {} = {:.4}",
                working.len(),
                self.config.scoring.as_str(),
                mean_score
            );

            if working.len() == min_features {
                break;
            }

            let mut est = estimator.clone();
            est.fit(&sub, y);
            let importances = est.importances();
            assert_eq!(
                importances.len(),
                working.len(),
                "estimator importances must align with the working subset"
            );

            let mut drop_pos = 0;
            for (pos, &score) in importances.iter().enumerate() {
                if score < importances[drop_pos] {
                    drop_pos = pos;
                }
            }
            removed.push(working.remove(drop_pos));
        }

        // Best mean score wins; the trail runs from the full set downward,
        // so a strict comparison keeps the larger subset on ties.
        let mut best = &trail[0];
        for candidate in &trail[1..] {
            if candidate.mean_score > best.mean_score {
                best = candidate;
            }
        }
        let n_selected = best.n_features;

        // Features removed while the subset was still larger than the
        // winning size are the eliminated ones; everything present at the
        // winning size is selected with rank 1.
        let n_eliminated = n_total - n_selected;
        let mut selected = vec![true; n_total];
        let mut rank = vec![1usize; n_total];
        for (order, &col) in removed.iter().enumerate().take(n_eliminated) {
            selected[col] = false;
            rank[col] = n_total - order;
        }

        let ranking: Vec<FeatureRank> = x
            .columns()
            .iter()
            .enumerate()
            .map(|(col, name)| FeatureRank {
                feature: name.clone(),
                selected: selected[col],
                rank: rank[col],
            })
            .collect();

        let feature_set: Vec<String> = ranking
            .iter()
            .filter(|row| row.selected)
            .map(|row| row.feature.clone())
            .collect();
        debug_assert_eq!(feature_set.len(), n_selected);

        log::info!(
            "selected {} of {} features (best mean {} = {:.4})",
            n_selected,
            n_total,
            self.config.scoring.as_str(),
            best.mean_score
        );

        Ok(FeatureSelection {
            ranking,
            feature_set,
            n_features_selected: n_selected,
            cv_scores: trail,
        })
    }
}

impl Default for RfeCv {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}
