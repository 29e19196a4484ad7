//! Integration tests for recursive feature elimination and subset projection.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nps_classifiers::config::SelectionConfig;
use nps_classifiers::data_handling::Dataset;
use nps_classifiers::error::PipelineError;
use nps_classifiers::feature_selection::{FeatureSelection, RfeCv};
use nps_classifiers::models::{ClassifierModel, FeatureImportance, RandomForestClassifier};
use nps_classifiers::stats::Scoring;

/// Ten-feature dataset where columns 2 and 5 carry the label signal and the
/// rest is uniform noise.
fn signal_and_noise_dataset(n_rows: usize, seed: u64) -> (Dataset, Array1<i32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<String> = (0..10).map(|i| format!("f{}", i)).collect();

    let mut data = Vec::with_capacity(n_rows * 10);
    let mut labels = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let y = (i % 2) as i32;
        labels.push(y);
        for col in 0..10 {
            let v = if col == 2 || col == 5 {
                y as f32 + rng.gen_range(-0.3..0.3)
            } else {
                rng.gen_range(0.0..1.0)
            };
            data.push(v);
        }
    }

    (
        Dataset::new(columns, Array2::from_shape_vec((n_rows, 10), data).unwrap()),
        Array1::from_vec(labels),
    )
}

// ---------------------------------------------------------------------------
// Elimination mechanics (deterministic stub estimator)
// ---------------------------------------------------------------------------

/// Ranks features by column variance and predicts by thresholding the first
/// varying column. Constant sentinel 7.0 marks a column that sabotages
/// predictions while present, which pins down the recorded score trail.
#[derive(Clone)]
struct VarianceStub {
    importances: Vec<f32>,
    signal: Option<usize>,
    invert: bool,
}

impl VarianceStub {
    fn new() -> Self {
        VarianceStub {
            importances: Vec::new(),
            signal: None,
            invert: false,
        }
    }
}

impl ClassifierModel for VarianceStub {
    fn fit(&mut self, x: &Array2<f32>, _y: &Array1<i32>) {
        let n = x.nrows() as f32;
        self.importances = x
            .columns()
            .into_iter()
            .map(|col| {
                let mean = col.sum() / n;
                col.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n
            })
            .collect();
        self.signal = self.importances.iter().position(|&v| v > 1e-6);
        self.invert = x.row(0).iter().any(|&v| v == 7.0);
    }

    fn predict(&self, x: &Array2<f32>) -> Array1<i32> {
        match self.signal {
            Some(col) => x.column(col).mapv(|v| {
                let label = if v >= 0.5 { 1 } else { 0 };
                if self.invert {
                    1 - label
                } else {
                    label
                }
            }),
            None => Array1::zeros(x.nrows()),
        }
    }
}

impl FeatureImportance for VarianceStub {
    fn importances(&self) -> Array1<f32> {
        Array1::from_vec(self.importances.clone())
    }
}

fn sentinel_dataset() -> (Dataset, Array1<i32>) {
    let mut data = Vec::new();
    let mut labels = Vec::new();
    for i in 0..8 {
        let y = (i % 2) as i32;
        labels.push(y);
        data.push(7.0);
        data.push(y as f32);
        data.push(9.0);
    }
    (
        Dataset::new(
            vec!["ruido_a".into(), "senal".into(), "ruido_b".into()],
            Array2::from_shape_vec((8, 3), data).unwrap(),
        ),
        Array1::from_vec(labels),
    )
}

#[test]
fn elimination_order_ranks_and_tie_breaks() {
    let (x, y) = sentinel_dataset();
    let selector = RfeCv::new(SelectionConfig {
        folds: 2,
        scoring: Scoring::Accuracy,
        min_features: 1,
        seed: 0,
    });

    let selection = selector.fit(&VarianceStub::new(), &x, &y).unwrap();

    // Score trail: the sentinel column sabotages the full set, then both
    // smaller subsets score perfectly.
    let trail: Vec<(usize, f64)> = selection
        .cv_scores
        .iter()
        .map(|s| (s.n_features, s.mean_score))
        .collect();
    assert_eq!(trail.len(), 3);
    assert_eq!(trail[0].0, 3);
    assert!(trail[0].1 < 0.5, "full-set score should be sabotaged");
    assert!((trail[1].1 - 1.0).abs() < 1e-9);
    assert!((trail[2].1 - 1.0).abs() < 1e-9);

    // Sizes 2 and 1 tie on the mean score; the larger subset must win.
    assert_eq!(selection.n_features_selected, 2);
    assert_eq!(
        selection.feature_set,
        vec!["senal".to_string(), "ruido_b".to_string()],
        "selected set keeps original column order"
    );

    // Both constant columns tie on importance; the earliest original column
    // is removed first and carries the largest rank.
    let by_name = |name: &str| {
        selection
            .ranking
            .iter()
            .find(|r| r.feature == name)
            .unwrap()
            .clone()
    };
    let ruido_a = by_name("ruido_a");
    assert!(!ruido_a.selected);
    assert_eq!(ruido_a.rank, 3);
    assert!(by_name("senal").selected);
    assert_eq!(by_name("senal").rank, 1);
    assert!(by_name("ruido_b").selected);
    assert_eq!(by_name("ruido_b").rank, 1);
}

// ---------------------------------------------------------------------------
// Elimination with the stock ensemble estimator
// ---------------------------------------------------------------------------

#[test]
fn rfecv_selects_between_min_and_all_features() {
    // 10 features, min 3, 5 folds.
    let (x, y) = signal_and_noise_dataset(240, 9);
    let selector = RfeCv::new(SelectionConfig {
        folds: 5,
        min_features: 3,
        ..SelectionConfig::default()
    });
    let estimator = RandomForestClassifier::new(15, 6, 3);

    let selection = selector.fit(&estimator, &x, &y).unwrap();

    assert!(
        (3..=10).contains(&selection.n_features_selected),
        "selected count {} outside [3, 10]",
        selection.n_features_selected
    );
    assert_eq!(selection.ranking.len(), 10, "one ranking row per feature");

    let rank_one = selection.ranking.iter().filter(|r| r.rank == 1).count();
    assert_eq!(rank_one, selection.n_features_selected);
    for row in &selection.ranking {
        assert_eq!(row.selected, row.rank == 1, "selected iff rank == 1");
    }

    // Eliminated ranks are exactly the contiguous range above the winner.
    let mut eliminated: Vec<usize> = selection
        .ranking
        .iter()
        .filter(|r| !r.selected)
        .map(|r| r.rank)
        .collect();
    eliminated.sort_unstable();
    let expected: Vec<usize> = (selection.n_features_selected + 1..=10).collect();
    assert_eq!(eliminated, expected);

    // The informative columns should survive elimination.
    assert!(selection.feature_set.contains(&"f2".to_string()));
    assert!(selection.feature_set.contains(&"f5".to_string()));

    // The recorded trail runs from the full set down to the minimum.
    let sizes: Vec<usize> = selection.cv_scores.iter().map(|s| s.n_features).collect();
    assert_eq!(sizes, (3..=10).rev().collect::<Vec<_>>());
}

#[test]
fn rfecv_is_deterministic_for_a_seed() {
    let (x, y) = signal_and_noise_dataset(160, 5);
    let selector = RfeCv::new(SelectionConfig {
        folds: 4,
        min_features: 2,
        ..SelectionConfig::default()
    });
    let estimator = RandomForestClassifier::new(10, 5, 3);

    let a = selector.fit(&estimator, &x, &y).unwrap();
    let b = selector.fit(&estimator, &x, &y).unwrap();

    assert_eq!(a.feature_set, b.feature_set);
    assert_eq!(a.ranking, b.ranking);
    assert_eq!(a.cv_scores, b.cv_scores);
}

#[test]
fn min_features_above_total_fails_before_any_work() {
    let (x, y) = signal_and_noise_dataset(40, 1);
    let selector = RfeCv::new(SelectionConfig {
        min_features: 11,
        ..SelectionConfig::default()
    });

    let err = selector
        .fit(&RandomForestClassifier::with_defaults(), &x, &y)
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::InvalidMinFeatures {
            requested: 11,
            available: 10
        }
    );
}

#[test]
fn unusable_fold_counts_are_rejected() {
    let (x, y) = signal_and_noise_dataset(40, 2);

    let too_few = RfeCv::new(SelectionConfig {
        folds: 1,
        ..SelectionConfig::default()
    });
    assert!(matches!(
        too_few
            .fit(&RandomForestClassifier::with_defaults(), &x, &y)
            .unwrap_err(),
        PipelineError::InsufficientFolds { folds: 1, .. }
    ));

    // 40 rows → 20 per class; 21 folds cannot all hold a minority instance.
    let too_many = RfeCv::new(SelectionConfig {
        folds: 21,
        ..SelectionConfig::default()
    });
    assert!(matches!(
        too_many
            .fit(&RandomForestClassifier::with_defaults(), &x, &y)
            .unwrap_err(),
        PipelineError::InsufficientFolds {
            folds: 21,
            minority_count: 20
        }
    ));
}

// ---------------------------------------------------------------------------
// Selection projection
// ---------------------------------------------------------------------------

fn selection_of(names: &[&str]) -> FeatureSelection {
    FeatureSelection {
        ranking: Vec::new(),
        feature_set: names.iter().map(|s| s.to_string()).collect(),
        n_features_selected: names.len(),
        cv_scores: Vec::new(),
    }
}

#[test]
fn projection_yields_identical_columns_across_datasets() {
    // Train 600x10 and valid 200x10 projected onto 4 names.
    let (train, _) = signal_and_noise_dataset(600, 3);
    let (valid, _) = signal_and_noise_dataset(200, 4);
    let selection = selection_of(&["f1", "f3", "f5", "f8"]);

    let projected = selection.project_all(&[&train, &valid]).unwrap();

    assert_eq!(projected[0].n_rows(), 600);
    assert_eq!(projected[0].n_cols(), 4);
    assert_eq!(projected[1].n_rows(), 200);
    assert_eq!(projected[1].n_cols(), 4);
    assert_eq!(
        projected[0].columns(),
        projected[1].columns(),
        "projected datasets must expose identical column names in identical order"
    );
    assert_eq!(
        projected[0].columns(),
        &["f1".to_string(), "f3".to_string(), "f5".to_string(), "f8".to_string()]
    );
}

#[test]
fn projection_preserves_row_order() {
    let ds = Dataset::new(
        vec!["id".into(), "v".into()],
        Array2::from_shape_vec((4, 2), vec![0.0, 9.0, 1.0, 8.0, 2.0, 7.0, 3.0, 6.0]).unwrap(),
    );
    let selection = selection_of(&["id"]);

    let projected = selection.project(&ds).unwrap();
    let ids: Vec<f32> = projected.values().column(0).to_vec();
    assert_eq!(ids, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn projection_rejects_datasets_missing_columns() {
    let (ds, _) = signal_and_noise_dataset(20, 6);
    let selection = selection_of(&["f0", "nope", "f4", "missing_too"]);

    let err = selection.project(&ds).unwrap_err();
    assert_eq!(
        err,
        PipelineError::ColumnMismatch {
            missing: vec!["nope".to_string(), "missing_too".to_string()]
        }
    );
}
