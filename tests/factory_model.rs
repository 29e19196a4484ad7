//! Integration tests for models, the factory, and the two-stage pipeline.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nps_classifiers::config::{ModelConfig, ModelType};
use nps_classifiers::data_handling::Dataset;
use nps_classifiers::error::PipelineError;
use nps_classifiers::models::{
    build_model, ClassifierModel, FeatureImportance, LogisticRegression, RandomForestClassifier,
};
use nps_classifiers::pipeline::{build_pipeline, make_logreg_pipeline, ModelArtifact, Pipeline};
use nps_classifiers::preprocessing::{fit_scaler, transform_all};

/// Two clusters around -1 and +1 on the first feature, noise on the second.
fn clustered_data(n_rows: usize, seed: u64) -> (Array2<f32>, Array1<i32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_rows * 2);
    let mut labels = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let y = (i % 2) as i32;
        let center = if y == 1 { 1.0 } else { -1.0 };
        data.push(center + rng.gen_range(-0.4..0.4));
        data.push(rng.gen_range(-1.0..1.0));
        labels.push(y);
    }
    (
        Array2::from_shape_vec((n_rows, 2), data).unwrap(),
        Array1::from_vec(labels),
    )
}

// ---------------------------------------------------------------------------
// Individual models
// ---------------------------------------------------------------------------

#[test]
fn logistic_regression_separates_clusters() {
    let (x, y) = clustered_data(200, 21);
    let mut model = LogisticRegression::with_defaults();
    model.fit(&x, &y);

    let pred = model.predict(&x);
    let correct = pred.iter().zip(y.iter()).filter(|(a, b)| a == b).count();
    assert!(
        correct as f64 / y.len() as f64 > 0.95,
        "only {}/{} correct",
        correct,
        y.len()
    );

    let proba = model.predict_proba(&x).expect("logreg produces probabilities");
    assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn random_forest_importances_favor_informative_feature() {
    let (x, y) = clustered_data(200, 22);
    let mut forest = RandomForestClassifier::new(20, 8, 5);
    forest.fit(&x, &y);

    let imp = forest.importances();
    assert_eq!(imp.len(), 2);
    assert!(
        imp[0] > imp[1],
        "informative feature should dominate: {:?}",
        imp
    );

    let total: f32 = imp.iter().sum();
    assert!((total - 1.0).abs() < 1e-3, "importances sum to {}", total);
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

#[test]
fn model_type_from_str_round_trips() {
    let logreg: ModelType = "logreg".parse().unwrap();
    assert!(matches!(logreg, ModelType::LogReg { max_iter: 1000, .. }));

    let forest: ModelType = "random_forest".parse().unwrap();
    assert!(matches!(forest, ModelType::RandomForest { n_estimators: 20, .. }));

    let unknown: Result<ModelType, _> = "gbdt".parse();
    assert!(unknown.is_err());
}

#[test]
fn factory_builds_named_models() {
    let logreg = build_model(&ModelConfig::default());
    assert_eq!(logreg.name(), "logreg");

    let forest = build_model(&ModelConfig::new(
        0.1,
        "rf".parse::<ModelType>().unwrap(),
    ));
    assert_eq!(forest.name(), "random_forest");
}

#[test]
fn model_config_serializes_to_json() {
    let cfg = ModelConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("learning_rate"));
    assert!(json.contains("LogReg"));
}

// ---------------------------------------------------------------------------
// Pipeline composition
// ---------------------------------------------------------------------------

#[test]
fn pipeline_matches_manual_scale_then_fit() {
    let (x, y) = clustered_data(120, 23);

    let mut pipeline = make_logreg_pipeline(1000, 42);
    pipeline.fit(&x, &y);

    let sc = fit_scaler(&x);
    let mut manual = LogisticRegression::new(1000, 0.1, 1e-3, 42);
    manual.fit(&transform_all(&x, &sc), &y);

    let (x_new, _) = clustered_data(30, 24);
    assert_eq!(
        pipeline.predict(&x_new),
        manual.predict(&transform_all(&x_new, &sc)),
        "pipeline must equal explicit scale-then-fit composition"
    );
}

#[test]
fn pipeline_scaler_stays_frozen_after_fit() {
    let (x_train, y_train) = clustered_data(100, 25);
    let (x_valid, _) = clustered_data(40, 26);

    let mut pipeline = make_logreg_pipeline(500, 7);
    pipeline.fit(&x_train, &y_train);
    let fitted = pipeline.scaler().expect("fit stores the scaler").clone();

    let _ = pipeline.predict(&x_valid);
    let _ = pipeline.predict_proba(&x_valid);

    assert_eq!(
        pipeline.scaler().unwrap(),
        &fitted,
        "scoring must never refit the scaler"
    );
}

#[test]
fn pipeline_supports_swapped_stage_two() {
    let (x, y) = clustered_data(120, 27);

    // Same scaling stage, different classifier, via the factory path.
    let mut forest_pipeline = build_pipeline(&ModelConfig::new(
        0.1,
        ModelType::RandomForest {
            n_estimators: 10,
            max_depth: 6,
            seed: 3,
        },
    ));
    forest_pipeline.fit(&x, &y);

    let pred = forest_pipeline.predict(&x);
    let correct = pred.iter().zip(y.iter()).filter(|(a, b)| a == b).count();
    assert!(correct as f64 / y.len() as f64 > 0.9);

    // And directly with a generic parameter.
    let mut generic = Pipeline::new(RandomForestClassifier::new(10, 6, 3));
    generic.fit(&x, &y);
    assert_eq!(generic.predict(&x), pred);
}

// ---------------------------------------------------------------------------
// Deployable artifact
// ---------------------------------------------------------------------------

#[test]
fn artifact_predicts_over_exactly_its_feature_set() {
    let (x, y) = clustered_data(100, 28);
    let train = Dataset::new(vec!["signal".into(), "noise".into()], x.clone());

    let mut pipeline = make_logreg_pipeline(500, 1);
    pipeline.fit(train.values(), &y);
    let artifact = ModelArtifact::new(
        vec!["signal".to_string(), "noise".to_string()],
        pipeline,
    );

    // Serving data with an extra column and shuffled order still scores,
    // because projection realigns it to the feature set.
    let mut data = Vec::new();
    for row in 0..x.nrows() {
        data.push(99.0);
        data.push(x[(row, 1)]);
        data.push(x[(row, 0)]);
    }
    let serving = Dataset::new(
        vec!["extra".into(), "noise".into(), "signal".into()],
        Array2::from_shape_vec((x.nrows(), 3), data).unwrap(),
    );

    let direct = artifact.predict(&train).unwrap();
    let realigned = artifact.predict(&serving).unwrap();
    assert_eq!(direct, realigned);

    // Missing feature columns are an error, never silently invented.
    let partial = train.select_columns(&["signal".to_string()]).unwrap();
    let err = artifact.predict(&partial).unwrap_err();
    assert_eq!(
        err,
        PipelineError::ColumnMismatch {
            missing: vec!["noise".to_string()]
        }
    );
}
