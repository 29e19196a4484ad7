//! End-to-end training run on synthetic passenger-satisfaction data.
//!
//! Plays the role of the data-generation and orchestration collaborators:
//! builds a seeded synthetic dataset, runs the split / selection / training
//! / evaluation flow, and writes the HTML report plus diagnostic plots.
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nps_classifiers::config::{SelectionConfig, SplitConfig};
use nps_classifiers::data_handling::{split_dataset, Dataset};
use nps_classifiers::evaluation::{cross_val_score, evaluate_split, get_model_metrics};
use nps_classifiers::feature_selection::RfeCv;
use nps_classifiers::models::{ClassifierModel, FeatureImportance, RandomForestClassifier};
use nps_classifiers::pipeline::{make_logreg_pipeline, ModelArtifact};
use nps_classifiers::report::{plots, render_training_report};
use nps_classifiers::stats::Scoring;

const FEATURES: &[&str] = &[
    "Edad",
    "Distancia_Vuelo",
    "Wifi_a_bordo",
    "Facilidad_Reserva",
    "Embarque_Online",
    "Comodidad_Asiento",
    "Entretenimiento",
    "Servicio_Abordo",
    "Manejo_Equipaje",
    "Limpieza",
];

/// Synthetic satisfaction survey: a handful of service scores drive the
/// label, the rest is noise the selector should learn to discard.
fn synthetic_satisfaction_dataset(n_rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns: Vec<String> = FEATURES.iter().map(|s| s.to_string()).collect();
    columns.push("target".to_string());

    let mut data = Vec::with_capacity(n_rows * columns.len());
    for _ in 0..n_rows {
        let edad = rng.gen_range(7..86) as f32;
        let distancia = rng.gen_range(100..5000) as f32;
        let likert: Vec<f32> = (0..8).map(|_| rng.gen_range(1..=5) as f32).collect();

        // Wifi, online boarding, seat comfort and entertainment carry the
        // signal; the additive noise keeps the classes overlapping.
        let driver = likert[0] + likert[2] + likert[3] + likert[4];
        let target = if driver + rng.gen_range(-2.0..2.0) > 12.0 {
            1.0
        } else {
            0.0
        };

        data.push(edad);
        data.push(distancia);
        data.extend_from_slice(&likert);
        data.push(target);
    }

    let values = Array2::from_shape_vec((n_rows, columns.len()), data)
        .expect("synthetic rows form a rectangular matrix");
    Dataset::new(columns, values)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dataset = synthetic_satisfaction_dataset(1000, 42);
    let split = split_dataset(&dataset, &SplitConfig::default())?;

    let selector = RfeCv::new(SelectionConfig {
        min_features: 3,
        ..SelectionConfig::default()
    });
    let estimator = RandomForestClassifier::with_defaults();
    let selection = selector.fit(&estimator, &split.train.x, &split.train.y)?;
    println!(
        "Selected {} features: {:?}",
        selection.n_features_selected, selection.feature_set
    );

    let projected = selection.project_all(&[&split.train.x, &split.valid.x, &split.test.x])?;
    let (x_train, x_valid, x_test) = (&projected[0], &projected[1], &projected[2]);

    let mut pipeline = make_logreg_pipeline(1000, 42);
    pipeline.fit(x_train.values(), &split.train.y);

    let (train_metrics, valid_metrics) = get_model_metrics(
        &pipeline,
        x_train.values(),
        &split.train.y,
        x_valid.values(),
        &split.valid.y,
    );
    println!(
        "Validation Metrics: Accuracy={:.4}, F1={:.4}, AUC={}",
        valid_metrics.accuracy,
        valid_metrics.f1,
        valid_metrics
            .auc
            .map_or("undefined".to_string(), |v| format!("{:.4}", v))
    );

    let cv = cross_val_score(
        || make_logreg_pipeline(1000, 42),
        x_train.values(),
        &split.train.y,
        5,
        Scoring::F1,
        42,
    )?;
    println!("CV f1: mean={:.4}, std={:.4}", cv.mean, cv.std);

    // Importances of a forest refit on the selected subset, for the report.
    let mut forest = RandomForestClassifier::with_defaults();
    forest.fit(x_train.values(), &split.train.y);
    let importances = forest.importances();

    let report = render_training_report(
        &selection.ranking,
        &train_metrics,
        &valid_metrics,
        &cv,
        Scoring::F1.as_str(),
    );
    std::fs::write("training_report.html", report)?;

    plots::plot_cv_scores(
        &selection.cv_scores,
        selector.config().scoring.as_str(),
        "Cross-validated score per subset size",
    )
    .write_html("cv_scores.html");
    plots::plot_feature_importances(
        x_train.columns(),
        importances.as_slice().expect("contiguous importances"),
        "Feature importance",
    )
    .write_html("feature_importance.html");

    let artifact = ModelArtifact::new(selection.feature_set.clone(), pipeline);
    if let Some(proba) = artifact.predict_proba(&split.test.x)? {
        plots::plot_roc_curve(&split.test.y, &proba, "Test ROC").write_html("roc_test.html");
    }
    let test_metrics = evaluate_split(&artifact.pipeline, x_test.values(), &split.test.y);
    println!(
        "Test Metrics: Accuracy={:.4}, F1={:.4}",
        test_metrics.accuracy, test_metrics.f1
    );

    Ok(())
}
