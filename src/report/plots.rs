use ndarray::Array1;
use plotly::common::Mode;
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot, Scatter};

use crate::feature_selection::SubsetScore;
use crate::stats::roc_curve;

/// Plot the cross-validated score against the retained subset size, the
/// diagnostic curve behind the elimination stopping decision.
pub fn plot_cv_scores(trail: &[SubsetScore], scoring: &str, title: &str) -> Plot {
    let sizes: Vec<usize> = trail.iter().map(|s| s.n_features).collect();
    let means: Vec<f64> = trail.iter().map(|s| s.mean_score).collect();

    let trace = Scatter::new(sizes, means)
        .mode(Mode::LinesMarkers)
        .name("mean CV score");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Retained features"))
        .y_axis(Axis::new().title(scoring));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Plot per-feature importances as a bar chart, highest first.
pub fn plot_feature_importances(names: &[String], importances: &[f32], title: &str) -> Plot {
    assert_eq!(
        names.len(),
        importances.len(),
        "Names and importances must have the same length"
    );

    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|&a, &b| {
        importances[b]
            .partial_cmp(&importances[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sorted_names: Vec<String> = order.iter().map(|&i| names[i].clone()).collect();
    let sorted_values: Vec<f32> = order.iter().map(|&i| importances[i]).collect();

    let trace = Bar::new(sorted_names, sorted_values).name("importance");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Feature"))
        .y_axis(Axis::new().title("Importance"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Plot the ROC curve for per-instance probability scores.
pub fn plot_roc_curve(y_true: &Array1<i32>, scores: &Array1<f32>, title: &str) -> Plot {
    let points = roc_curve(y_true, scores);
    let fpr: Vec<f64> = points.iter().map(|p| p.0).collect();
    let tpr: Vec<f64> = points.iter().map(|p| p.1).collect();

    let curve = Scatter::new(fpr, tpr).mode(Mode::Lines).name("ROC");

    let reference_line = Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("chance")
        .line(
            plotly::common::Line::new()
                .color("red")
                .dash(plotly::common::DashType::Dash),
        );

    let mut plot = Plot::new();
    plot.add_trace(curve);
    plot.add_trace(reference_line);
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("False positive rate"))
            .y_axis(Axis::new().title("True positive rate")),
    );
    plot
}
