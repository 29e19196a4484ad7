//! Reporting helpers for the tracking collaborator.
//!
//! Renders the ranking table and metric records into a small standalone
//! HTML page, and wraps plotting helpers (Plotly) used by the demo. This
//! module owns no persistence; callers decide where the markup goes.
pub mod plots;

use maud::html;

use crate::evaluation::{CvScores, MetricsRecord};
use crate::feature_selection::FeatureRank;

fn metric_row(split: &str, record: &MetricsRecord) -> maud::Markup {
    html! {
        tr {
            td { (split) }
            td { (record.auc.map_or("undefined".to_string(), |v| format!("{:.4}", v))) }
            td { (format!("{:.4}", record.accuracy)) }
            td { (format!("{:.4}", record.f1)) }
        }
    }
}

/// Render the training-run summary as a standalone HTML fragment: point
/// metrics per split, the cross-validated aggregate, and the feature
/// ranking table sorted by rank.
pub fn render_training_report(
    ranking: &[FeatureRank],
    train: &MetricsRecord,
    valid: &MetricsRecord,
    cv: &CvScores,
    scoring: &str,
) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut rows: Vec<&FeatureRank> = ranking.iter().collect();
    rows.sort_by_key(|r| r.rank);

    let markup = html! {
        div class="training-report" {
            h1 { "Training report" }
            p class="generated" { "Generated " (generated) }

            h2 { "Metrics" }
            table {
                thead {
                    tr { th { "Split" } th { "AUC" } th { "Accuracy" } th { "F1" } }
                }
                tbody {
                    (metric_row("train", train))
                    (metric_row("valid", valid))
                }
            }
            p {
                "Cross-validated " (scoring) ": mean "
                (format!("{:.4}", cv.mean)) " / std " (format!("{:.4}", cv.std))
                " over " (cv.scores.len()) " folds"
            }

            h2 { "Feature ranking" }
            table {
                thead {
                    tr { th { "N°" } th { "Feature" } th { "Selected" } th { "Rank" } }
                }
                tbody {
                    @for (i, row) in rows.iter().enumerate() {
                        tr {
                            td { (i + 1) }
                            td { (row.feature) }
                            td { (row.selected) }
                            td { (row.rank) }
                        }
                    }
                }
            }
        }
    };

    markup.into_string()
}
