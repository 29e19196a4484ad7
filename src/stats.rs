//! Point-metric primitives for binary classifiers.
//!
//! Labels follow the crate convention: 1 is the positive (satisfied) class,
//! 0 the negative. Metric outputs are f64 regardless of feature precision.
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Fraction of predictions matching the true labels.
pub fn accuracy_score(y_true: &Array1<i32>, y_pred: &Array1<i32>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "labels and predictions must have equal lengths"
    );
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// F1 score for the positive class. Degenerate denominators score 0.0.
pub fn f1_score(y_true: &Array1<i32>, y_pred: &Array1<i32>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "labels and predictions must have equal lengths"
    );
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fnegs = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        match (t, p) {
            (1, 1) => tp += 1,
            (_, 1) => fp += 1,
            (1, _) => fnegs += 1,
            _ => {}
        }
    }
    if tp == 0 {
        return 0.0;
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fnegs) as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Area under the ROC curve from per-instance scores.
///
/// Computed as the Mann-Whitney rank statistic with midranks for tied
/// scores. Returns `None` when one of the classes is absent, in which case
/// the curve is undefined.
pub fn roc_auc_score(y_true: &Array1<i32>, scores: &Array1<f32>) -> Option<f64> {
    assert_eq!(
        y_true.len(),
        scores.len(),
        "labels and scores must have equal lengths"
    );
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&v| v == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Midranks: tied scores share the average of their rank positions.
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = midrank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t == 1)
        .map(|(_, &r)| r)
        .sum();

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

/// Points of the ROC curve (false-positive rate, true-positive rate),
/// ordered by descending score threshold. Used by the report plots.
pub fn roc_curve(y_true: &Array1<i32>, scores: &Array1<f32>) -> Vec<(f64, f64)> {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&v| v == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut points = vec![(0.0, 0.0)];
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        for k in i..=j {
            if y_true[order[k]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        points.push((fp as f64 / n_neg as f64, tp as f64 / n_pos as f64));
        i = j + 1;
    }
    points
}

/// Scoring metric used by cross-validation and the feature selector.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    RocAuc,
    Accuracy,
    F1,
}

impl Scoring {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scoring::RocAuc => "roc_auc",
            Scoring::Accuracy => "accuracy",
            Scoring::F1 => "f1",
        }
    }

    /// Score one evaluation fold. `scores` carries per-instance probability
    /// scores when the model can produce them; AUC falls back to the hard
    /// labels otherwise.
    pub fn compute(
        &self,
        y_true: &Array1<i32>,
        y_pred: &Array1<i32>,
        scores: Option<&Array1<f32>>,
    ) -> f64 {
        match self {
            Scoring::Accuracy => accuracy_score(y_true, y_pred),
            Scoring::F1 => f1_score(y_true, y_pred),
            Scoring::RocAuc => {
                let fallback: Array1<f32>;
                let s = match scores {
                    Some(s) => s,
                    None => {
                        fallback = y_pred.mapv(|v| v as f32);
                        &fallback
                    }
                };
                // A single-class fold has no defined curve; score as chance.
                roc_auc_score(y_true, s).unwrap_or(0.5)
            }
        }
    }
}

impl FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "roc_auc" | "auc" => Ok(Scoring::RocAuc),
            "accuracy" => Ok(Scoring::Accuracy),
            "f1" => Ok(Scoring::F1),
            _ => Err(format!("Unknown scoring metric: {}", s)),
        }
    }
}
