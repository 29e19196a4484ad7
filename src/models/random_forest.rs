use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::models::classifier_trait::{ClassifierModel, FeatureImportance};

const MIN_SAMPLES_SPLIT: usize = 2;

/// Random forest of CART trees over bootstrap samples.
///
/// Used as the auxiliary ranking estimator for recursive feature
/// elimination: besides the usual fit/predict surface it exposes gini
/// impurity-decrease importances, normalized per tree and averaged across
/// the forest. Each tree derives its own seed from the forest seed, so a
/// fit is deterministic regardless of how the trees are scheduled.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    n_estimators: usize,
    max_depth: usize,
    seed: u64,
    trees: Vec<TreeNode>,
    importances: Option<Array1<f32>>,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        proba: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl RandomForestClassifier {
    pub fn new(n_estimators: usize, max_depth: usize, seed: u64) -> Self {
        assert!(n_estimators > 0, "forest needs at least one tree");
        RandomForestClassifier {
            n_estimators,
            max_depth,
            seed,
            trees: Vec::new(),
            importances: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(20, 10, 42)
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "feature rows and labels must have equal lengths"
        );
        let n = x.nrows();
        let n_features = x.ncols();
        let m_try = ((n_features as f64).sqrt().round() as usize).max(1);

        let fitted: Vec<(TreeNode, Vec<f32>)> = (0..self.n_estimators)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

                let mut importances = vec![0.0f32; n_features];
                let tree = build_tree(
                    x,
                    y,
                    &sample,
                    0,
                    self.max_depth,
                    m_try,
                    sample.len() as f32,
                    &mut rng,
                    &mut importances,
                );

                // Normalize per tree so every tree votes with equal weight.
                let total: f32 = importances.iter().sum();
                if total > 0.0 {
                    for v in importances.iter_mut() {
                        *v /= total;
                    }
                }
                (tree, importances)
            })
            .collect();

        let mut mean_importances = Array1::<f32>::zeros(n_features);
        self.trees = Vec::with_capacity(self.n_estimators);
        for (tree, importances) in fitted {
            for (slot, v) in mean_importances.iter_mut().zip(importances.iter()) {
                *slot += v / self.n_estimators as f32;
            }
            self.trees.push(tree);
        }
        self.importances = Some(mean_importances);

        log::debug!(
            "fitted {} trees on {} rows x {} features",
            self.n_estimators,
            n,
            n_features
        );
    }

    fn predict(&self, x: &Array2<f32>) -> Array1<i32> {
        self.predict_proba(x)
            .expect("forest always produces probabilities")
            .mapv(|p| if p >= 0.5 { 1 } else { 0 })
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Option<Array1<f32>> {
        assert!(
            !self.trees.is_empty(),
            "model must be fit before predict"
        );
        let mut proba = Array1::<f32>::zeros(x.nrows());
        for row in 0..x.nrows() {
            let features = x.row(row);
            let sum: f32 = self
                .trees
                .iter()
                .map(|tree| descend(tree, &features))
                .sum();
            proba[row] = sum / self.trees.len() as f32;
        }
        Some(proba)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

impl FeatureImportance for RandomForestClassifier {
    fn importances(&self) -> Array1<f32> {
        self.importances
            .clone()
            .expect("model must be fit before importances")
    }
}

fn descend(node: &TreeNode, features: &ndarray::ArrayView1<f32>) -> f32 {
    match node {
        TreeNode::Leaf { proba } => *proba,
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if features[*feature] <= *threshold {
                descend(left, features)
            } else {
                descend(right, features)
            }
        }
    }
}

/// Evaluate every distinct-value split point of one feature, keeping the
/// lowest weighted child gini seen so far in `best`.
fn scan_feature(
    x: &Array2<f32>,
    y: &Array1<i32>,
    indices: &[usize],
    feature: usize,
    pos: usize,
    best: &mut Option<(usize, f32, f32)>,
) {
    let total = indices.len();
    let mut values: Vec<(f32, i32)> = indices.iter().map(|&i| (x[(i, feature)], y[i])).collect();
    values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut left_pos = 0usize;
    for split in 1..total {
        if values[split - 1].1 == 1 {
            left_pos += 1;
        }
        if values[split].0 == values[split - 1].0 {
            continue;
        }
        let left_total = split;
        let right_total = total - split;
        let right_pos = pos - left_pos;
        let weighted = (left_total as f32 * gini(left_pos, left_total)
            + right_total as f32 * gini(right_pos, right_total))
            / total as f32;
        if best.map_or(true, |(_, _, g)| weighted < g) {
            let threshold = (values[split - 1].0 + values[split].0) / 2.0;
            *best = Some((feature, threshold, weighted));
        }
    }
}

fn gini(pos: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let p = pos as f32 / total as f32;
    2.0 * p * (1.0 - p)
}

#[allow(clippy::too_many_arguments)]
fn build_tree(
    x: &Array2<f32>,
    y: &Array1<i32>,
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    m_try: usize,
    n_root: f32,
    rng: &mut StdRng,
    importances: &mut [f32],
) -> TreeNode {
    let total = indices.len();
    let pos = indices.iter().filter(|&&i| y[i] == 1).count();
    let leaf = TreeNode::Leaf {
        proba: pos as f32 / total as f32,
    };

    if depth >= max_depth || total < MIN_SAMPLES_SPLIT || pos == 0 || pos == total {
        return leaf;
    }

    let candidates = rand::seq::index::sample(rng, x.ncols(), m_try.min(x.ncols())).into_vec();
    let parent_gini = gini(pos, total);

    let mut best: Option<(usize, f32, f32)> = None; // (feature, threshold, child gini)
    for &feature in &candidates {
        scan_feature(x, y, indices, feature, pos, &mut best);
    }
    if best.is_none() {
        // Every sampled candidate was constant within the node; keep
        // drawing from the remaining features before giving up, so a
        // degenerate draw does not silence an informative column.
        for feature in 0..x.ncols() {
            if !candidates.contains(&feature) {
                scan_feature(x, y, indices, feature, pos, &mut best);
            }
        }
    }

    let Some((feature, threshold, child_gini)) = best else {
        // No feature has two distinct values among these samples.
        return leaf;
    };

    importances[feature] += (total as f32 / n_root) * (parent_gini - child_gini);

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[(i, feature)] <= threshold);

    let left = build_tree(
        x, y, &left_idx, depth + 1, max_depth, m_try, n_root, rng, importances,
    );
    let right = build_tree(
        x, y, &right_idx, depth + 1, max_depth, m_try, n_root, rng, importances,
    );

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}
