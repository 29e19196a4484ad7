use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::classifier_trait::ClassifierModel;

/// Logistic regression trained by batch gradient descent with an L2 penalty.
///
/// The iteration cap and the seed for weight initialization are
/// configurable; everything else about a fit is determined by the data.
/// Inputs are expected to be standardized (the pipeline's scaler stage).
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    max_iter: usize,
    learning_rate: f32,
    l2: f32,
    tol: f32,
    seed: u64,
    weights: Option<Array1<f32>>,
    bias: f32,
}

impl LogisticRegression {
    pub fn new(max_iter: usize, learning_rate: f32, l2: f32, seed: u64) -> Self {
        LogisticRegression {
            max_iter,
            learning_rate,
            l2,
            tol: 1e-5,
            seed,
            weights: None,
            bias: 0.0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(1000, 0.1, 1e-3, 42)
    }

    fn decision_function(&self, x: &Array2<f32>) -> Array1<f32> {
        let w = self
            .weights
            .as_ref()
            .expect("model must be fit before predict");
        x.dot(w) + self.bias
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

impl ClassifierModel for LogisticRegression {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "feature rows and labels must have equal lengths"
        );
        let n = x.nrows() as f32;
        let y_f: Array1<f32> = y.mapv(|v| v as f32);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut w: Array1<f32> = Array1::from_shape_fn(x.ncols(), |_| rng.gen_range(-0.01..0.01));
        let mut b = 0.0f32;

        for iter in 0..self.max_iter {
            let p = (x.dot(&w) + b).mapv(sigmoid);
            let err = &p - &y_f;

            let grad_w = x.t().dot(&err) / n + &(&w * self.l2);
            let grad_b = err.sum() / n;

            w = w - &(grad_w.mapv(|g| g * self.learning_rate));
            b -= grad_b * self.learning_rate;

            let grad_norm = grad_w.iter().fold(grad_b.abs(), |m, g| m.max(g.abs()));
            if grad_norm < self.tol {
                log::debug!("logistic regression converged after {} iterations", iter + 1);
                break;
            }
        }

        self.weights = Some(w);
        self.bias = b;
    }

    fn predict(&self, x: &Array2<f32>) -> Array1<i32> {
        self.decision_function(x)
            .mapv(|z| if sigmoid(z) >= 0.5 { 1 } else { 0 })
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Option<Array1<f32>> {
        Some(self.decision_function(x).mapv(sigmoid))
    }

    fn name(&self) -> &str {
        "logreg"
    }
}
