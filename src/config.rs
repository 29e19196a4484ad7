use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::stats::Scoring;

/// Configuration for the stratified train/valid/test splitter.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SplitConfig {
    /// Name of the binary target column (0 = dissatisfied/neutral, 1 = satisfied).
    pub target_column: String,
    /// Fraction of rows assigned to the training partition; the remainder is
    /// split 50/50 into validation and test.
    pub train_fraction: f32,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            target_column: "target".to_string(),
            train_fraction: 0.6,
            seed: 42,
        }
    }
}

/// Configuration for cross-validated recursive feature elimination.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SelectionConfig {
    /// Number of stratified cross-validation folds.
    pub folds: usize,
    pub scoring: Scoring,
    /// Elimination never drops below this many retained features.
    pub min_features: usize,
    pub seed: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            folds: 5,
            scoring: Scoring::RocAuc,
            min_features: 1,
            seed: 42,
        }
    }
}

/// Central configuration for classifier models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    LogReg {
        max_iter: usize,
        l2: f32,
        seed: u64,
    },
    RandomForest {
        n_estimators: usize,
        max_depth: usize,
        seed: u64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LogReg {
            max_iter: 1000,
            l2: 1e-3,
            seed: 42,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logreg" | "logistic" => Ok(ModelType::LogReg {
                max_iter: 1000,
                l2: 1e-3,
                seed: 42,
            }),
            "random_forest" | "rf" => Ok(ModelType::RandomForest {
                n_estimators: 20,
                max_depth: 10,
                seed: 42,
            }),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}
