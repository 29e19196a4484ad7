use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::logistic::LogisticRegression;
use crate::models::random_forest::RandomForestClassifier;

/// Build a boxed classifier model from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(params: &ModelConfig) -> Box<dyn ClassifierModel + Send + Sync> {
    match params.model_type {
        ModelType::LogReg { max_iter, l2, seed } => Box::new(LogisticRegression::new(
            max_iter,
            params.learning_rate,
            l2,
            seed,
        )),
        ModelType::RandomForest {
            n_estimators,
            max_depth,
            seed,
        } => Box::new(RandomForestClassifier::new(n_estimators, max_depth, seed)),
    }
}
