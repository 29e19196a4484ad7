//! Classifier models and the traits they implement.
pub mod classifier_trait;
pub mod factory;
pub mod logistic;
pub mod random_forest;

pub use classifier_trait::{ClassifierModel, FeatureImportance};
pub use factory::build_model;
pub use logistic::LogisticRegression;
pub use random_forest::RandomForestClassifier;
