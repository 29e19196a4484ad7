use std::error::Error;
use std::fmt;

/// Errors raised by the training pipeline.
///
/// Every variant is raised immediately to the caller; the pipeline is a
/// deterministic batch computation, so there is nothing to retry against.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The designated target column is absent from the dataset.
    MissingTarget(String),
    /// A split partition ended up with fewer than two classes represented,
    /// so stratification is impossible.
    DegenerateSplit {
        partition: &'static str,
        classes: usize,
    },
    /// The requested minimum feature count exceeds the available features.
    InvalidMinFeatures {
        requested: usize,
        available: usize,
    },
    /// The fold count is unusable: fewer than 2 folds, or a fold would
    /// contain no instance of one of the classes.
    InsufficientFolds {
        folds: usize,
        minority_count: usize,
    },
    /// A dataset handed to the selection applier lacks required columns.
    ColumnMismatch { missing: Vec<String> },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::MissingTarget(column) => {
                write!(f, "Target column '{}' not found in dataset", column)
            }
            PipelineError::DegenerateSplit { partition, classes } => write!(
                f,
                "Partition '{}' contains {} class(es); stratified splitting requires 2",
                partition, classes
            ),
            PipelineError::InvalidMinFeatures {
                requested,
                available,
            } => write!(
                f,
                "Minimum feature count {} exceeds the {} available features",
                requested, available
            ),
            PipelineError::InsufficientFolds {
                folds,
                minority_count,
            } => write!(
                f,
                "Cannot build {} stratified folds with minority class count {}",
                folds, minority_count
            ),
            PipelineError::ColumnMismatch { missing } => {
                write!(f, "Dataset is missing required columns: {}", missing.join(", "))
            }
        }
    }
}

impl Error for PipelineError {}
