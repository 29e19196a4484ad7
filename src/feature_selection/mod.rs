//! Feature selection.
//!
//! This module contains cross-validated recursive feature elimination and
//! the projection of datasets onto a selected feature subset.
pub mod rfecv;

pub use rfecv::{FeatureRank, FeatureSelection, RfeCv, SubsetScore};
