//! nps-classifiers: training and feature-selection pipeline for
//! customer-satisfaction models.
//!
//! This crate provides stratified dataset partitioning, a two-stage model
//! pipeline (standard scaling + classifier), cross-validated recursive
//! feature elimination driven by an auxiliary ensemble ranker, metric
//! evaluation, and reporting/plotting helpers used by the demo and
//! higher-level tooling.
//!
//! The design favors small, testable modules: every dataset transform is a
//! pure function returning a new value, and all randomness is driven by
//! explicitly threaded seeds so a run is reproducible end to end.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod feature_selection;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod stats;
