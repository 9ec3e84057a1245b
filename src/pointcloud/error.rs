//! Error types for point-cloud featurization and node-type retrieval.

use thiserror::Error;

use crate::model::tensor::DType;

/// Errors produced while building or reading pairwise point-cloud features.
#[derive(Debug, Error)]
pub enum Error {
    /// A tensor has the wrong number of dimensions or wrong extents.
    #[error("{what} has shape {found:?}, expected {expected}")]
    InvalidShape {
        /// Role of the tensor.
        what: &'static str,
        /// Accepted shape.
        expected: &'static str,
        /// Actual shape.
        found: Vec<usize>,
    },

    /// The channel axis cannot be split into source and destination halves.
    #[error("pairwise features need an even channel count, got {0}")]
    OddChannels(usize),

    /// One of the feature axes has length zero.
    #[error("pairwise features have an empty axis: {0:?}")]
    EmptyAxis(Vec<usize>),

    /// Species labels and positions describe different atom counts.
    #[error("{labels} species labels for {positions} atom positions")]
    CountMismatch {
        /// Number of species labels.
        labels: usize,
        /// Number of position rows.
        positions: usize,
    },

    /// A species label cannot be one-hot encoded.
    #[error("species label {label} is outside [0, {num_classes})")]
    LabelOutOfRange {
        /// Offending label.
        label: i64,
        /// Number of one-hot classes.
        num_classes: usize,
    },

    /// Species labels are not integers.
    #[error("species labels must be integers, got {0}")]
    NonIntegralLabels(DType),

    /// The featurizer settings are unusable.
    #[error("invalid point-cloud configuration: {0}")]
    InvalidConfig(String),
}
