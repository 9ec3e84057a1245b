//! Error types for point-cloud to graph conversion.
//!
//! Every precondition the transform relies on (no graph yet, positions
//! present, a species source present, well-formed coordinates, aligned
//! label and position counts) fails fast with a dedicated variant.
//! Missing optional attributes are not errors; they are logged and
//! skipped by the attribute copier.

use thiserror::Error;

use crate::model::graph::{Backend, GraphError};

/// Errors that can occur while converting a sample into a graph.
#[derive(Debug, Error)]
pub enum Error {
    /// The sample already holds a graph, so conversion would be redundant.
    #[error("sample already contains a graph under '{key}': transform shouldn't be required")]
    GraphAlreadyPresent {
        /// Key holding the existing graph.
        key: String,
    },

    /// A required sample key is absent.
    #[error("no '{key}' key present in sample ({detail})")]
    MissingKey {
        /// The missing key.
        key: &'static str,
        /// What the key is needed for.
        detail: &'static str,
    },

    /// Neither species source is available.
    #[error("neither 'atomic_numbers' nor 'pc_features' keys were present in sample")]
    MissingAtomTypes,

    /// A key expected to hold a tensor holds a graph instead.
    #[error("sample key '{key}' does not hold a tensor")]
    NotATensor {
        /// Offending key.
        key: String,
    },

    /// A tensor has a shape the transform cannot work with.
    #[error("'{key}' has shape {found:?}, expected {expected}")]
    InvalidShape {
        /// Key (or role) of the tensor.
        key: String,
        /// Human-readable description of the accepted shapes.
        expected: String,
        /// Actual shape.
        found: Vec<usize>,
    },

    /// Two quantities that must agree in length do not.
    #[error("number of {what} ({found}) != number of atom positions ({expected})")]
    CountMismatch {
        /// Quantity compared against the positions.
        what: &'static str,
        /// Number of atom positions.
        expected: usize,
        /// Observed length.
        found: usize,
    },

    /// The padding mask could not be applied.
    #[error("invalid padding mask: {0}")]
    InvalidMask(String),

    /// The cutoff distance is not a positive finite number.
    #[error("cutoff distance must be positive and finite, got {0}")]
    InvalidCutoff(f32),

    /// Support for the requested backend was not compiled in.
    #[error("graph backend '{0}' is not available in this build (enable the `{0}` feature)")]
    BackendUnavailable(Backend),

    /// A graph produced by one backend was handed to another.
    #[error("expected a '{expected}' graph but found a '{found}' graph")]
    BackendMismatch {
        /// Backend performing the operation.
        expected: Backend,
        /// Backend that produced the graph.
        found: Backend,
    },

    /// Species could not be inferred from pairwise features.
    #[error("failed to infer atom types from point-cloud features: {0}")]
    NodeTypes(#[from] crate::pointcloud::Error),

    /// Graph construction or attribute attachment failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Failed to parse a TOML transform configuration.
    #[error("failed to parse transform configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a [`MissingKey`](Error::MissingKey) error.
    pub fn missing_key(key: &'static str, detail: &'static str) -> Self {
        Self::MissingKey { key, detail }
    }

    /// Creates an [`InvalidShape`](Error::InvalidShape) error.
    ///
    /// # Arguments
    ///
    /// * `key` - Key or role of the offending tensor
    /// * `expected` - Description of the accepted shapes
    /// * `found` - Actual shape
    pub fn invalid_shape(key: impl Into<String>, expected: impl Into<String>, found: &[usize]) -> Self {
        Self::InvalidShape {
            key: key.into(),
            expected: expected.into(),
            found: found.to_vec(),
        }
    }

    /// Creates a [`NotATensor`](Error::NotATensor) error.
    pub fn not_a_tensor(key: impl Into<String>) -> Self {
        Self::NotATensor { key: key.into() }
    }
}
