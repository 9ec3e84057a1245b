//! Backend-specific graph values produced from point clouds.
//!
//! Two graph conventions are supported, each behind its own Cargo feature:
//!
//! - [`DglGraph`] (`dgl`) – adjacency-list graph with explicit node count,
//!   length-checked node/edge attribute stores and a bidirected form.
//! - [`PygGraph`] (`pyg`) – `2×E` edge-index tensor plus positions, with
//!   free-form attributes.
//!
//! [`Graph`] wraps whichever of the two a transform produced.

#[cfg(feature = "dgl")]
mod dgl;
#[cfg(feature = "pyg")]
mod pyg;

#[cfg(not(any(feature = "dgl", feature = "pyg")))]
compile_error!("at least one graph backend feature (`dgl` or `pyg`) must be enabled");

#[cfg(feature = "dgl")]
pub use dgl::DglGraph;
#[cfg(feature = "pyg")]
pub use pyg::PygGraph;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tensor::Tensor;

/// Named tensors attached to the nodes or edges of a graph.
pub type AttributeStore = BTreeMap<String, Tensor>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown graph backend '{0}': expected 'dgl' or 'pyg'")]
pub struct ParseBackendError(String);

/// Identifier of a graph convention understood by downstream models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Adjacency-list graphs with explicit bidirectional edges.
    #[default]
    Dgl,
    /// Edge-index tensor graphs, symmetrized at the modeling layer.
    Pyg,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Dgl, Backend::Pyg];

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Dgl => "dgl",
            Backend::Pyg => "pyg",
        }
    }

    /// Whether support for this backend was compiled into the crate.
    pub const fn is_available(&self) -> bool {
        match self {
            Backend::Dgl => cfg!(feature = "dgl"),
            Backend::Pyg => cfg!(feature = "pyg"),
        }
    }

    /// All backends usable in this build.
    pub fn available() -> Vec<Backend> {
        Self::ALL.into_iter().filter(Backend::is_available).collect()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dgl" => Ok(Backend::Dgl),
            "pyg" => Ok(Backend::Pyg),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

/// Structural errors raised while building or annotating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge ({src}, {dst}) references a node outside 0..{num_nodes}")]
    EdgeOutOfBounds {
        src: usize,
        dst: usize,
        num_nodes: usize,
    },

    #[error("{scope} attribute '{key}' has leading dimension {found}, expected {expected}")]
    AttributeLength {
        scope: &'static str,
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("{scope} attribute '{key}' is zero-dimensional and cannot be indexed per {scope}")]
    ScalarAttribute { scope: &'static str, key: String },
}

impl GraphError {
    pub(crate) fn check_rows(
        scope: &'static str,
        key: &str,
        tensor: &Tensor,
        expected: usize,
    ) -> Result<(), Self> {
        match tensor.leading_dim() {
            None => Err(Self::ScalarAttribute {
                scope,
                key: key.to_string(),
            }),
            Some(found) if found != expected => Err(Self::AttributeLength {
                scope,
                key: key.to_string(),
                expected,
                found,
            }),
            Some(_) => Ok(()),
        }
    }
}

/// A graph produced by one of the supported backends.
#[derive(Debug, Clone)]
pub enum Graph {
    #[cfg(feature = "dgl")]
    Dgl(DglGraph),
    #[cfg(feature = "pyg")]
    Pyg(PygGraph),
}

impl Graph {
    pub fn backend(&self) -> Backend {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(_) => Backend::Dgl,
            #[cfg(feature = "pyg")]
            Graph::Pyg(_) => Backend::Pyg,
        }
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(g) => g.num_nodes(),
            #[cfg(feature = "pyg")]
            Graph::Pyg(g) => g.num_nodes(),
        }
    }

    pub fn num_edges(&self) -> usize {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(g) => g.num_edges(),
            #[cfg(feature = "pyg")]
            Graph::Pyg(g) => g.num_edges(),
        }
    }

    /// Directed `(src, dst)` pairs in storage order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(g) => g.edges(),
            #[cfg(feature = "pyg")]
            Graph::Pyg(g) => g.edges(),
        }
    }

    pub fn node_data(&self) -> &AttributeStore {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(g) => g.node_data(),
            #[cfg(feature = "pyg")]
            Graph::Pyg(g) => g.node_data(),
        }
    }

    pub fn edge_data(&self) -> &AttributeStore {
        match self {
            #[cfg(feature = "dgl")]
            Graph::Dgl(g) => g.edge_data(),
            #[cfg(feature = "pyg")]
            Graph::Pyg(g) => g.edge_data(),
        }
    }

    #[inline]
    pub fn node_attribute(&self, key: &str) -> Option<&Tensor> {
        self.node_data().get(key)
    }

    #[inline]
    pub fn edge_attribute(&self, key: &str) -> Option<&Tensor> {
        self.edge_data().get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_round_trips_names() {
        for backend in Backend::ALL {
            assert_eq!(Backend::from_str(backend.name()).unwrap(), backend);
            assert_eq!(backend.to_string(), backend.name());
        }
        assert_eq!(Backend::from_str(" DGL ").unwrap(), Backend::Dgl);
    }

    #[test]
    fn backend_from_str_invalid() {
        let err = Backend::from_str("networkx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown graph backend 'networkx': expected 'dgl' or 'pyg'"
        );
    }

    #[test]
    fn available_backends_follow_features() {
        let available = Backend::available();
        assert_eq!(available.contains(&Backend::Dgl), cfg!(feature = "dgl"));
        assert_eq!(available.contains(&Backend::Pyg), cfg!(feature = "pyg"));
    }

    #[test]
    fn check_rows_reports_mismatch() {
        let t = Tensor::from(ndarray::Array1::<f32>::zeros(3));
        assert!(GraphError::check_rows("node", "charge", &t, 3).is_ok());
        assert_eq!(
            GraphError::check_rows("node", "charge", &t, 4).unwrap_err(),
            GraphError::AttributeLength {
                scope: "node",
                key: "charge".to_string(),
                expected: 4,
                found: 3,
            }
        );
    }
}
