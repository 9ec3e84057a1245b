//! Graph construction strategies, one per supported backend.
//!
//! The transform never inspects backend internals directly: it builds,
//! annotates and symmetrizes graphs through [`GraphBackend`], whose
//! implementation is chosen once when the transform is constructed.

#[cfg(feature = "dgl")]
mod dgl;
#[cfg(feature = "pyg")]
mod pyg;

#[cfg(feature = "dgl")]
pub use dgl::DglBackend;
#[cfg(feature = "pyg")]
pub use pyg::PygBackend;

use std::fmt;

use super::error::Error;
use crate::model::graph::{Backend, Graph};
use crate::model::tensor::Tensor;

/// Operations the transform needs from a graph backend.
pub trait GraphBackend: fmt::Debug + Send + Sync {
    /// Which backend this strategy produces graphs for.
    fn backend(&self) -> Backend;

    /// Builds a graph over `atomic_numbers.len()` nodes with the given
    /// directed edges, carrying `atomic_numbers` and `pos` as node data.
    fn build(
        &self,
        edges: &[[usize; 2]],
        atomic_numbers: Tensor,
        pos: Tensor,
    ) -> Result<Graph, Error>;

    /// Attaches a per-node attribute.
    fn attach_node_attribute(&self, graph: &mut Graph, key: &str, value: Tensor)
    -> Result<(), Error>;

    /// Attaches a per-edge attribute.
    fn attach_edge_attribute(&self, graph: &mut Graph, key: &str, value: Tensor)
    -> Result<(), Error>;

    /// Brings the edge set into the backend's final directed form.
    fn symmetrize(&self, graph: Graph) -> Result<Graph, Error>;
}

/// Returns the strategy for `backend`.
///
/// # Errors
///
/// Returns [`Error::BackendUnavailable`] if support for the backend was
/// not compiled in.
pub fn backend_for(backend: Backend) -> Result<Box<dyn GraphBackend>, Error> {
    match backend {
        #[cfg(feature = "dgl")]
        Backend::Dgl => Ok(Box::new(DglBackend)),
        #[cfg(feature = "pyg")]
        Backend::Pyg => Ok(Box::new(PygBackend)),
        #[allow(unreachable_patterns)]
        other => Err(Error::BackendUnavailable(other)),
    }
}

fn mismatch(expected: Backend, graph: &Graph) -> Error {
    Error::BackendMismatch {
        expected,
        found: graph.backend(),
    }
}
