use super::{GraphBackend, mismatch};
use crate::model::graph::{Backend, DglGraph, Graph};
use crate::model::keys;
use crate::model::tensor::Tensor;
use crate::transform::error::Error;

/// Builds [`DglGraph`]s.
///
/// Graphs are created straight from the edge pairs with node data attached
/// on construction, and are made bidirected during finalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DglBackend;

impl DglBackend {
    fn unwrap_graph<'a>(&self, graph: &'a mut Graph) -> Result<&'a mut DglGraph, Error> {
        match graph {
            Graph::Dgl(g) => Ok(g),
            #[allow(unreachable_patterns)]
            other => Err(mismatch(Backend::Dgl, other)),
        }
    }
}

impl GraphBackend for DglBackend {
    fn backend(&self) -> Backend {
        Backend::Dgl
    }

    fn build(
        &self,
        edges: &[[usize; 2]],
        atomic_numbers: Tensor,
        pos: Tensor,
    ) -> Result<Graph, Error> {
        let num_nodes = atomic_numbers.leading_dim().unwrap_or(0);
        let mut g = DglGraph::from_edges(num_nodes, edges)?;
        g.set_node_data(keys::ATOMIC_NUMBERS, atomic_numbers)?;
        g.set_node_data(keys::POS, pos)?;
        Ok(Graph::Dgl(g))
    }

    fn attach_node_attribute(
        &self,
        graph: &mut Graph,
        key: &str,
        value: Tensor,
    ) -> Result<(), Error> {
        self.unwrap_graph(graph)?.set_node_data(key, value)?;
        Ok(())
    }

    fn attach_edge_attribute(
        &self,
        graph: &mut Graph,
        key: &str,
        value: Tensor,
    ) -> Result<(), Error> {
        self.unwrap_graph(graph)?.set_edge_data(key, value)?;
        Ok(())
    }

    fn symmetrize(&self, graph: Graph) -> Result<Graph, Error> {
        match graph {
            Graph::Dgl(g) => Ok(Graph::Dgl(g.to_bidirected())),
            #[allow(unreachable_patterns)]
            other => Err(mismatch(Backend::Dgl, &other)),
        }
    }
}
