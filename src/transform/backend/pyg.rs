use super::{GraphBackend, mismatch};
use crate::model::graph::{Backend, Graph, PygGraph};
use crate::model::keys;
use crate::model::tensor::Tensor;
use crate::transform::error::Error;

/// Builds [`PygGraph`]s.
///
/// The edge pairs become a `2×E` index tensor next to `pos`; species are
/// attached afterwards. Edges are left single-direction, since models of
/// this convention symmetrize at the modeling layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PygBackend;

impl PygBackend {
    fn unwrap_graph<'a>(&self, graph: &'a mut Graph) -> Result<&'a mut PygGraph, Error> {
        match graph {
            Graph::Pyg(g) => Ok(g),
            #[allow(unreachable_patterns)]
            other => Err(mismatch(Backend::Pyg, other)),
        }
    }
}

impl GraphBackend for PygBackend {
    fn backend(&self) -> Backend {
        Backend::Pyg
    }

    fn build(
        &self,
        edges: &[[usize; 2]],
        atomic_numbers: Tensor,
        pos: Tensor,
    ) -> Result<Graph, Error> {
        let mut g = PygGraph::new(edges, pos)?;
        g.set_node_data(keys::ATOMIC_NUMBERS, atomic_numbers);
        Ok(Graph::Pyg(g))
    }

    fn attach_node_attribute(
        &self,
        graph: &mut Graph,
        key: &str,
        value: Tensor,
    ) -> Result<(), Error> {
        self.unwrap_graph(graph)?.set_node_data(key, value);
        Ok(())
    }

    fn attach_edge_attribute(
        &self,
        graph: &mut Graph,
        key: &str,
        value: Tensor,
    ) -> Result<(), Error> {
        self.unwrap_graph(graph)?.set_edge_data(key, value);
        Ok(())
    }

    fn symmetrize(&self, graph: Graph) -> Result<Graph, Error> {
        match graph {
            g @ Graph::Pyg(_) => Ok(g),
            #[allow(unreachable_patterns)]
            other => Err(mismatch(Backend::Pyg, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    fn sample_graph() -> Graph {
        PygBackend
            .build(
                &[[1, 0], [2, 0], [2, 1]],
                Tensor::from(array![1i64, 6, 8]),
                Tensor::from(Array2::<f32>::zeros((3, 3))),
            )
            .unwrap()
    }

    #[test]
    fn build_lays_out_edge_index() {
        let graph = sample_graph();
        let Graph::Pyg(g) = &graph else {
            panic!("expected a pyg graph");
        };
        assert_eq!(g.edge_index().shape(), &[2, 3]);
        assert_eq!(graph.node_attribute("atomic_numbers").unwrap().shape(), &[3]);
        assert_eq!(graph.node_attribute("pos").unwrap().shape(), &[3, 3]);
    }

    #[test]
    fn symmetrize_keeps_single_direction() {
        let graph = PygBackend.symmetrize(sample_graph()).unwrap();
        assert_eq!(graph.edges(), vec![(1, 0), (2, 0), (2, 1)]);
    }

    #[test]
    fn zero_edge_graph() {
        let graph = PygBackend
            .build(
                &[],
                Tensor::from(array![3i64]),
                Tensor::from(array![[0.0f32, 0.0, 0.0]]),
            )
            .unwrap();
        assert_eq!(graph.num_nodes(), 1);
        assert_eq!(graph.num_edges(), 0);
    }
}
