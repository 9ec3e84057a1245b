use ndarray::Array2;

use super::{AttributeStore, GraphError};
use crate::model::keys;
use crate::model::tensor::Tensor;

/// Edge-index graph in the PyG convention.
///
/// Connectivity is a `2×E` index tensor (row 0 holds sources, row 1
/// destinations) and the node count follows from the `pos` attribute.
/// Attributes are stored as given, without per-row validation, and edges
/// stay in whatever direction they were built with.
#[derive(Debug, Clone)]
pub struct PygGraph {
    edge_index: Array2<i64>,
    num_nodes: usize,
    node_data: AttributeStore,
    edge_data: AttributeStore,
}

impl PygGraph {
    /// Creates a graph from edge pairs and node positions.
    ///
    /// The pairs are laid out as a `2×E` index tensor; an empty edge list
    /// yields a `2×0` tensor.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ScalarAttribute`] for zero-dimensional
    /// positions and [`GraphError::EdgeOutOfBounds`] for invalid endpoints.
    pub fn new(edges: &[[usize; 2]], pos: Tensor) -> Result<Self, GraphError> {
        let num_nodes = pos.leading_dim().ok_or_else(|| GraphError::ScalarAttribute {
            scope: "node",
            key: keys::POS.to_string(),
        })?;
        if let Some(&[src, dst]) = edges.iter().find(|[s, d]| *s >= num_nodes || *d >= num_nodes)
        {
            return Err(GraphError::EdgeOutOfBounds {
                src,
                dst,
                num_nodes,
            });
        }
        let edge_index = Array2::from_shape_fn((2, edges.len()), |(side, k)| edges[k][side] as i64);

        let mut node_data = AttributeStore::new();
        node_data.insert(keys::POS.to_string(), pos);
        Ok(Self {
            edge_index,
            num_nodes,
            node_data,
            edge_data: AttributeStore::new(),
        })
    }

    pub fn edge_index(&self) -> &Array2<i64> {
        &self.edge_index
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edge_index.ncols()
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.edge_index
            .columns()
            .into_iter()
            .map(|col| (col[0] as usize, col[1] as usize))
            .collect()
    }

    pub fn node_data(&self) -> &AttributeStore {
        &self.node_data
    }

    pub fn edge_data(&self) -> &AttributeStore {
        &self.edge_data
    }

    pub fn set_node_data(&mut self, key: &str, value: Tensor) {
        self.node_data.insert(key.to_string(), value);
    }

    pub fn set_edge_data(&mut self, key: &str, value: Tensor) {
        self.edge_data.insert(key.to_string(), value);
    }
}
