use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::{AttributeStore, GraphError};
use crate::model::tensor::Tensor;

/// Adjacency-list graph in the DGL convention.
///
/// Nodes are `0..num_nodes`, edges are directed and stored in insertion
/// order, and every attribute must have one row per node (or per edge).
/// Message passing over this convention expects both directions of each
/// neighbor pair to be stored explicitly; see [`DglGraph::to_bidirected`].
#[derive(Debug, Clone)]
pub struct DglGraph {
    graph: DiGraph<(), ()>,
    node_data: AttributeStore,
    edge_data: AttributeStore,
}

impl DglGraph {
    /// Creates a graph with `num_nodes` nodes and the given directed edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfBounds`] if an endpoint is not a
    /// valid node index.
    pub fn from_edges(num_nodes: usize, edges: &[[usize; 2]]) -> Result<Self, GraphError> {
        let mut graph = DiGraph::with_capacity(num_nodes, edges.len());
        for _ in 0..num_nodes {
            graph.add_node(());
        }
        for &[src, dst] in edges {
            if src >= num_nodes || dst >= num_nodes {
                return Err(GraphError::EdgeOutOfBounds {
                    src,
                    dst,
                    num_nodes,
                });
            }
            graph.add_edge(NodeIndex::new(src), NodeIndex::new(dst), ());
        }
        Ok(Self {
            graph,
            node_data: AttributeStore::new(),
            edge_data: AttributeStore::new(),
        })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    pub fn has_edge(&self, src: usize, dst: usize) -> bool {
        let n = self.num_nodes();
        src < n
            && dst < n
            && self
                .graph
                .find_edge(NodeIndex::new(src), NodeIndex::new(dst))
                .is_some()
    }

    pub fn node_data(&self) -> &AttributeStore {
        &self.node_data
    }

    pub fn edge_data(&self) -> &AttributeStore {
        &self.edge_data
    }

    /// Sets a node attribute, replacing any previous value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor does not have one row per node.
    pub fn set_node_data(&mut self, key: &str, value: Tensor) -> Result<(), GraphError> {
        GraphError::check_rows("node", key, &value, self.num_nodes())?;
        self.node_data.insert(key.to_string(), value);
        Ok(())
    }

    /// Sets an edge attribute, replacing any previous value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor does not have one row per edge.
    pub fn set_edge_data(&mut self, key: &str, value: Tensor) -> Result<(), GraphError> {
        GraphError::check_rows("edge", key, &value, self.num_edges())?;
        self.edge_data.insert(key.to_string(), value);
        Ok(())
    }

    /// Returns the bidirected simple graph over the same nodes.
    ///
    /// Parallel edges collapse to their first occurrence, and every edge
    /// `(u, v)` whose reverse is missing gains a `(v, u)` counterpart.
    /// Node attributes are copied unchanged. Each reverse edge takes the
    /// attribute rows of the edge it mirrors. Edges of the result are
    /// ordered by `(src, dst)`.
    pub fn to_bidirected(&self) -> Self {
        let mut rows: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for (row, pair) in self.edges().into_iter().enumerate() {
            rows.entry(pair).or_insert(row);
        }

        let forward: Vec<((usize, usize), usize)> =
            rows.iter().map(|(&pair, &row)| (pair, row)).collect();
        for ((src, dst), row) in forward {
            rows.entry((dst, src)).or_insert(row);
        }

        let mut graph = DiGraph::with_capacity(self.num_nodes(), rows.len());
        for _ in 0..self.num_nodes() {
            graph.add_node(());
        }
        let mut source_rows = Vec::with_capacity(rows.len());
        for (&(src, dst), &row) in &rows {
            graph.add_edge(NodeIndex::new(src), NodeIndex::new(dst), ());
            source_rows.push(row);
        }

        let edge_data = self
            .edge_data
            .iter()
            .map(|(key, value)| (key.clone(), value.select_rows(&source_rows)))
            .collect();

        Self {
            graph,
            node_data: self.node_data.clone(),
            edge_data,
        }
    }

    /// Whether every stored edge has its reverse stored as well.
    pub fn is_bidirected(&self) -> bool {
        self.edges()
            .into_iter()
            .all(|(src, dst)| self.has_edge(dst, src))
    }
}
