//! Point-cloud to graph conversion.
//!
//! A conversion runs through the following stages, each in its own module:
//!
//! 1. [`validate`] – reject samples that already hold a graph or lack inputs
//! 2. [`atoms`] – resolve per-atom species labels
//! 3. [`mask`] – drop padding atoms
//! 4. [`distance`] – pairwise distances and cutoff edge list
//! 5. [`backend`] – materialize the backend-specific graph
//! 6. [`copy`] / [`finalize`] – move attributes onto the graph, strip
//!    point-cloud keys and symmetrize where the backend requires it

pub mod atoms;
pub mod backend;
pub mod config;
pub mod copy;
pub mod distance;
mod error;
pub mod finalize;
pub mod mask;
pub mod validate;

pub use backend::GraphBackend;
pub use config::{DEFAULT_CUTOFF_DIST, TransformConfig};
pub use error::Error;
pub use mask::NodeSelection;

use log::debug;

use crate::model::keys;
use crate::model::sample::Sample;

/// Converts point-cloud samples into graphs for one configured backend.
///
/// The backend strategy is resolved once in [`new`](Self::new); the
/// transform is immutable afterwards and can be applied to any number of
/// samples.
#[derive(Debug)]
pub struct PointCloudToGraph {
    config: TransformConfig,
    backend: Box<dyn GraphBackend>,
}

impl PointCloudToGraph {
    /// Creates a transform from `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCutoff`] if the cutoff is not positive and finite
    /// - [`Error::BackendUnavailable`] if the backend was not compiled in
    pub fn new(config: TransformConfig) -> Result<Self, Error> {
        config.validate()?;
        let backend = backend::backend_for(config.backend)?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn GraphBackend {
        self.backend.as_ref()
    }

    /// Converts `sample` in place.
    ///
    /// On success the sample holds the finished graph under `graph`, the
    /// point-cloud-only keys are gone and every other key is untouched.
    /// On failure the sample may have been partially modified.
    ///
    /// # Errors
    ///
    /// Returns the first precondition or construction error encountered;
    /// see [`Error`].
    pub fn apply(&self, sample: &mut Sample) -> Result<(), Error> {
        validate::check_sample(sample)?;
        let selection = self.convert(sample)?;
        finalize::finalize(sample, &self.config, self.backend(), &selection)
    }

    /// Consuming form of [`apply`](Self::apply).
    pub fn transform(&self, mut sample: Sample) -> Result<Sample, Error> {
        self.apply(&mut sample)?;
        Ok(sample)
    }

    /// Builds the graph and stores it under `graph`, leaving attribute
    /// copying and cleanup to [`finalize`].
    ///
    /// Returns which of the original atoms became graph nodes.
    pub fn convert(&self, sample: &mut Sample) -> Result<NodeSelection, Error> {
        let labels = atoms::resolve_atom_types(sample)?;
        let positions = atoms::sample_tensor(sample, keys::POS)?
            .ok_or_else(|| Error::missing_key(keys::POS, "atomic positions"))?;
        let masked = mask::apply_mask(&labels, positions, sample)?;

        let precomputed = atoms::sample_tensor(sample, keys::DISTANCE_MATRIX)?;
        let distances =
            distance::resolve_distances(precomputed, &masked.positions, &masked.selection)?;
        let edges = distances.edges(self.config.cutoff_dist);

        debug!(
            "building {} graph: {} of {} atoms, {} edges (cutoff {})",
            self.config.backend,
            masked.selection.len(),
            masked.selection.original_len,
            edges.len(),
            self.config.cutoff_dist
        );

        let graph = self
            .backend
            .build(&edges, masked.labels, masked.positions)?;
        sample.set_graph(graph);
        Ok(masked.selection)
    }
}

/// Converts `sample` in place with a one-off transform built from `config`.
///
/// # Errors
///
/// See [`PointCloudToGraph::new`] and [`PointCloudToGraph::apply`].
pub fn to_graph(sample: &mut Sample, config: &TransformConfig) -> Result<(), Error> {
    PointCloudToGraph::new(config.clone())?.apply(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::Backend;
    use crate::model::tensor::Tensor;
    use crate::pointcloud::{PointCloudConfig, build_point_cloud};
    use ndarray::{Array1, Array2, array};

    fn eight_atoms() -> (Tensor, Tensor) {
        let pos = array![
            [0.0f32, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 1.5, 0.0],
            [0.0, 0.0, 1.5],
            [12.0, 0.0, 0.0],
            [0.0, 15.0, 0.0],
            [18.0, 18.0, 0.0],
            [30.0, 30.0, 30.0],
        ];
        let numbers = array![6i64, 1, 1, 1, 8, 7, 26, 3];
        (Tensor::from(numbers), Tensor::from(pos))
    }

    fn separation(pos: &Array2<f32>, a: usize, b: usize) -> f32 {
        (&pos.row(a) - &pos.row(b)).mapv(|v| v * v).sum().sqrt()
    }

    #[cfg(feature = "dgl")]
    #[test]
    fn dgl_end_to_end() {
        let (numbers, pos) = eight_atoms();
        let coords = distance::coordinates(&pos).unwrap();
        let mut sample = Sample::new()
            .with(keys::POS, pos.clone())
            .with(keys::ATOMIC_NUMBERS, numbers.clone());
        assert!(sample.graph().is_none());

        let transform = PointCloudToGraph::new(TransformConfig {
            backend: Backend::Dgl,
            cutoff_dist: 20.0,
            ..Default::default()
        })
        .unwrap();
        transform.apply(&mut sample).unwrap();

        let graph = sample.graph().unwrap();
        assert_eq!(graph.backend(), Backend::Dgl);
        assert_eq!(graph.num_nodes(), 8);
        assert_eq!(graph.node_attribute("atomic_numbers").unwrap(), &numbers);
        assert_eq!(graph.node_attribute("pos").unwrap().shape(), &[8, 3]);
        assert!(graph.num_edges() > 0);
        for (u, v) in graph.edges() {
            let d = separation(&coords, u, v);
            assert!(0.0 < d && d < 20.0, "edge ({u}, {v}) has length {d}");
            assert!(graph.edges().contains(&(v, u)));
        }
        for key in keys::POINT_CLOUD_ONLY {
            assert!(!sample.contains_key(key));
        }
    }

    fn boundary_sample(cutoff: f32) -> Sample {
        let pos = array![
            [0.0f32, 0.0, 0.0],
            [cutoff, 0.0, 0.0],
            [-(cutoff + 0.001), 0.0, 0.0],
            [0.0, 0.5 * cutoff, 0.0],
        ];
        Sample::new()
            .with(keys::POS, Tensor::from(pos))
            .with(keys::ATOMIC_NUMBERS, Tensor::from(array![8i64, 1, 1, 1]))
    }

    #[cfg(feature = "dgl")]
    #[test]
    fn dgl_excludes_pairs_at_inexact_cutoffs() {
        for cutoff in [5.2f32, 0.1] {
            let mut sample = boundary_sample(cutoff);
            to_graph(
                &mut sample,
                &TransformConfig {
                    cutoff_dist: cutoff,
                    ..TransformConfig::for_backend(Backend::Dgl)
                },
            )
            .unwrap();
            let graph = sample.graph().unwrap();
            assert_eq!(graph.edges(), vec![(0, 3), (3, 0)], "cutoff {cutoff}");
        }
    }

    #[cfg(feature = "pyg")]
    #[test]
    fn pyg_excludes_pairs_at_inexact_cutoffs() {
        for cutoff in [5.2f32, 0.1] {
            let mut sample = boundary_sample(cutoff);
            to_graph(
                &mut sample,
                &TransformConfig {
                    cutoff_dist: cutoff,
                    ..TransformConfig::for_backend(Backend::Pyg)
                },
            )
            .unwrap();
            let graph = sample.graph().unwrap();
            assert_eq!(graph.edges(), vec![(3, 0)], "cutoff {cutoff}");
        }
    }

    #[cfg(feature = "dgl")]
    #[test]
    fn far_atom_stays_isolated() {
        let (numbers, pos) = eight_atoms();
        let mut sample = Sample::new()
            .with(keys::POS, pos)
            .with(keys::ATOMIC_NUMBERS, numbers);
        to_graph(
            &mut sample,
            &TransformConfig {
                cutoff_dist: 20.0,
                ..TransformConfig::for_backend(Backend::Dgl)
            },
        )
        .unwrap();
        let graph = sample.graph().unwrap();
        assert!(graph.edges().iter().all(|&(u, v)| u != 7 && v != 7));
    }

    #[cfg(feature = "pyg")]
    #[test]
    fn pyg_end_to_end_from_pairwise_features() {
        let (numbers, pos) = eight_atoms();
        let mut sample =
            build_point_cloud(&numbers, &pos, &PointCloudConfig::default()).unwrap();
        sample.remove(keys::ATOMIC_NUMBERS);
        assert_eq!(&sample.tensor(keys::PC_FEATURES).unwrap().shape()[..2], &[8, 8]);

        let transform = PointCloudToGraph::new(
            TransformConfig::for_backend(Backend::Pyg).with_node_keys(["pos", "atomic_numbers"]),
        )
        .unwrap();
        let sample = transform.transform(sample).unwrap();
        let graph = sample.graph().unwrap();
        assert_eq!(graph.backend(), Backend::Pyg);
        assert_eq!(graph.num_nodes(), 8);
        assert_eq!(graph.node_attribute("atomic_numbers").unwrap(), &numbers);
        for (u, v) in graph.edges() {
            assert!(u > v, "pyg edges keep the lower-triangle direction");
        }
        for key in [keys::SRC_NODES, keys::DST_NODES, keys::SIZES, keys::PC_FEATURES] {
            assert!(!sample.contains_key(key));
        }
    }

    #[test]
    fn sampled_features_keep_every_source_atom() {
        let (numbers, pos) = eight_atoms();
        let config = PointCloudConfig {
            full_pairwise: false,
            max_neighbors: 3,
            seed: Some(11),
            ..Default::default()
        };
        let mut sample = build_point_cloud(&numbers, &pos, &config).unwrap();
        sample.remove(keys::ATOMIC_NUMBERS);
        let transform =
            PointCloudToGraph::new(TransformConfig::for_backend(Backend::available()[0])).unwrap();
        transform.apply(&mut sample).unwrap();
        let graph = sample.graph().unwrap();
        assert_eq!(graph.num_nodes(), 8);
        assert_eq!(graph.node_attribute("atomic_numbers").unwrap(), &numbers);
    }

    #[test]
    fn sampled_features_fail_the_count_check() {
        let (numbers, pos) = eight_atoms();
        let config = PointCloudConfig {
            full_pairwise: false,
            max_neighbors: 3,
            seed: Some(7),
            ..Default::default()
        };
        let mut sample = build_point_cloud(&numbers, &pos, &config).unwrap();
        sample.remove(keys::ATOMIC_NUMBERS);
        sample.insert(keys::POS, Tensor::from(Array2::<f32>::zeros((6, 3))));

        let transform =
            PointCloudToGraph::new(TransformConfig::for_backend(Backend::available()[0])).unwrap();
        assert!(matches!(
            transform.apply(&mut sample),
            Err(Error::CountMismatch { expected: 6, found: 8, .. })
        ));
    }

    #[test]
    fn padding_is_removed_before_building() {
        let pos = Tensor::from(array![
            [0.0f32, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0]
        ]);
        let numbers = Tensor::from(array![6i64, 8, 0, 0]);
        let force = Tensor::from(Array2::<f32>::ones((4, 3)));
        for b in Backend::available() {
            let mut sample = Sample::new()
                .with(keys::POS, pos.clone())
                .with(keys::ATOMIC_NUMBERS, numbers.clone())
                .with(keys::FORCE, force.clone());
            to_graph(&mut sample, &TransformConfig::for_backend(b)).unwrap();
            let graph = sample.graph().unwrap();
            assert_eq!(graph.num_nodes(), 2);
            assert_eq!(graph.node_attribute("force").unwrap().shape(), &[2, 3]);
            assert_eq!(
                graph.node_attribute("atomic_numbers").unwrap(),
                &Tensor::from(array![6i64, 8])
            );
            // the force key is not point-cloud specific and stays on the sample
            assert!(sample.contains_key(keys::FORCE));
        }
    }

    #[test]
    fn second_application_is_rejected() {
        let (numbers, pos) = eight_atoms();
        let mut sample = Sample::new()
            .with(keys::POS, pos.clone())
            .with(keys::ATOMIC_NUMBERS, numbers);
        let transform =
            PointCloudToGraph::new(TransformConfig::for_backend(Backend::available()[0])).unwrap();
        transform.apply(&mut sample).unwrap();
        sample.insert(keys::POS, pos);
        assert!(matches!(
            transform.apply(&mut sample),
            Err(Error::GraphAlreadyPresent { .. })
        ));
    }

    #[test]
    fn single_atom_gives_edgeless_graph() {
        for b in Backend::available() {
            let mut sample = Sample::new()
                .with(keys::POS, Tensor::from(array![[0.0f32, 0.0, 0.0]]))
                .with(keys::ATOMIC_NUMBERS, Tensor::from(array![14i64]));
            to_graph(&mut sample, &TransformConfig::for_backend(b)).unwrap();
            let graph = sample.graph().unwrap();
            assert_eq!(graph.num_nodes(), 1);
            assert_eq!(graph.num_edges(), 0);
        }
    }

    #[test]
    fn malformed_positions_are_rejected() {
        let mut sample = Sample::new()
            .with(keys::POS, Tensor::from(Array2::<f32>::zeros((3, 2))))
            .with(keys::ATOMIC_NUMBERS, Tensor::from(Array1::from_elem(3, 1i64)));
        let transform =
            PointCloudToGraph::new(TransformConfig::for_backend(Backend::available()[0])).unwrap();
        assert!(matches!(
            transform.apply(&mut sample),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[cfg(feature = "pyg")]
    #[test]
    fn precomputed_distances_drive_the_edges() {
        let pos = Tensor::from(array![[0.0f32, 0.0, 0.0], [50.0, 0.0, 0.0], [0.0, 50.0, 0.0]]);
        let precomputed = Tensor::from(array![
            [0.0f32, 1.0, 9.0],
            [1.0, 0.0, 9.0],
            [9.0, 9.0, 0.0]
        ]);
        let mut sample = Sample::new()
            .with(keys::POS, pos)
            .with(keys::ATOMIC_NUMBERS, Tensor::from(array![1i64, 1, 1]))
            .with(keys::DISTANCE_MATRIX, precomputed);
        PointCloudToGraph::new(TransformConfig::for_backend(Backend::Pyg))
            .unwrap()
            .apply(&mut sample)
            .unwrap();
        assert_eq!(sample.graph().unwrap().edges(), vec![(1, 0)]);
        assert!(!sample.contains_key(keys::DISTANCE_MATRIX));
    }

    #[test]
    fn edge_attributes_follow_the_edges() {
        let pos = Tensor::from(array![[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        for b in Backend::available() {
            let mut sample = Sample::new()
                .with(keys::POS, pos.clone())
                .with(keys::ATOMIC_NUMBERS, Tensor::from(array![1i64, 1, 1]))
                .with("bond_order", Tensor::from(array![1i64, 2, 3]));
            let config = TransformConfig::for_backend(b).with_edge_keys(["bond_order"]);
            to_graph(&mut sample, &config).unwrap();
            let graph = sample.graph().unwrap();
            let bond_order = graph.edge_attribute("bond_order").unwrap();
            assert_eq!(bond_order.leading_dim(), Some(graph.num_edges()));
        }
    }

    #[test]
    fn rejects_non_positive_cutoff() {
        let config = TransformConfig {
            cutoff_dist: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            PointCloudToGraph::new(config),
            Err(Error::InvalidCutoff(_))
        ));
    }
}
