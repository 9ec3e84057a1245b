use log::debug;
use ndarray::{Array1, Array2, Array3, Ix1, Ix2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use super::PointCloudConfig;
use super::error::Error;
use crate::model::keys;
use crate::model::sample::Sample;
use crate::model::tensor::Tensor;

/// Builds pairwise point-cloud samples from atomic structures.
///
/// Every atom is a source node. In full pairwise mode every atom is also a
/// destination node; otherwise the destinations are a random subset of at
/// most [`PointCloudConfig::max_neighbors`] atoms, drawn from a generator
/// seeded with [`PointCloudConfig::seed`] when one is given.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pcloud_graph::{PointCloudBuilder, PointCloudConfig, Tensor};
///
/// let numbers = Tensor::from(array![8i64, 1, 1]);
/// let pos = Tensor::from(array![[0.0f32, 0.0, 0.0], [0.96, 0.0, 0.0], [-0.24, 0.93, 0.0]]);
///
/// let sample = PointCloudBuilder::new(PointCloudConfig::default())
///     .build(&numbers, &pos)
///     .unwrap();
/// assert_eq!(sample.tensor("pc_features").unwrap().shape(), &[3, 3, 200]);
/// ```
#[derive(Debug, Clone)]
pub struct PointCloudBuilder {
    config: PointCloudConfig,
}

impl PointCloudBuilder {
    pub fn new(config: PointCloudConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PointCloudConfig {
        &self.config
    }

    /// Featurizes one structure.
    ///
    /// The returned sample holds `pos`, `atomic_numbers`, `pc_features`
    /// (`[S, D, 2C]`), `src_nodes`, `dst_nodes` and `sizes`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] for zero classes, or zero neighbors in
    ///   sampled mode
    /// - [`Error::NonIntegralLabels`] / [`Error::InvalidShape`] for labels
    ///   that are not a 1-D integer array
    /// - [`Error::InvalidShape`] for positions that are not `N×3`
    /// - [`Error::CountMismatch`] if labels and positions disagree
    /// - [`Error::LabelOutOfRange`] for labels outside `[0, num_classes)`
    pub fn build(&self, atomic_numbers: &Tensor, pos: &Tensor) -> Result<Sample, Error> {
        self.config.validate()?;
        let labels = labels(atomic_numbers)?;
        let coords = positions(pos)?;
        if labels.len() != coords.nrows() {
            return Err(Error::CountMismatch {
                labels: labels.len(),
                positions: coords.nrows(),
            });
        }
        let classes = self.config.num_classes;
        let species = labels
            .iter()
            .map(|&z| {
                usize::try_from(z)
                    .ok()
                    .filter(|&c| c < classes)
                    .ok_or(Error::LabelOutOfRange {
                        label: z,
                        num_classes: classes,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let num_atoms = species.len();
        let src_nodes: Vec<usize> = (0..num_atoms).collect();
        let dst_nodes = self.destinations(num_atoms);

        let mut features = Array3::<f32>::zeros((src_nodes.len(), dst_nodes.len(), 2 * classes));
        for (i, &src) in src_nodes.iter().enumerate() {
            for (j, &dst) in dst_nodes.iter().enumerate() {
                features[[i, j, species[src]]] = 1.0;
                features[[i, j, classes + species[dst]]] = 1.0;
            }
        }
        debug!(
            "featurized {} atoms into {}x{} pairwise features",
            num_atoms,
            src_nodes.len(),
            dst_nodes.len()
        );

        Ok(Sample::new()
            .with(keys::POS, Tensor::from(coords))
            .with(keys::ATOMIC_NUMBERS, Tensor::from(labels))
            .with(keys::PC_FEATURES, Tensor::from(features))
            .with(keys::SRC_NODES, index_tensor(&src_nodes))
            .with(keys::DST_NODES, index_tensor(&dst_nodes))
            .with(keys::SIZES, Tensor::from(Array1::from(vec![num_atoms as i64]))))
    }

    fn destinations(&self, num_atoms: usize) -> Vec<usize> {
        let limit = self.config.max_neighbors;
        if self.config.full_pairwise || num_atoms <= limit {
            return (0..num_atoms).collect();
        }
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut picked = index::sample(&mut rng, num_atoms, limit).into_vec();
        picked.sort_unstable();
        picked
    }
}

/// Featurizes one structure with `config`.
///
/// Shorthand for `PointCloudBuilder::new(config.clone()).build(..)`.
pub fn build_point_cloud(
    atomic_numbers: &Tensor,
    pos: &Tensor,
    config: &PointCloudConfig,
) -> Result<Sample, Error> {
    PointCloudBuilder::new(config.clone()).build(atomic_numbers, pos)
}

fn labels(atomic_numbers: &Tensor) -> Result<Array1<i64>, Error> {
    let values = atomic_numbers
        .to_i64()
        .ok_or(Error::NonIntegralLabels(atomic_numbers.dtype()))?;
    values
        .into_dimensionality::<Ix1>()
        .map_err(|_| Error::InvalidShape {
            what: "atomic numbers",
            expected: "[N]",
            found: atomic_numbers.shape().to_vec(),
        })
}

fn positions(pos: &Tensor) -> Result<Array2<f32>, Error> {
    let invalid = || Error::InvalidShape {
        what: "atom positions",
        expected: "[N, 3]",
        found: pos.shape().to_vec(),
    };
    if pos.ndim() != 2 || pos.shape()[1] != 3 {
        return Err(invalid());
    }
    pos.to_f32().into_dimensionality::<Ix2>().map_err(|_| invalid())
}

fn index_tensor(indices: &[usize]) -> Tensor {
    Tensor::from(indices.iter().map(|&i| i as i64).collect::<Array1<i64>>())
}
