//! Pairwise point-cloud representation of atomic structures.
//!
//! A point cloud stores, for every (source, destination) atom pair, the
//! concatenated one-hot species encodings of both atoms. This module builds
//! that representation from atomic numbers and positions
//! ([`PointCloudBuilder`]) and recovers the species from it again
//! ([`retrieve_node_types`]), which is how the graph transform obtains node
//! labels for samples that carry no `atomic_numbers`.

mod builder;
mod error;
mod node_types;

pub use builder::{PointCloudBuilder, build_point_cloud};
pub use error::Error;
pub use node_types::retrieve_node_types;

use serde::{Deserialize, Serialize};

/// Default number of one-hot species classes.
pub const DEFAULT_NUM_CLASSES: usize = 100;

/// Default destination count in sampled mode.
pub const DEFAULT_MAX_NEIGHBORS: usize = 32;

/// Settings for [`PointCloudBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointCloudConfig {
    /// Width `C` of each one-hot block; species must lie in `[0, C)`.
    pub num_classes: usize,

    /// Use every atom as a destination instead of sampling a subset.
    pub full_pairwise: bool,

    /// Destination count when sampling.
    pub max_neighbors: usize,

    /// Seed for destination sampling. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self {
            num_classes: DEFAULT_NUM_CLASSES,
            full_pairwise: true,
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            seed: None,
        }
    }
}

impl PointCloudConfig {
    /// Checks that the settings can produce a point cloud.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero classes or, in sampled
    /// mode, zero neighbors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_classes == 0 {
            return Err(Error::InvalidConfig(
                "num_classes must be at least 1".to_string(),
            ));
        }
        if !self.full_pairwise && self.max_neighbors == 0 {
            return Err(Error::InvalidConfig(
                "max_neighbors must be at least 1 when sampling".to_string(),
            ));
        }
        Ok(())
    }
}
