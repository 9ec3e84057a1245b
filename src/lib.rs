//! Point-cloud to graph conversion for atomistic machine learning.
//!
//! Datasets of atomic structures are often stored as point clouds: atom
//! positions plus per-atom species, optionally padded to a fixed size or
//! expanded into pairwise one-hot feature blocks. Graph neural networks
//! instead consume graphs whose nodes are atoms and whose edges connect
//! atoms closer than a cutoff. This crate converts the former into the
//! latter for two graph conventions.
//!
//! # Features
//!
//! - **Species resolution** — Uses `atomic_numbers` directly or recovers
//!   species from pairwise `pc_features`
//! - **Padding removal** — Drops padding atoms via an explicit `src_mask`
//!   or non-positive labels, keeping per-atom attributes aligned
//! - **Cutoff neighbor graphs** — Strict lower-triangle scan of the
//!   distance matrix, `0 < d < cutoff`, no self-loops
//! - **Two backends** — [`DglGraph`] (bidirected, length-checked
//!   attributes) and [`PygGraph`] (`2×E` edge index, single direction),
//!   each behind a Cargo feature
//! - **Point-cloud featurization** — Full pairwise or seeded sampled
//!   one-hot feature blocks
//! - **JSON I/O** — Samples and graphs as JSON tensor records
//!
//! # Quick Start
//!
//! ```
//! use ndarray::array;
//! use pcloud_graph::{Backend, PointCloudToGraph, Sample, Tensor, TransformConfig, TransformError};
//!
//! // Methane, with a padding row at the end
//! let pos = array![
//!     [0.000f32, 0.000, 0.000],
//!     [0.629, 0.629, 0.629],
//!     [-0.629, -0.629, 0.629],
//!     [-0.629, 0.629, -0.629],
//!     [0.629, -0.629, -0.629],
//!     [0.000, 0.000, 0.000],
//! ];
//! let mut sample = Sample::new()
//!     .with("pos", Tensor::from(pos))
//!     .with("atomic_numbers", Tensor::from(array![6i64, 1, 1, 1, 1, 0]))
//!     .with("energy", Tensor::from(array![-40.5f32]));
//!
//! let transform = PointCloudToGraph::new(TransformConfig {
//!     backend: Backend::Dgl,
//!     cutoff_dist: 1.5,
//!     ..Default::default()
//! })?;
//! transform.apply(&mut sample)?;
//!
//! let graph = sample.graph().unwrap();
//! assert_eq!(graph.num_nodes(), 5);
//!
//! // C–H bonds are 1.09 Å, H–H distances 1.78 Å: four bonds, both directions
//! assert_eq!(graph.num_edges(), 8);
//!
//! // Point-cloud keys are consumed, everything else is kept
//! assert!(sample.get("pos").is_none());
//! assert!(sample.get("energy").is_some());
//! # Ok::<(), TransformError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`transform`] — The conversion pipeline and its stages
//! - [`pointcloud`] — Pairwise feature construction and node-type retrieval
//! - [`io`] — JSON reading and writing
//! - [`keys`] — Sample key names the transform reads and removes
//!
//! # Data Types
//!
//! - [`Sample`] — Keyed collection of [`Tensor`]s and at most one [`Graph`]
//! - [`Tensor`] — Dynamically shaped `float32`/`float16`/`int64`/`bool` array
//! - [`Graph`] — Backend-tagged graph ([`DglGraph`] or [`PygGraph`])
//! - [`Backend`] — Graph convention selector
//!
//! ## Configuration
//!
//! - [`TransformConfig`] — Backend, cutoff, node and edge attribute keys
//! - [`PointCloudConfig`] — One-hot width and destination sampling

mod model;

pub mod io;
pub mod pointcloud;
pub mod transform;

pub use model::keys;

pub use model::graph::{AttributeStore, Backend, Graph, GraphError, ParseBackendError};
#[cfg(feature = "dgl")]
pub use model::graph::DglGraph;
#[cfg(feature = "pyg")]
pub use model::graph::PygGraph;

pub use model::sample::{Sample, Value};
pub use model::tensor::{DType, ParseDTypeError, Tensor};

pub use pointcloud::{PointCloudBuilder, PointCloudConfig, retrieve_node_types};
pub use transform::{GraphBackend, NodeSelection, PointCloudToGraph, TransformConfig, to_graph};

pub use pointcloud::Error as PointCloudError;
pub use transform::Error as TransformError;
