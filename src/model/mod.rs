//! Core data structures flowing through the conversion pipeline.
//!
//! - [`tensor`] – Dynamically typed dense arrays carried by samples and graphs.
//! - [`sample`] – Keyed per-structure records produced by the dataset layer.
//! - [`graph`] – Backend-specific graphs and the [`Backend`](graph::Backend) identifier.
//! - [`keys`] – Well-known sample keys.
//!
//! A [`Sample`](sample::Sample) starts out holding point-cloud tensors and is
//! rewritten in place by [`crate::PointCloudToGraph`] to hold a
//! [`Graph`](graph::Graph) instead.

pub mod graph;
pub mod keys;
pub mod sample;
pub mod tensor;
