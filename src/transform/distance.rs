//! Pairwise distances and cutoff adjacency.
//!
//! Distances are kept as a dense `N×N` matrix. Freshly computed matrices
//! are stored in half precision, which halves the `O(N²)` footprint and is
//! ample for neighbor cutoffs of a few tens of Ångströms.

use half::f16;
use ndarray::{Array2, ArrayView2, Axis, Ix2};

use super::error::Error;
use super::mask::NodeSelection;
use crate::model::keys;
use crate::model::tensor::Tensor;

/// A dense pairwise distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceMatrix {
    Half(Array2<f16>),
    Float(Array2<f32>),
}

impl DistanceMatrix {
    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        match self {
            DistanceMatrix::Half(d) => d.nrows(),
            DistanceMatrix::Float(d) => d.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edge list for this matrix; see [`edges_from_dist`].
    ///
    /// The cutoff is rounded to the matrix precision before comparing.
    /// Rounding is monotonic, so no pair at or beyond the cutoff is kept.
    pub fn edges(&self, cutoff: f32) -> Vec<[usize; 2]> {
        match self {
            DistanceMatrix::Half(d) => edges_from_dist(d.view(), f16::from_f32(cutoff)),
            DistanceMatrix::Float(d) => edges_from_dist(d.view(), cutoff),
        }
    }

    /// Interprets a sample tensor as a distance matrix.
    ///
    /// Half and single precision data are used as-is; integer and boolean
    /// data are widened to `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] unless the tensor is square and 2-D.
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, Error> {
        let shape = tensor.shape();
        if shape.len() != 2 || shape[0] != shape[1] {
            return Err(Error::invalid_shape(keys::DISTANCE_MATRIX, "[N, N]", shape));
        }
        let square = |found: &[usize]| Error::invalid_shape(keys::DISTANCE_MATRIX, "[N, N]", found);
        Ok(match tensor {
            Tensor::Half(d) => DistanceMatrix::Half(
                d.clone().into_dimensionality::<Ix2>().map_err(|_| square(shape))?,
            ),
            Tensor::Float(d) => DistanceMatrix::Float(
                d.clone().into_dimensionality::<Ix2>().map_err(|_| square(shape))?,
            ),
            other => DistanceMatrix::Float(
                other.to_f32().into_dimensionality::<Ix2>().map_err(|_| square(shape))?,
            ),
        })
    }

    /// Keeps the rows and columns of the selected atoms.
    pub fn restrict(&self, kept: &[usize]) -> Self {
        match self {
            DistanceMatrix::Half(d) => {
                DistanceMatrix::Half(d.select(Axis(0), kept).select(Axis(1), kept))
            }
            DistanceMatrix::Float(d) => {
                DistanceMatrix::Float(d.select(Axis(0), kept).select(Axis(1), kept))
            }
        }
    }
}

/// Converts atom positions into an `N×3` coordinate matrix.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] unless the positions are 2-D with
/// exactly three columns.
pub fn coordinates(positions: &Tensor) -> Result<Array2<f32>, Error> {
    let shape = positions.shape();
    if shape.len() != 2 {
        return Err(Error::invalid_shape(
            keys::POS,
            "a 2D tensor of atom coordinates",
            shape,
        ));
    }
    if shape[1] != 3 {
        return Err(Error::invalid_shape(keys::POS, "XYZ coordinates [N, 3]", shape));
    }
    positions
        .to_f32()
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::invalid_shape(keys::POS, "[N, 3]", shape))
}

/// Dense Euclidean distance matrix between all pairs of atoms, stored in
/// half precision.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] for positions that are not `N×3`.
pub fn node_distances(positions: &Tensor) -> Result<Array2<f16>, Error> {
    let coords = coordinates(positions)?;
    let n = coords.nrows();
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            return f16::ZERO;
        }
        let a = coords.row(i);
        let b = coords.row(j);
        let dist_sq: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
        f16::from_f32(dist_sq.sqrt())
    }))
}

/// Extracts the neighbor pairs of a distance matrix.
///
/// Only the strict lower triangle is scanned, so self-pairs are skipped
/// and each unordered pair is seen once. A pair `(row, col)` with
/// `row > col` is kept when `0 < d < cutoff`; coincident atoms and atoms
/// exactly at the cutoff are not connected. Pairs come out in row-major
/// order.
///
/// Both bounds are compared in the element type `A`, which must be the
/// precision of the matrix.
pub fn edges_from_dist<A>(dist: ArrayView2<'_, A>, cutoff: A) -> Vec<[usize; 2]>
where
    A: Copy + PartialOrd + Default,
{
    let zero = A::default();
    let mut edges = Vec::new();
    for (row, values) in dist.outer_iter().enumerate() {
        for (col, &d) in values.iter().enumerate().take(row) {
            if zero < d && d < cutoff {
                edges.push([row, col]);
            }
        }
    }
    edges
}

/// Picks the distance matrix for the retained atoms.
///
/// A precomputed matrix is used when supplied: as-is if it already
/// matches the retained atoms, or reduced to them if it was built for the
/// padded atom set. Otherwise distances are computed from `positions`.
///
/// # Errors
///
/// - [`Error::InvalidShape`] if a precomputed matrix fits neither atom count
/// - any error of [`node_distances`]
pub fn resolve_distances(
    precomputed: Option<&Tensor>,
    positions: &Tensor,
    selection: &NodeSelection,
) -> Result<DistanceMatrix, Error> {
    let Some(tensor) = precomputed else {
        return node_distances(positions).map(DistanceMatrix::Half);
    };
    let matrix = DistanceMatrix::from_tensor(tensor)?;
    if matrix.len() == selection.len() {
        Ok(matrix)
    } else if matrix.len() == selection.original_len {
        Ok(matrix.restrict(&selection.kept))
    } else {
        Err(Error::invalid_shape(
            keys::DISTANCE_MATRIX,
            format!(
                "[{0}, {0}] or [{1}, {1}]",
                selection.len(),
                selection.original_len
            ),
            tensor.shape(),
        ))
    }
}
