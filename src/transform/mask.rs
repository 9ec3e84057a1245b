//! Removal of padding atoms before graph construction.
//!
//! Some datasets pad every structure to a common atom count. Padding rows
//! are identified either by an explicit `src_mask` (boolean per atom, or a
//! list of retained indices) or, failing that, by a species label of zero.

use super::atoms::sample_tensor;
use super::error::Error;
use crate::model::keys;
use crate::model::sample::Sample;
use crate::model::tensor::Tensor;

/// Atom labels and positions with padding removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Masked {
    /// Species labels of the retained atoms.
    pub labels: Tensor,
    /// Positions of the retained atoms.
    pub positions: Tensor,
    /// Which atoms survived masking.
    pub selection: NodeSelection,
}

/// Indices of the atoms retained out of the original, padded count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelection {
    /// Retained atom indices, in output order.
    pub kept: Vec<usize>,
    /// Atom count before masking.
    pub original_len: usize,
}

impl NodeSelection {
    pub fn all(len: usize) -> Self {
        Self {
            kept: (0..len).collect(),
            original_len: len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Whether masking dropped any atom.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.kept.len() == self.original_len && self.kept.iter().enumerate().all(|(i, &k)| i == k)
    }

    /// Applies the selection to a per-atom tensor of the original length.
    ///
    /// Tensors whose leading dimension is not the original atom count are
    /// returned unchanged.
    pub fn restrict(&self, tensor: &Tensor) -> Tensor {
        if !self.is_identity() && tensor.leading_dim() == Some(self.original_len) {
            tensor.select_rows(&self.kept)
        } else {
            tensor.clone()
        }
    }
}

/// Applies the padding mask to atom labels and positions.
///
/// Uses `src_mask` from the sample when present, otherwise keeps the atoms
/// whose label is strictly positive. Labels and positions are filtered
/// with the same indices so they stay aligned.
///
/// # Errors
///
/// - [`Error::InvalidShape`] for zero-dimensional labels or positions
/// - [`Error::CountMismatch`] if labels and positions differ in length
/// - [`Error::InvalidMask`] if the mask does not describe the atoms
pub fn apply_mask(labels: &Tensor, positions: &Tensor, sample: &Sample) -> Result<Masked, Error> {
    let num_atoms = labels
        .leading_dim()
        .ok_or_else(|| Error::invalid_shape(keys::ATOMIC_NUMBERS, "[N]", labels.shape()))?;
    let num_positions = positions
        .leading_dim()
        .ok_or_else(|| Error::invalid_shape(keys::POS, "[N, 3]", positions.shape()))?;
    if num_atoms != num_positions {
        return Err(Error::CountMismatch {
            what: "atom labels",
            expected: num_positions,
            found: num_atoms,
        });
    }

    let kept = match sample_tensor(sample, keys::SRC_MASK)? {
        Some(mask) => mask_indices(mask, num_atoms)?,
        None => {
            let positive = labels.positive_mask();
            if positive.len() != num_atoms {
                return Err(Error::InvalidMask(format!(
                    "cannot derive a per-atom mask from labels of shape {:?}",
                    labels.shape()
                )));
            }
            true_indices(&positive)
        }
    };

    Ok(Masked {
        labels: labels.select_rows(&kept),
        positions: positions.select_rows(&kept),
        selection: NodeSelection {
            kept,
            original_len: num_atoms,
        },
    })
}

fn true_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect()
}

fn mask_indices(mask: &Tensor, num_atoms: usize) -> Result<Vec<usize>, Error> {
    match mask {
        Tensor::Bool(flags) => {
            if flags.len() != num_atoms {
                return Err(Error::InvalidMask(format!(
                    "boolean mask has {} entries for {} atoms",
                    flags.len(),
                    num_atoms
                )));
            }
            let flags: Vec<bool> = flags.iter().copied().collect();
            Ok(true_indices(&flags))
        }
        Tensor::Int(indices) => {
            if indices.ndim() != 1 {
                return Err(Error::InvalidMask(format!(
                    "index mask must be one-dimensional, got shape {:?}",
                    indices.shape()
                )));
            }
            indices
                .iter()
                .map(|&idx| {
                    usize::try_from(idx)
                        .ok()
                        .filter(|&i| i < num_atoms)
                        .ok_or_else(|| {
                            Error::InvalidMask(format!(
                                "index {idx} is out of range for {num_atoms} atoms"
                            ))
                        })
                })
                .collect()
        }
        other => Err(Error::InvalidMask(format!(
            "expected a bool or int64 mask, got {}",
            other.dtype()
        ))),
    }
}
