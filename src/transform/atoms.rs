use super::error::Error;
use crate::model::keys;
use crate::model::sample::{Sample, Value};
use crate::model::tensor::Tensor;
use crate::pointcloud::retrieve_node_types;

/// Looks up a tensor-valued sample key.
///
/// Returns `Ok(None)` if the key is absent and an error if it holds a graph.
pub(crate) fn sample_tensor<'a>(sample: &'a Sample, key: &str) -> Result<Option<&'a Tensor>, Error> {
    match sample.get(key) {
        None => Ok(None),
        Some(Value::Tensor(t)) => Ok(Some(t)),
        Some(Value::Graph(_)) => Err(Error::not_a_tensor(key)),
    }
}

/// Extracts the per-atom species labels used as node data.
///
/// `atomic_numbers` is used as-is when present. Otherwise the source
/// species are inferred from the one-hot blocks of `pc_features`, and
/// their count must equal the number of atom positions.
///
/// # Errors
///
/// - [`Error::CountMismatch`] if the inferred source count differs from
///   the position count
/// - [`Error::MissingAtomTypes`] if neither key is present
/// - [`Error::NodeTypes`] if `pc_features` is malformed
/// - [`Error::InvalidShape`] if `pos` is a scalar
pub fn resolve_atom_types(sample: &Sample) -> Result<Tensor, Error> {
    if let Some(numbers) = sample_tensor(sample, keys::ATOMIC_NUMBERS)? {
        return Ok(numbers.clone());
    }

    let Some(features) = sample_tensor(sample, keys::PC_FEATURES)? else {
        return Err(Error::MissingAtomTypes);
    };
    let (src_types, _dst_types) = retrieve_node_types(features)?;

    let positions = sample_tensor(sample, keys::POS)?
        .ok_or_else(|| Error::missing_key(keys::POS, "atomic positions"))?;
    let num_positions = positions
        .leading_dim()
        .ok_or_else(|| Error::invalid_shape(keys::POS, "[N, 3]", positions.shape()))?;
    if src_types.len() != num_positions {
        return Err(Error::CountMismatch {
            what: "source nodes",
            expected: num_positions,
            found: src_types.len(),
        });
    }
    Ok(Tensor::from(src_types))
}
