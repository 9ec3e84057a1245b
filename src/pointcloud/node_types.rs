use ndarray::{Array1, ArrayView1, Ix3, s};

use super::error::Error;
use crate::model::tensor::Tensor;

/// Index of the largest element, first one on ties.
fn argmax(values: ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Recovers source and destination species from pairwise one-hot features.
///
/// `features` has shape `[S, D, 2C]`: the first `C` channels one-hot encode
/// the species of the source atom, the last `C` those of the destination
/// atom. Source species are read down the first destination column and
/// destination species along the first source row, so
///
/// - `src[i] = argmax(features[i, 0, ..C])`
/// - `dst[j] = argmax(features[0, j, C..])`
///
/// # Errors
///
/// - [`Error::InvalidShape`] unless the features are 3-D
/// - [`Error::OddChannels`] if the channel count is odd
/// - [`Error::EmptyAxis`] if any axis is empty
pub fn retrieve_node_types(features: &Tensor) -> Result<(Array1<i64>, Array1<i64>), Error> {
    let shape = features.shape().to_vec();
    if shape.len() != 3 {
        return Err(Error::InvalidShape {
            what: "pairwise features",
            expected: "[S, D, 2C]",
            found: shape,
        });
    }
    if shape.contains(&0) {
        return Err(Error::EmptyAxis(shape));
    }
    if shape[2] % 2 != 0 {
        return Err(Error::OddChannels(shape[2]));
    }
    let classes = shape[2] / 2;

    let feats = features
        .to_f32()
        .into_dimensionality::<Ix3>()
        .map_err(|_| Error::InvalidShape {
            what: "pairwise features",
            expected: "[S, D, 2C]",
            found: shape.clone(),
        })?;

    let src = feats
        .slice(s![.., 0, ..classes])
        .outer_iter()
        .map(|row| argmax(row) as i64)
        .collect();
    let dst = feats
        .slice(s![0, .., classes..])
        .outer_iter()
        .map(|row| argmax(row) as i64)
        .collect();
    Ok((src, dst))
}
