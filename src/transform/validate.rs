use super::error::Error;
use crate::model::keys;
use crate::model::sample::Sample;

/// Checks that `sample` can be converted into a graph.
///
/// # Errors
///
/// - [`Error::GraphAlreadyPresent`] if any key already holds a graph
/// - [`Error::MissingKey`] if `pos` is absent
/// - [`Error::MissingAtomTypes`] if neither `atomic_numbers` nor
///   `pc_features` is present
pub fn check_sample(sample: &Sample) -> Result<(), Error> {
    if let Some(key) = sample.graph_key() {
        return Err(Error::GraphAlreadyPresent {
            key: key.to_string(),
        });
    }
    if !sample.contains_key(keys::POS) {
        return Err(Error::missing_key(keys::POS, "atomic positions"));
    }
    if !sample.contains_key(keys::ATOMIC_NUMBERS) && !sample.contains_key(keys::PC_FEATURES) {
        return Err(Error::MissingAtomTypes);
    }
    Ok(())
}
