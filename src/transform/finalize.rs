use super::backend::GraphBackend;
use super::config::TransformConfig;
use super::copy::{copy_edge_keys, copy_node_keys};
use super::error::Error;
use super::mask::NodeSelection;
use crate::model::keys;
use crate::model::sample::Sample;

/// Completes a conversion started by the graph materializer.
///
/// Copies the configured node and edge attributes onto the graph stored
/// under `graph`, removes the point-cloud-only keys from the sample, and
/// lets the backend put the edge set into its final directed form.
///
/// # Errors
///
/// - [`Error::MissingKey`] if the sample holds no graph
/// - attachment or symmetrization errors from the backend
pub fn finalize(
    sample: &mut Sample,
    config: &TransformConfig,
    backend: &dyn GraphBackend,
    selection: &NodeSelection,
) -> Result<(), Error> {
    let mut graph = sample
        .take_graph()
        .ok_or_else(|| Error::missing_key(keys::GRAPH, "graph built by the transform"))?;

    copy_node_keys(sample, &mut graph, &config.node_keys, selection, backend)?;
    copy_edge_keys(sample, &mut graph, config.active_edge_keys(), backend)?;

    for key in keys::POINT_CLOUD_ONLY {
        sample.remove(key);
    }

    sample.set_graph(backend.symmetrize(graph)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::Backend;
    use crate::model::tensor::Tensor;
    use crate::transform::backend::backend_for;
    use ndarray::{Array2, Array3, array};

    fn converted_sample(backend: &dyn GraphBackend) -> Sample {
        let graph = backend
            .build(
                &[[1, 0], [2, 0]],
                Tensor::from(array![1i64, 6, 8]),
                Tensor::from(Array2::<f32>::zeros((3, 3))),
            )
            .unwrap();
        let mut sample = Sample::new()
            .with(keys::POS, Tensor::from(Array2::<f32>::zeros((3, 3))))
            .with(keys::ATOMIC_NUMBERS, Tensor::from(array![1i64, 6, 8]))
            .with(keys::PC_FEATURES, Tensor::from(Array3::<f32>::zeros((3, 3, 4))))
            .with(keys::SIZES, Tensor::from(array![3i64]))
            .with("energy", Tensor::from(array![-1.5f32]));
        sample.set_graph(graph);
        sample
    }

    #[test]
    fn strips_point_cloud_keys_and_keeps_the_rest() {
        for b in Backend::available() {
            let backend = backend_for(b).unwrap();
            let mut sample = converted_sample(backend.as_ref());
            finalize(
                &mut sample,
                &TransformConfig::for_backend(b),
                backend.as_ref(),
                &NodeSelection::all(3),
            )
            .unwrap();
            for key in keys::POINT_CLOUD_ONLY {
                assert!(!sample.contains_key(key), "{key} should be removed");
            }
            assert!(sample.contains_key("energy"));
            assert!(sample.graph().is_some());
        }
    }

    #[cfg(feature = "dgl")]
    #[test]
    fn dgl_graphs_become_bidirected() {
        let backend = backend_for(Backend::Dgl).unwrap();
        let mut sample = converted_sample(backend.as_ref());
        finalize(
            &mut sample,
            &TransformConfig::for_backend(Backend::Dgl),
            backend.as_ref(),
            &NodeSelection::all(3),
        )
        .unwrap();
        let graph = sample.graph().unwrap();
        assert_eq!(graph.edges(), vec![(0, 1), (0, 2), (1, 0), (2, 0)]);
    }

    #[cfg(feature = "pyg")]
    #[test]
    fn pyg_graphs_stay_directed() {
        let backend = backend_for(Backend::Pyg).unwrap();
        let mut sample = converted_sample(backend.as_ref());
        finalize(
            &mut sample,
            &TransformConfig::for_backend(Backend::Pyg),
            backend.as_ref(),
            &NodeSelection::all(3),
        )
        .unwrap();
        assert_eq!(sample.graph().unwrap().edges(), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn requires_a_graph() {
        let b = Backend::available()[0];
        let backend = backend_for(b).unwrap();
        let mut sample = Sample::new();
        assert!(matches!(
            finalize(
                &mut sample,
                &TransformConfig::for_backend(b),
                backend.as_ref(),
                &NodeSelection::all(0),
            ),
            Err(Error::MissingKey { key: "graph", .. })
        ));
    }
}
