use std::collections::HashSet;

use log::warn;

use super::backend::GraphBackend;
use super::error::Error;
use super::mask::NodeSelection;
use crate::model::graph::Graph;
use crate::model::sample::{Sample, Value};

fn available_keys(sample: &Sample) -> Vec<&str> {
    sample.keys().collect()
}

/// Copies the configured per-node attributes from `sample` onto `graph`.
///
/// Attributes sized for the padded atom set are reduced with `selection`
/// first. Keys missing from the sample (or holding a graph) are skipped
/// with a warning.
///
/// # Errors
///
/// Propagates attachment failures from the backend, such as a tensor
/// whose length does not match the node count.
pub fn copy_node_keys(
    sample: &Sample,
    graph: &mut Graph,
    node_keys: &HashSet<String>,
    selection: &NodeSelection,
    backend: &dyn GraphBackend,
) -> Result<(), Error> {
    for key in node_keys {
        match sample.get(key) {
            Some(Value::Tensor(value)) => {
                backend.attach_node_attribute(graph, key, selection.restrict(value))?;
            }
            Some(Value::Graph(_)) => {
                warn!("node data '{key}' holds a graph, not a tensor; skipping");
            }
            None => {
                warn!(
                    "expected node data '{key}' but it was not found in sample: {:?}",
                    available_keys(sample)
                );
            }
        }
    }
    Ok(())
}

/// Copies the configured per-edge attributes from `sample` onto `graph`.
///
/// Does nothing when no edge keys are configured. Keys missing from the
/// sample are skipped with a warning.
///
/// # Errors
///
/// Propagates attachment failures from the backend.
pub fn copy_edge_keys(
    sample: &Sample,
    graph: &mut Graph,
    edge_keys: Option<&[String]>,
    backend: &dyn GraphBackend,
) -> Result<(), Error> {
    let Some(edge_keys) = edge_keys else {
        return Ok(());
    };
    for key in edge_keys {
        match sample.get(key) {
            Some(Value::Tensor(value)) => {
                backend.attach_edge_attribute(graph, key, value.clone())?;
            }
            Some(Value::Graph(_)) => {
                warn!("edge data '{key}' holds a graph, not a tensor; skipping");
            }
            None => {
                warn!(
                    "expected edge data '{key}' but it was not found in sample: {:?}",
                    available_keys(sample)
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::Backend;
    use crate::model::tensor::Tensor;
    use crate::transform::backend::backend_for;
    use ndarray::{Array2, array};

    fn build(backend: &dyn GraphBackend) -> Graph {
        backend
            .build(
                &[[1, 0], [2, 1]],
                Tensor::from(array![1i64, 6, 8]),
                Tensor::from(Array2::<f32>::zeros((3, 3))),
            )
            .unwrap()
    }

    fn keys<const N: usize>(names: [&str; N]) -> HashSet<String> {
        names.into_iter().map(String::from).collect()
    }

    #[test]
    fn copies_present_node_keys_and_skips_missing() {
        for b in Backend::available() {
            let backend = backend_for(b).unwrap();
            let mut graph = build(backend.as_ref());
            let sample = Sample::new().with("charge", Tensor::from(array![0.1f32, -0.2, 0.1]));
            copy_node_keys(
                &sample,
                &mut graph,
                &keys(["charge", "force"]),
                &NodeSelection::all(3),
                backend.as_ref(),
            )
            .unwrap();
            assert!(graph.node_attribute("charge").is_some());
            assert!(graph.node_attribute("force").is_none());
        }
    }

    #[test]
    fn padded_node_attributes_are_restricted() {
        for b in Backend::available() {
            let backend = backend_for(b).unwrap();
            let mut graph = build(backend.as_ref());
            let sample = Sample::new().with(
                "force",
                Tensor::from(Array2::from_shape_fn((5, 3), |(i, _)| i as f32)),
            );
            let selection = NodeSelection {
                kept: vec![0, 2, 4],
                original_len: 5,
            };
            copy_node_keys(
                &sample,
                &mut graph,
                &keys(["force"]),
                &selection,
                backend.as_ref(),
            )
            .unwrap();
            let force = graph.node_attribute("force").unwrap().to_f32();
            assert_eq!(force.shape(), &[3, 3]);
            assert_eq!(force[[2, 0]], 4.0);
        }
    }

    #[test]
    fn unset_edge_keys_copy_nothing() {
        for b in Backend::available() {
            let backend = backend_for(b).unwrap();
            let mut graph = build(backend.as_ref());
            let sample = Sample::new().with("bond", Tensor::from(array![1.0f32, 2.0]));
            copy_edge_keys(&sample, &mut graph, None, backend.as_ref()).unwrap();
            assert!(graph.edge_data().is_empty());
        }
    }

    #[test]
    fn copies_configured_edge_keys() {
        for b in Backend::available() {
            let backend = backend_for(b).unwrap();
            let mut graph = build(backend.as_ref());
            let sample = Sample::new().with("bond", Tensor::from(array![1.0f32, 2.0]));
            let edge_keys = vec!["bond".to_string(), "missing".to_string()];
            copy_edge_keys(&sample, &mut graph, Some(&edge_keys), backend.as_ref()).unwrap();
            assert_eq!(graph.edge_attribute("bond").unwrap().shape(), &[2]);
            assert!(graph.edge_attribute("missing").is_none());
        }
    }
}
