//! JSON reading and writing of samples and graphs.
//!
//! A sample is stored as a JSON object mapping each key to a tensor, given
//! either as nested arrays or as an explicit `{"dtype", "shape", "data"}`
//! record. Tensors are always written back as records so dtypes survive;
//! graphs are written as records carrying the backend, node count, edge
//! list and attribute tensors.

mod error;
mod tensor;

pub use error::Error;
pub use tensor::{TensorData, TensorRecord, tensor_from_json};

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::Serialize;
use serde_json::Value as Json;

use crate::model::graph::{AttributeStore, Backend, Graph};
use crate::model::sample::{Sample, Value};

/// Serialized form of a [`Graph`].
#[derive(Debug, Clone, Serialize)]
pub struct GraphRecord {
    pub backend: Backend,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub edges: Vec<[usize; 2]>,
    pub node_data: BTreeMap<String, TensorRecord>,
    pub edge_data: BTreeMap<String, TensorRecord>,
}

impl From<&Graph> for GraphRecord {
    fn from(graph: &Graph) -> Self {
        let records = |store: &AttributeStore| -> BTreeMap<String, TensorRecord> {
            store
                .iter()
                .map(|(k, t)| (k.clone(), TensorRecord::from(t)))
                .collect()
        };
        Self {
            backend: graph.backend(),
            num_nodes: graph.num_nodes(),
            num_edges: graph.num_edges(),
            edges: graph.edges().into_iter().map(|(u, v)| [u, v]).collect(),
            node_data: records(graph.node_data()),
            edge_data: records(graph.edge_data()),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum EntryRecord {
    Tensor(TensorRecord),
    Graph(GraphRecord),
}

/// Reads a sample from a JSON object of tensors.
///
/// # Errors
///
/// Returns [`Error::Json`] for malformed JSON, [`Error::NotAnObject`] if
/// the document is not an object, and tensor parse errors per key.
/// Graph records cannot be read back and are rejected with
/// [`Error::UnsupportedValue`].
pub fn read_sample<R: Read>(reader: R) -> Result<Sample, Error> {
    let document: Json = serde_json::from_reader(reader)?;
    let Json::Object(entries) = document else {
        return Err(Error::NotAnObject);
    };
    let mut sample = Sample::new();
    for (key, value) in &entries {
        sample.insert(key.as_str(), tensor_from_json(key, value)?);
    }
    Ok(sample)
}

/// Writes `sample` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_sample<W: Write>(mut writer: W, sample: &Sample) -> Result<(), Error> {
    let entries: BTreeMap<&str, EntryRecord> = sample
        .iter()
        .map(|(key, value)| {
            let record = match value {
                Value::Tensor(t) => EntryRecord::Tensor(TensorRecord::from(t)),
                Value::Graph(g) => EntryRecord::Graph(GraphRecord::from(g)),
            };
            (key.as_str(), record)
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &entries)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a single graph as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_graph<W: Write>(mut writer: W, graph: &Graph) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, &GraphRecord::from(graph))?;
    writeln!(writer)?;
    Ok(())
}
