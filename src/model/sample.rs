use std::collections::BTreeMap;
use std::collections::btree_map;

use super::graph::Graph;
use super::keys;
use super::tensor::Tensor;

/// A single value stored under a sample key.
#[derive(Debug, Clone)]
pub enum Value {
    Tensor(Tensor),
    Graph(Graph),
}

impl Value {
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            Value::Graph(_) => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            Value::Graph(g) => Some(g),
            Value::Tensor(_) => None,
        }
    }

    #[inline]
    pub fn is_graph(&self) -> bool {
        matches!(self, Value::Graph(_))
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Tensor(t)
    }
}

impl From<Graph> for Value {
    fn from(g: Graph) -> Self {
        Value::Graph(g)
    }
}

/// One structure flowing through the data pipeline: a mapping from
/// string keys to tensors and, after conversion, a graph.
///
/// Keys iterate in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    entries: BTreeMap<String, Value>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the one previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the tensor stored under `key`, if the key holds a tensor.
    pub fn tensor(&self, key: &str) -> Option<&Tensor> {
        self.entries.get(key).and_then(Value::as_tensor)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first key that holds a graph, if any.
    pub fn graph_key(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, value)| value.is_graph())
            .map(|(key, _)| key.as_str())
    }

    /// The converted graph stored under the `graph` key.
    pub fn graph(&self) -> Option<&Graph> {
        self.entries.get(keys::GRAPH).and_then(Value::as_graph)
    }

    pub fn set_graph(&mut self, graph: Graph) -> Option<Value> {
        self.insert(keys::GRAPH, graph)
    }

    pub fn take_graph(&mut self) -> Option<Graph> {
        match self.entries.remove(keys::GRAPH) {
            Some(Value::Graph(g)) => Some(g),
            Some(other) => {
                self.entries.insert(keys::GRAPH.to_string(), other);
                None
            }
            None => None,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Tensor)> for Sample {
    fn from_iter<I: IntoIterator<Item = (K, Tensor)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, t)| (k.into(), Value::Tensor(t)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn tensor_lookup_ignores_graphs() {
        let sample = Sample::new().with("pos", Tensor::from(array![[0.0f32, 0.0, 0.0]]));
        assert!(sample.tensor("pos").is_some());
        assert!(sample.tensor("missing").is_none());
        assert!(sample.graph_key().is_none());
        assert!(sample.graph().is_none());
    }

    #[test]
    fn take_graph_leaves_non_graph_values() {
        let mut sample = Sample::new().with(keys::GRAPH, Tensor::from(array![1i64]));
        assert!(sample.take_graph().is_none());
        assert!(sample.contains_key(keys::GRAPH));
    }

    #[test]
    fn keys_are_sorted() {
        let sample: Sample = [
            ("pos", Tensor::from(array![[0.0f32, 0.0, 0.0]])),
            ("atomic_numbers", Tensor::from(array![1i64])),
        ]
        .into_iter()
        .collect();
        assert_eq!(sample.keys().collect::<Vec<_>>(), vec!["atomic_numbers", "pos"]);
        assert_eq!(sample.len(), 2);
    }
}
