use std::str::FromStr;

use half::f16;
use ndarray::{ArrayD, IxDyn};
use serde::Serialize;
use serde_json::Value;

use super::error::Error;
use crate::model::tensor::{DType, Tensor};

/// Serialized form of a [`Tensor`]: dtype name, shape and row-major data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorRecord {
    pub dtype: &'static str,
    pub shape: Vec<usize>,
    pub data: TensorData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TensorData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f32>),
}

impl From<&Tensor> for TensorRecord {
    fn from(tensor: &Tensor) -> Self {
        let data = match tensor {
            Tensor::Float(a) => TensorData::Float(a.iter().copied().collect()),
            Tensor::Half(a) => TensorData::Float(a.iter().map(|&v| f32::from(v)).collect()),
            Tensor::Int(a) => TensorData::Int(a.iter().copied().collect()),
            Tensor::Bool(a) => TensorData::Bool(a.iter().copied().collect()),
        };
        Self {
            dtype: tensor.dtype().name(),
            shape: tensor.shape().to_vec(),
            data,
        }
    }
}

/// Parses a tensor from JSON.
///
/// Accepts either nested arrays (the shape is inferred, integers become
/// `int64`, other numbers `float32`, booleans `bool`) or an explicit
/// `{"dtype", "shape", "data"}` record whose data may be flat or nested.
///
/// # Errors
///
/// Returns [`Error::Parse`] for ragged arrays, mixed element kinds,
/// unknown dtypes, or data that does not fill the declared shape, and
/// [`Error::UnsupportedValue`] for strings, nulls and other objects.
pub fn tensor_from_json(key: &str, value: &Value) -> Result<Tensor, Error> {
    match value {
        Value::Object(fields) if fields.contains_key("dtype") => {
            let dtype = fields
                .get("dtype")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::parse(key, "'dtype' must be a string"))?;
            let dtype = DType::from_str(dtype).map_err(|e| Error::parse(key, e.to_string()))?;
            let data = fields
                .get("data")
                .ok_or_else(|| Error::parse(key, "record has no 'data' field"))?;
            let mut leaves = Vec::new();
            let inferred = flatten(key, data, &mut leaves)?;
            let shape = match fields.get("shape") {
                Some(shape) => parse_shape(key, shape)?,
                None => inferred,
            };
            build(key, dtype, shape, &leaves)
        }
        Value::Array(_) | Value::Number(_) | Value::Bool(_) => {
            let mut leaves = Vec::new();
            let shape = flatten(key, value, &mut leaves)?;
            let dtype = infer_dtype(key, &leaves)?;
            build(key, dtype, shape, &leaves)
        }
        _ => Err(Error::UnsupportedValue(key.to_string())),
    }
}

fn parse_shape(key: &str, shape: &Value) -> Result<Vec<usize>, Error> {
    shape
        .as_array()
        .ok_or_else(|| Error::parse(key, "'shape' must be an array"))?
        .iter()
        .map(|dim| {
            dim.as_u64()
                .and_then(|d| usize::try_from(d).ok())
                .ok_or_else(|| Error::parse(key, format!("invalid dimension {dim}")))
        })
        .collect()
}

/// Collects the scalar leaves of `value` in row-major order and returns
/// the shape of the nesting.
fn flatten<'a>(key: &str, value: &'a Value, leaves: &mut Vec<&'a Value>) -> Result<Vec<usize>, Error> {
    let Value::Array(items) = value else {
        leaves.push(value);
        return Ok(Vec::new());
    };
    let mut inner: Option<Vec<usize>> = None;
    for item in items {
        let shape = flatten(key, item, leaves)?;
        match &inner {
            Some(expected) if *expected != shape => {
                return Err(Error::parse(
                    key,
                    format!("ragged nested array: {expected:?} vs {shape:?}"),
                ));
            }
            Some(_) => {}
            None => inner = Some(shape),
        }
    }
    let mut shape = vec![items.len()];
    shape.extend(inner.unwrap_or_default());
    Ok(shape)
}

fn infer_dtype(key: &str, leaves: &[&Value]) -> Result<DType, Error> {
    if leaves.iter().all(|v| v.is_boolean()) && !leaves.is_empty() {
        Ok(DType::Bool)
    } else if leaves.iter().all(|v| v.is_i64() || v.is_u64()) && !leaves.is_empty() {
        Ok(DType::Int64)
    } else if leaves.iter().all(|v| v.is_number()) {
        Ok(DType::Float32)
    } else {
        Err(Error::parse(key, "array mixes booleans and numbers"))
    }
}

fn build(key: &str, dtype: DType, shape: Vec<usize>, leaves: &[&Value]) -> Result<Tensor, Error> {
    let numel: usize = shape.iter().product();
    if numel != leaves.len() {
        return Err(Error::parse(
            key,
            format!("{} values cannot fill shape {shape:?}", leaves.len()),
        ));
    }
    let element = |kind: &str| Error::parse(key, format!("expected {kind} elements for {dtype}"));
    let dim = IxDyn(&shape);
    let shape_err = |e: ndarray::ShapeError| Error::parse(key, e.to_string());

    let tensor = match dtype {
        DType::Float32 => {
            let data = leaves
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32).ok_or_else(|| element("numeric")))
                .collect::<Result<Vec<_>, _>>()?;
            Tensor::Float(ArrayD::from_shape_vec(dim, data).map_err(shape_err)?)
        }
        DType::Float16 => {
            let data = leaves
                .iter()
                .map(|v| v.as_f64().map(f16::from_f64).ok_or_else(|| element("numeric")))
                .collect::<Result<Vec<_>, _>>()?;
            Tensor::Half(ArrayD::from_shape_vec(dim, data).map_err(shape_err)?)
        }
        DType::Int64 => {
            let data = leaves
                .iter()
                .map(|v| as_integer(v).ok_or_else(|| element("integer")))
                .collect::<Result<Vec<_>, _>>()?;
            Tensor::Int(ArrayD::from_shape_vec(dim, data).map_err(shape_err)?)
        }
        DType::Bool => {
            let data = leaves
                .iter()
                .map(|v| v.as_bool().ok_or_else(|| element("boolean")))
                .collect::<Result<Vec<_>, _>>()?;
            Tensor::Bool(ArrayD::from_shape_vec(dim, data).map_err(shape_err)?)
        }
    };
    Ok(tensor)
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn nested_integers_become_int64() {
        let t = tensor_from_json("z", &json!([6, 1, 1])).unwrap();
        assert_eq!(t, Tensor::from(array![6i64, 1, 1]));
    }

    #[test]
    fn nested_floats_infer_shape() {
        let t = tensor_from_json("pos", &json!([[0.0, 1, 2], [3.5, 4, 5]])).unwrap();
        assert_eq!(t.dtype(), DType::Float32);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.to_f32()[[1, 0]], 3.5);
    }

    #[test]
    fn booleans_and_scalars() {
        let mask = tensor_from_json("m", &json!([true, false])).unwrap();
        assert_eq!(mask, Tensor::from(array![true, false]));
        let scalar = tensor_from_json("e", &json!(-1.5)).unwrap();
        assert_eq!(scalar.ndim(), 0);
    }

    #[test]
    fn explicit_record_with_flat_data() {
        let value = json!({"dtype": "float16", "shape": [2, 2], "data": [0, 1, 1, 0]});
        let t = tensor_from_json("d", &value).unwrap();
        assert_eq!(t.dtype(), DType::Float16);
        assert_eq!(t.shape(), &[2, 2]);
    }

    #[test]
    fn rejects_ragged_and_mixed_arrays() {
        assert!(matches!(
            tensor_from_json("x", &json!([[1, 2], [3]])),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            tensor_from_json("x", &json!([1, true])),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            tensor_from_json("x", &json!({"dtype": "int64", "shape": [3], "data": [1, 2]})),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            tensor_from_json("x", &json!("text")),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn record_serializes_row_major() {
        let record = TensorRecord::from(&Tensor::from(array![[1i64, 2], [3, 4]]));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"dtype": "int64", "shape": [2, 2], "data": [1, 2, 3, 4]}));
    }

    #[test]
    fn record_round_trips_through_parser() {
        let original = Tensor::from(array![[0.5f32, -1.0], [2.0, 3.25]]);
        let value = serde_json::to_value(TensorRecord::from(&original)).unwrap();
        assert_eq!(tensor_from_json("x", &value).unwrap(), original);
    }
}
