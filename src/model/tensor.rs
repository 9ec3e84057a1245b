use std::fmt;
use std::str::FromStr;

use half::f16;
use ndarray::{Array, ArrayD, Axis, Dimension};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported tensor dtype: '{0}'")]
pub struct ParseDTypeError(String);

/// Element type of a [`Tensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Float32,
    Float16,
    Int64,
    Bool,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float16 => "float16",
            DType::Int64 => "int64",
            DType::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ParseDTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float32" | "f32" | "float" => Ok(DType::Float32),
            "float16" | "f16" | "half" => Ok(DType::Float16),
            "int64" | "i64" | "long" | "int" => Ok(DType::Int64),
            "bool" => Ok(DType::Bool),
            _ => Err(ParseDTypeError(s.to_string())),
        }
    }
}

/// Dense, dynamically shaped array stored in a sample or on a graph.
///
/// Samples carry heterogeneous data (coordinates, species labels, masks,
/// pairwise feature blocks), so the element type is tracked at runtime
/// and converted on demand by the consumers that need a specific one.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    Float(ArrayD<f32>),
    Half(ArrayD<f16>),
    Int(ArrayD<i64>),
    Bool(ArrayD<bool>),
}

impl Tensor {
    pub fn dtype(&self) -> DType {
        match self {
            Tensor::Float(_) => DType::Float32,
            Tensor::Half(_) => DType::Float16,
            Tensor::Int(_) => DType::Int64,
            Tensor::Bool(_) => DType::Bool,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Tensor::Float(a) => a.shape(),
            Tensor::Half(a) => a.shape(),
            Tensor::Int(a) => a.shape(),
            Tensor::Bool(a) => a.shape(),
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Size of the leading axis, or `None` for a zero-dimensional tensor.
    #[inline]
    pub fn leading_dim(&self) -> Option<usize> {
        self.shape().first().copied()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape().iter().product()
    }

    /// Returns the data converted to `f32`.
    ///
    /// Booleans map to `1.0`/`0.0`; half precision values widen exactly.
    pub fn to_f32(&self) -> ArrayD<f32> {
        match self {
            Tensor::Float(a) => a.clone(),
            Tensor::Half(a) => a.mapv(f32::from),
            Tensor::Int(a) => a.mapv(|v| v as f32),
            Tensor::Bool(a) => a.mapv(|v| if v { 1.0 } else { 0.0 }),
        }
    }

    /// Returns the data converted to `i64`, or `None` if any floating
    /// point element is not integral.
    pub fn to_i64(&self) -> Option<ArrayD<i64>> {
        match self {
            Tensor::Int(a) => Some(a.clone()),
            Tensor::Bool(a) => Some(a.mapv(i64::from)),
            Tensor::Float(a) => {
                if a.iter().all(|v| v.fract() == 0.0) {
                    Some(a.mapv(|v| v as i64))
                } else {
                    None
                }
            }
            Tensor::Half(a) => {
                if a.iter().all(|v| f32::from(*v).fract() == 0.0) {
                    Some(a.mapv(|v| f32::from(v) as i64))
                } else {
                    None
                }
            }
        }
    }

    /// Element-wise `value > 0`, flattened in logical order.
    pub fn positive_mask(&self) -> Vec<bool> {
        match self {
            Tensor::Float(a) => a.iter().map(|&v| v > 0.0).collect(),
            Tensor::Half(a) => a.iter().map(|&v| v > f16::ZERO).collect(),
            Tensor::Int(a) => a.iter().map(|&v| v > 0).collect(),
            Tensor::Bool(a) => a.iter().copied().collect(),
        }
    }

    /// Gathers rows of the leading axis in the given order.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is zero-dimensional or an index is out of bounds.
    pub fn select_rows(&self, indices: &[usize]) -> Tensor {
        match self {
            Tensor::Float(a) => Tensor::Float(a.select(Axis(0), indices)),
            Tensor::Half(a) => Tensor::Half(a.select(Axis(0), indices)),
            Tensor::Int(a) => Tensor::Int(a.select(Axis(0), indices)),
            Tensor::Bool(a) => Tensor::Bool(a.select(Axis(0), indices)),
        }
    }
}

impl<D: Dimension> From<Array<f32, D>> for Tensor {
    fn from(array: Array<f32, D>) -> Self {
        Tensor::Float(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<f16, D>> for Tensor {
    fn from(array: Array<f16, D>) -> Self {
        Tensor::Half(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<i64, D>> for Tensor {
    fn from(array: Array<i64, D>) -> Self {
        Tensor::Int(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<bool, D>> for Tensor {
    fn from(array: Array<bool, D>) -> Self {
        Tensor::Bool(array.into_dyn())
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.dtype(), self.shape())
    }
}
