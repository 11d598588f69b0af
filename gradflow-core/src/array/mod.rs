//! # Numeric array backend (`array`)
//!
//! `NdArray` is the opaque value type the autodiff core computes on. It is a
//! contiguous, row-major CPU array of `f32` or `f64` elements with a shape.
//! The core only relies on a handful of capabilities from it:
//!
//! - element-wise addition (gradient accumulation),
//! - element-wise and scalar multiplication, exponential, power and negation
//!   (used by the bundled operations),
//! - `ones_like` / `zeros_like` allocation (seed gradients),
//! - the scalar/array predicate carried by [`Data`].
//!
//! Broadcasting is not supported: binary kernels require identical shapes.

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::types::DType;

mod arithmetic;
pub mod create;

pub use create::{full, ones, ones_like, rand, randn, zeros, zeros_like};

/// A contiguous n-dimensional array.
///
/// Clones are cheap: the element buffer is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct NdArray {
    pub(crate) buffer: Buffer,
    pub(crate) shape: Vec<usize>,
}

impl NdArray {
    /// Creates a new f32 array from flattened row-major data and a shape.
    ///
    /// # Errors
    /// Returns `GradFlowError::ArrayCreationError` if `data_vec.len()` does not
    /// match the number of elements described by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::check_len(data_vec.len(), &shape)?;
        Ok(NdArray {
            buffer: Buffer::F32(Arc::new(data_vec)),
            shape,
        })
    }

    /// Creates a new f64 array. Same contract as [`NdArray::new`].
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradFlowError> {
        Self::check_len(data_vec.len(), &shape)?;
        Ok(NdArray {
            buffer: Buffer::F64(Arc::new(data_vec)),
            shape,
        })
    }

    /// Creates a 0-dimensional f64 array holding `value`.
    pub fn scalar(value: f64) -> Self {
        NdArray {
            buffer: Buffer::F64(Arc::new(vec![value])),
            shape: vec![],
        }
    }

    /// Creates a 0-dimensional f32 array holding `value`.
    pub fn scalar_f32(value: f32) -> Self {
        NdArray {
            buffer: Buffer::F32(Arc::new(vec![value])),
            shape: vec![],
        }
    }

    fn check_len(data_len: usize, shape: &[usize]) -> Result<(), GradFlowError> {
        let numel: usize = shape.iter().product();
        if data_len != numel {
            return Err(GradFlowError::ArrayCreationError {
                data_len,
                shape: shape.to_vec(),
            });
        }
        Ok(())
    }

    pub(crate) fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Self {
        debug_assert_eq!(buffer.len(), shape.iter().product::<usize>());
        NdArray { buffer, shape }
    }

    /// Returns the shape of the array.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements.
    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    /// True for 0-dimensional arrays.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Returns a copy of the elements if the array is F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, GradFlowError> {
        Ok(self.buffer.try_get_f32()?.as_ref().clone())
    }

    /// Returns a copy of the elements if the array is F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, GradFlowError> {
        Ok(self.buffer.try_get_f64()?.as_ref().clone())
    }

    /// Returns the elements widened to f64, whatever the dtype.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.buffer {
            Buffer::F32(data) => data.iter().map(|&x| x as f64).collect(),
            Buffer::F64(data) => data.as_ref().clone(),
        }
    }

    /// Returns the single element of a one-element array as f64.
    ///
    /// # Errors
    /// `ShapeMismatch` if the array holds more or fewer than one element.
    pub fn item(&self) -> Result<f64, GradFlowError> {
        if self.numel() != 1 {
            return Err(GradFlowError::ShapeMismatch {
                expected: vec![],
                actual: self.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(match &self.buffer {
            Buffer::F32(data) => data[0] as f64,
            Buffer::F64(data) => data[0],
        })
    }
}

impl PartialEq for NdArray {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        match (&self.buffer, &other.buffer) {
            (Buffer::F32(a), Buffer::F32(b)) => a == b,
            (Buffer::F64(a), Buffer::F64(b)) => a == b,
            _ => false,
        }
    }
}

/// A raw payload as produced by users and by `Operation::forward`.
///
/// Forward rules may return bare scalars for convenience; `apply` normalises
/// them into 0-d arrays before they are wrapped in a `Variable`. Constructing
/// a `Variable` directly from a bare scalar is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Array(NdArray),
    Scalar(f64),
}

impl Data {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Data::Scalar(_))
    }

    /// Human readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Array(_) => "NdArray",
            Data::Scalar(_) => "f64 scalar",
        }
    }

    /// Converts a bare scalar into a 0-d array; arrays pass through.
    pub fn into_array(self) -> NdArray {
        match self {
            Data::Array(array) => array,
            Data::Scalar(value) => NdArray::scalar(value),
        }
    }
}

impl From<NdArray> for Data {
    fn from(array: NdArray) -> Self {
        Data::Array(array)
    }
}

impl From<f64> for Data {
    fn from(value: f64) -> Self {
        Data::Scalar(value)
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod tests;
