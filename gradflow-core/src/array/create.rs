// src/array/create.rs

use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::array::NdArray;
use crate::buffer::Buffer;
use crate::error::GradFlowError;
use crate::types::DType;

fn filled(shape: &[usize], dtype: DType, value: f64) -> NdArray {
    let numel: usize = shape.iter().product();
    let buffer = match dtype {
        DType::F32 => Buffer::F32(Arc::new(vec![value as f32; numel])),
        DType::F64 => Buffer::F64(Arc::new(vec![value; numel])),
    };
    NdArray::from_buffer(buffer, shape.to_vec())
}

/// Creates an array of the given shape and dtype filled with zeros.
pub fn zeros(shape: &[usize], dtype: DType) -> NdArray {
    filled(shape, dtype, 0.0)
}

/// Creates an array of the given shape and dtype filled with ones.
pub fn ones(shape: &[usize], dtype: DType) -> NdArray {
    filled(shape, dtype, 1.0)
}

/// Creates an array of the given shape and dtype filled with `value`.
pub fn full(shape: &[usize], dtype: DType, value: f64) -> NdArray {
    filled(shape, dtype, value)
}

/// Zeros with the same shape and dtype as `array`.
pub fn zeros_like(array: &NdArray) -> NdArray {
    zeros(array.shape(), array.dtype())
}

/// Ones with the same shape and dtype as `array`. This is the seed gradient
/// of a backward pass.
pub fn ones_like(array: &NdArray) -> NdArray {
    ones(array.shape(), array.dtype())
}

/// Uniform samples in `[0, 1)` drawn from `rng`.
pub fn rand<R: Rng>(shape: &[usize], dtype: DType, rng: &mut R) -> NdArray {
    let numel: usize = shape.iter().product();
    let buffer = match dtype {
        DType::F32 => Buffer::F32(Arc::new((0..numel).map(|_| rng.gen::<f32>()).collect())),
        DType::F64 => Buffer::F64(Arc::new((0..numel).map(|_| rng.gen::<f64>()).collect())),
    };
    NdArray::from_buffer(buffer, shape.to_vec())
}

/// Standard normal samples drawn from `rng`.
pub fn randn<R: Rng>(shape: &[usize], dtype: DType, rng: &mut R) -> NdArray {
    let numel: usize = shape.iter().product();
    let buffer = match dtype {
        DType::F32 => {
            let data: Vec<f32> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
            Buffer::F32(Arc::new(data))
        }
        DType::F64 => {
            let data: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
            Buffer::F64(Arc::new(data))
        }
    };
    NdArray::from_buffer(buffer, shape.to_vec())
}

impl NdArray {
    /// Creates an array with the same shape and dtype as `self` from f64
    /// values, narrowing to f32 when needed.
    pub fn from_f64_like(&self, values: Vec<f64>) -> Result<NdArray, GradFlowError> {
        match self.dtype() {
            DType::F32 => NdArray::new(
                values.into_iter().map(|x| x as f32).collect(),
                self.shape.clone(),
            ),
            DType::F64 => NdArray::new_f64(values, self.shape.clone()),
        }
    }
}
