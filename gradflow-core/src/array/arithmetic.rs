// gradflow-core/src/array/arithmetic.rs

use std::sync::Arc;

use num_traits::Float;

use crate::array::NdArray;
use crate::buffer::Buffer;
use crate::error::GradFlowError;

// --- Generic element kernels ---

fn add_elem<T: Float>(a: T, b: T) -> T {
    a + b
}

fn mul_elem<T: Float>(a: T, b: T) -> T {
    a * b
}

fn exp_elem<T: Float>(x: T) -> T {
    x.exp()
}

fn neg_elem<T: Float>(x: T) -> T {
    -x
}

/// Converts an f64 factor into the element type. Not representable becomes NaN.
fn cast_factor<T: Float>(factor: f64) -> T {
    T::from(factor).unwrap_or_else(T::nan)
}

impl NdArray {
    /// Applies a unary element-wise function, dispatching on dtype.
    fn map_unary<F32Op, F64Op>(&self, op_f32: F32Op, op_f64: F64Op) -> NdArray
    where
        F32Op: Fn(f32) -> f32,
        F64Op: Fn(f64) -> f64,
    {
        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(data.iter().map(|&x| op_f32(x)).collect())),
            Buffer::F64(data) => Buffer::F64(Arc::new(data.iter().map(|&x| op_f64(x)).collect())),
        };
        NdArray::from_buffer(buffer, self.shape.clone())
    }

    /// Applies a binary element-wise function to two arrays of identical
    /// shape and dtype.
    fn zip_binary<F32Op, F64Op>(
        &self,
        other: &NdArray,
        op_f32: F32Op,
        op_f64: F64Op,
        op_name: &str,
    ) -> Result<NdArray, GradFlowError>
    where
        F32Op: Fn(f32, f32) -> f32,
        F64Op: Fn(f64, f64) -> f64,
    {
        if self.shape != other.shape {
            return Err(GradFlowError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
                operation: op_name.to_string(),
            });
        }
        let buffer = match (&self.buffer, &other.buffer) {
            (Buffer::F32(a), Buffer::F32(b)) => Buffer::F32(Arc::new(
                a.iter().zip(b.iter()).map(|(&x, &y)| op_f32(x, y)).collect(),
            )),
            (Buffer::F64(a), Buffer::F64(b)) => Buffer::F64(Arc::new(
                a.iter().zip(b.iter()).map(|(&x, &y)| op_f64(x, y)).collect(),
            )),
            (a, b) => {
                return Err(GradFlowError::DataTypeMismatch {
                    expected: a.dtype(),
                    actual: b.dtype(),
                    operation: op_name.to_string(),
                })
            }
        };
        Ok(NdArray::from_buffer(buffer, self.shape.clone()))
    }

    /// Element-wise addition. Shapes and dtypes must match exactly.
    pub fn add(&self, other: &NdArray) -> Result<NdArray, GradFlowError> {
        self.zip_binary(other, add_elem::<f32>, add_elem::<f64>, "add")
    }

    /// Element-wise multiplication. Shapes and dtypes must match exactly.
    pub fn mul(&self, other: &NdArray) -> Result<NdArray, GradFlowError> {
        self.zip_binary(other, mul_elem::<f32>, mul_elem::<f64>, "mul")
    }

    /// Multiplies every element by `factor`, keeping the dtype.
    pub fn mul_scalar(&self, factor: f64) -> NdArray {
        let f32_factor: f32 = cast_factor(factor);
        self.map_unary(move |x| x * f32_factor, move |x| x * factor)
    }

    /// Element-wise natural exponential.
    pub fn exp(&self) -> NdArray {
        self.map_unary(exp_elem::<f32>, exp_elem::<f64>)
    }

    /// Element-wise integer power.
    pub fn powi(&self, exponent: i32) -> NdArray {
        self.map_unary(move |x| x.powi(exponent), move |x| x.powi(exponent))
    }

    /// Element-wise negation.
    pub fn neg(&self) -> NdArray {
        self.map_unary(neg_elem::<f32>, neg_elem::<f64>)
    }
}
