// gradflow-core/src/ops/arithmetic/mul.rs

use crate::array::{Data, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::ops::{apply, arity_error, grad_arity_error};
use crate::variable::Variable;

/// Element-wise product of two arrays of the same shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mul;

impl Operation for Mul {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let [a, b] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        Ok(vec![Data::Array(a.mul(b)?)])
    }

    /// For \( z = a \cdot b \): \( \frac{dL}{da} = b \cdot \frac{dL}{dz} \) and
    /// \( \frac{dL}{db} = a \cdot \frac{dL}{dz} \).
    fn backward(&self, xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let [a, b] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        let [gy] = gys else {
            return Err(grad_arity_error(self, gys.len()));
        };
        Ok(vec![b.mul(gy)?, a.mul(gy)?])
    }
}

/// Multiplies `a` and `b` element-wise. Supports automatic differentiation.
pub fn mul_op(a: &Variable, b: &Variable) -> Result<Variable, GradFlowError> {
    apply(Mul, &[a, b])?.into_one()
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
