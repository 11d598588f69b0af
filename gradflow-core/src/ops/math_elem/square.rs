// gradflow-core/src/ops/math_elem/square.rs

use crate::array::{Data, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::ops::{apply, arity_error, grad_arity_error};
use crate::variable::Variable;

/// Element-wise square, \( y = x^2 \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Operation for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let [x] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        Ok(vec![Data::Array(x.powi(2))])
    }

    /// \( \frac{dL}{dx} = 2x \cdot \frac{dL}{dy} \)
    fn backward(&self, xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let [x] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        let [gy] = gys else {
            return Err(grad_arity_error(self, gys.len()));
        };
        Ok(vec![x.mul(gy)?.mul_scalar(2.0)])
    }
}

/// Squares every element of `x`. Supports automatic differentiation.
pub fn square_op(x: &Variable) -> Result<Variable, GradFlowError> {
    apply(Square, &[x])?.into_one()
}

#[cfg(test)]
#[path = "square_test.rs"]
mod tests;
