// gradflow-core/src/ops/arithmetic/add.rs

use crate::array::{Data, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::ops::{apply, arity_error, grad_arity_error};
use crate::variable::Variable;

/// Element-wise addition of two arrays of the same shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl Operation for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn arity(&self) -> usize {
        2
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let [a, b] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        Ok(vec![Data::Array(a.add(b)?)])
    }

    /// The upstream gradient flows unchanged to both operands.
    fn backward(&self, _xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let [gy] = gys else {
            return Err(grad_arity_error(self, gys.len()));
        };
        Ok(vec![gy.clone(), gy.clone()])
    }
}

/// Adds `a` and `b` element-wise. Supports automatic differentiation.
///
/// Passing the same variable twice is allowed; its gradient then receives
/// both contributions.
pub fn add_op(a: &Variable, b: &Variable) -> Result<Variable, GradFlowError> {
    apply(Add, &[a, b])?.into_one()
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
