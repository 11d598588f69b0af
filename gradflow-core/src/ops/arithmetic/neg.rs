// gradflow-core/src/ops/arithmetic/neg.rs

use crate::array::{Data, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::ops::{apply, arity_error, grad_arity_error};
use crate::variable::Variable;

/// Element-wise negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neg;

impl Operation for Neg {
    fn name(&self) -> &'static str {
        "neg"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let [x] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        Ok(vec![Data::Array(x.neg())])
    }

    fn backward(&self, _xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let [gy] = gys else {
            return Err(grad_arity_error(self, gys.len()));
        };
        Ok(vec![gy.neg()])
    }
}

/// Negates `x` element-wise. Supports automatic differentiation.
pub fn neg_op(x: &Variable) -> Result<Variable, GradFlowError> {
    apply(Neg, &[x])?.into_one()
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
