// gradflow-core/src/ops/math_elem/exp.rs

use crate::array::{Data, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::ops::{apply, arity_error, grad_arity_error};
use crate::variable::Variable;

/// Element-wise natural exponential, \( y = e^x \).
///
/// The backward rule recomputes \( e^x \) from the retained input rather than
/// keeping the output alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl Operation for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn arity(&self) -> usize {
        1
    }

    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let [x] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        Ok(vec![Data::Array(x.exp())])
    }

    fn backward(&self, xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let [x] = xs else {
            return Err(arity_error(self, xs.len()));
        };
        let [gy] = gys else {
            return Err(grad_arity_error(self, gys.len()));
        };
        Ok(vec![x.exp().mul(gy)?])
    }
}

/// Computes \( e^x \) element-wise. Supports automatic differentiation.
pub fn exp_op(x: &Variable) -> Result<Variable, GradFlowError> {
    apply(Exp, &[x])?.into_one()
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
