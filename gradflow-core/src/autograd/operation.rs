use crate::array::{Data, NdArray};
use crate::error::GradFlowError;
use std::fmt::Debug;

/// Defines the interface of a differentiable primitive.
///
/// Every operation that can appear in a computation graph (square, exp, add,
/// ...) is a struct implementing this trait. Applying it through
/// [`apply`](crate::ops::apply) runs `forward` on the raw input data and
/// records a [`GradFn`](crate::autograd::GradFn) node owning the operation,
/// so that `backward` can be replayed later during `Variable::backward`.
///
/// New primitives are added by implementing this trait; the traversal engine
/// never needs to change.
///
/// The trait requires `Debug + Send + Sync` because the boxed operation lives
/// inside a shared graph node that is reachable from every output `Variable`.
pub trait Operation: Debug + Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Number of inputs the operation expects.
    fn arity(&self) -> usize;

    /// Computes the output data from the input data.
    ///
    /// Pure: must not touch the graph. May return bare scalars
    /// (`Data::Scalar`); they are normalised into 0-d arrays by `apply`.
    ///
    /// The default implementation reports `NotImplemented`.
    fn forward(&self, xs: &[NdArray]) -> Result<Vec<Data>, GradFlowError> {
        let _ = xs;
        Err(GradFlowError::NotImplemented {
            operation: self.name().to_string(),
            method: "forward",
        })
    }

    /// Computes the gradient of each input from the gradient of each output
    /// (a vector-Jacobian product).
    ///
    /// # Arguments
    /// * `xs`: the input data retained from the forward pass, in input order.
    /// * `gys`: the gradient flowing into each output, in output order.
    ///
    /// # Returns
    /// One gradient per input, in the same order as `xs`. Returning a
    /// different count is reported as `ArityMismatch` by the traversal.
    ///
    /// The default implementation reports `NotImplemented`.
    fn backward(&self, xs: &[NdArray], gys: &[NdArray]) -> Result<Vec<NdArray>, GradFlowError> {
        let _ = (xs, gys);
        Err(GradFlowError::NotImplemented {
            operation: self.name().to_string(),
            method: "backward",
        })
    }
}
