//! # Differentiable operations (`ops`)
//!
//! Concrete [`Operation`] implementations and the [`apply`] routine that
//! wires an operation into the computation graph.
//!
//! ## Structure:
//!
//! - **Operation structs** (`Square`, `Exp`, `Neg`, `Add`, `Mul`): stateless
//!   units implementing `forward` and `backward` on raw `NdArray`s.
//! - **`_op` functions** (`square_op`, `exp_op`, `neg_op`, `add_op`, `mul_op`):
//!   apply a fresh instance of the operation and return the single output
//!   variable.
//! - **[`apply`]**: the generic application protocol shared by all of them.
//!
//! ## Submodules:
//!
//! - [`arithmetic`]: element-wise arithmetic (add, mul, neg).
//! - [`math_elem`]: element-wise math functions (square, exp).

use log::trace;

use crate::autograd::{GradFn, Operation};
use crate::error::GradFlowError;
use crate::variable::Variable;

pub mod arithmetic;
pub mod math_elem;

pub use arithmetic::{add_op, mul_op, neg_op, Add, Mul, Neg};
pub use math_elem::{exp_op, square_op, Exp, Square};

/// The variables produced by one application of an operation.
///
/// Single-output operations yield `One`; callers that do not care about
/// multiplicity can use `len`, `iter` or `into_vec` on either form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outputs {
    One(Variable),
    Many(Vec<Variable>),
}

impl Outputs {
    fn from_vec(mut outputs: Vec<Variable>) -> Self {
        if outputs.len() == 1 {
            Outputs::One(outputs.remove(0))
        } else {
            Outputs::Many(outputs)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Outputs::One(_) => 1,
            Outputs::Many(outputs) => outputs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        match self {
            Outputs::One(output) => std::slice::from_ref(output).iter(),
            Outputs::Many(outputs) => outputs.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<Variable> {
        match self {
            Outputs::One(output) => vec![output],
            Outputs::Many(outputs) => outputs,
        }
    }

    /// Returns the single output.
    ///
    /// # Errors
    /// `ArityMismatch` when the operation produced several outputs.
    pub fn into_one(self) -> Result<Variable, GradFlowError> {
        match self {
            Outputs::One(output) => Ok(output),
            Outputs::Many(outputs) => Err(GradFlowError::ArityMismatch {
                operation: "Outputs::into_one".to_string(),
                expected: 1,
                actual: outputs.len(),
            }),
        }
    }
}

/// Applies `op` to `inputs` and records the application in the graph.
///
/// Reads the data of every input, runs `op.forward`, wraps each result in a
/// new `Variable` (bare scalars become 0-d arrays) and stamps each new
/// variable's creator with a fresh [`GradFn`] that retains the inputs.
///
/// Nothing is linked into the graph until the forward pass has succeeded, so
/// a failed application leaves every existing variable untouched.
///
/// # Errors
/// * `ArityMismatch` if `inputs.len()` differs from `op.arity()`, or if the
///   forward pass produced no output.
/// * `MissingData` if an input holds no data.
/// * Any error returned by `op.forward`.
pub fn apply<O>(op: O, inputs: &[&Variable]) -> Result<Outputs, GradFlowError>
where
    O: Operation + 'static,
{
    apply_boxed(Box::new(op), inputs)
}

/// Same as [`apply`] for an already boxed operation.
pub fn apply_boxed(op: Box<dyn Operation>, inputs: &[&Variable]) -> Result<Outputs, GradFlowError> {
    if inputs.len() != op.arity() {
        return Err(GradFlowError::ArityMismatch {
            operation: op.name().to_string(),
            expected: op.arity(),
            actual: inputs.len(),
        });
    }

    let xs = inputs
        .iter()
        .map(|input| {
            input.data().ok_or_else(|| GradFlowError::MissingData {
                operation: op.name().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let ys = op.forward(&xs)?;
    if ys.is_empty() {
        return Err(GradFlowError::ArityMismatch {
            operation: op.name().to_string(),
            expected: 1,
            actual: 0,
        });
    }

    let outputs: Vec<Variable> = ys
        .into_iter()
        .map(|y| Variable::from_parts(Some(y.into_array()), 0))
        .collect();

    let name = op.name();
    let grad_fn = GradFn::new(op, inputs.iter().map(|&v| v.clone()).collect(), &outputs)?;
    for output in &outputs {
        output.set_grad_fn(grad_fn.clone())?;
    }
    trace!(
        "apply: '{}' recorded with {} input(s), {} output(s), generation {}",
        name,
        inputs.len(),
        outputs.len(),
        grad_fn.generation()
    );

    Ok(Outputs::from_vec(outputs))
}

/// Error for a forward/backward rule called with the wrong number of arrays.
pub(crate) fn arity_error(op: &dyn Operation, actual: usize) -> GradFlowError {
    GradFlowError::ArityMismatch {
        operation: op.name().to_string(),
        expected: op.arity(),
        actual,
    }
}

/// Error for a single-output backward rule given the wrong number of
/// output gradients.
pub(crate) fn grad_arity_error(op: &dyn Operation, actual: usize) -> GradFlowError {
    GradFlowError::ArityMismatch {
        operation: op.name().to_string(),
        expected: 1,
        actual,
    }
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod tests;
