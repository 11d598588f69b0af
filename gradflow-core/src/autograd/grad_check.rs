use crate::error::GradFlowError;
use crate::variable::Variable;
use approx::relative_eq;
use log::debug;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(GradFlowError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(GradFlowError),
    #[error("Input {input_index} has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Input {input_index} holds no data.")]
    MissingInputData { input_index: usize },
    #[error("Gradient check input must be a leaf variable (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Array error during intermediate calculation: {0}")]
    ArrayError(GradFlowError),
}

impl From<GradFlowError> for GradCheckError {
    fn from(err: GradFlowError) -> Self {
        GradCheckError::ArrayError(err)
    }
}

/// Sum of every element of the output of `func`, evaluated on fresh leaves.
fn evaluate_loss<F>(func: &F, inputs: &[Variable]) -> Result<f64, GradCheckError>
where
    F: Fn(&[Variable]) -> Result<Variable, GradFlowError>,
{
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let data = output.data().ok_or(GradCheckError::ArrayError(GradFlowError::MissingData {
        operation: "check_grad".to_string(),
    }))?;
    Ok(data.to_f64_vec().iter().sum())
}

/// Checks analytical gradients against central finite differences.
///
/// The scalar being differentiated is the sum of all elements of
/// `func(inputs)`, which is exactly what `backward` computes when it seeds
/// the output with ones. For every element of every input the numerical
/// gradient \( (L(x+\epsilon) - L(x-\epsilon)) / 2\epsilon \) is compared with
/// the analytical gradient, using `tolerance` both as absolute and relative
/// bound.
///
/// `inputs` must be leaf variables holding data. Their gradients are cleared
/// first and hold the analytical gradients afterwards.
pub fn check_grad<F>(
    func: F,
    inputs: &[Variable],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Variable]) -> Result<Variable, GradFlowError>,
{
    let mut original_data = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        let data = input
            .data()
            .ok_or(GradCheckError::MissingInputData { input_index: i })?;
        original_data.push(data);
        input.clear_grad();
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    output.backward().map_err(GradCheckError::BackwardPassError)?;

    for (i, input) in inputs.iter().enumerate() {
        let analytical = input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .to_f64_vec();
        let base = original_data[i].to_f64_vec();

        for elem_idx in 0..base.len() {
            let mut losses = [0.0f64; 2];
            for (slot, delta) in [epsilon, -epsilon].into_iter().enumerate() {
                let mut perturbed = base.clone();
                perturbed[elem_idx] += delta;
                let perturbed_inputs: Vec<Variable> = original_data
                    .iter()
                    .enumerate()
                    .map(|(j, data)| {
                        if j == i {
                            data.from_f64_like(perturbed.clone()).map(Variable::from_array)
                        } else {
                            Ok(Variable::from_array(data.clone()))
                        }
                    })
                    .collect::<Result<_, _>>()?;
                losses[slot] = evaluate_loss(&func, &perturbed_inputs)?;
            }
            let [loss_plus, loss_minus] = losses;
            let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_grad = analytical[elem_idx];
            debug!(
                "check_grad: input {} elem {}: analytical {} numerical {}",
                i, elem_idx, analytical_grad, numerical
            );
            if !relative_eq!(
                analytical_grad,
                numerical,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad: numerical,
                    difference: (analytical_grad - numerical).abs(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
