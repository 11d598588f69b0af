use log::{debug, trace};

use crate::array::{ones_like, NdArray};
use crate::autograd::graph::{BackwardOptions, Worklist};
use crate::autograd::GradFn;
use crate::error::GradFlowError;
use crate::variable::Variable;

impl Variable {
    /// Returns a clone of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<NdArray> {
        self.read_data().grad.clone()
    }

    /// Returns the graph node of the operation that produced this variable.
    pub fn grad_fn(&self) -> Option<GradFn> {
        self.read_data().grad_fn.clone()
    }

    /// Records the operation that produced this variable.
    ///
    /// # Errors
    /// `InvariantViolation` if a creator was already recorded; the variable is
    /// left unchanged.
    pub(crate) fn set_grad_fn(&self, grad_fn: GradFn) -> Result<(), GradFlowError> {
        let mut guard = self.write_data();
        if let Some(existing) = &guard.grad_fn {
            return Err(GradFlowError::InvariantViolation(format!(
                "variable already has creator '{}', refusing to replace it with '{}'",
                existing.name(),
                grad_fn.name()
            )));
        }
        guard.generation = grad_fn.generation() + 1;
        guard.grad_fn = Some(grad_fn);
        Ok(())
    }

    /// Resets the gradient so the variable can take part in a fresh pass.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Adds `grad_to_add` onto the accumulated gradient, or stores it if
    /// there is none yet.
    pub(crate) fn accumulate_grad(&self, grad_to_add: NdArray) -> Result<(), GradFlowError> {
        let mut guard = self.write_data();
        let new_grad = match guard.grad.as_ref() {
            Some(existing) => existing.add(&grad_to_add)?,
            None => grad_to_add,
        };
        guard.grad = Some(new_grad);
        Ok(())
    }

    /// Back-propagates from this variable with the default options.
    ///
    /// See [`Variable::backward_with`].
    pub fn backward(&self) -> Result<(), GradFlowError> {
        self.backward_with(BackwardOptions::default())
    }

    /// Back-propagates from this variable to every ancestor.
    ///
    /// If this variable has no gradient yet, it is seeded with ones of the
    /// same shape and dtype as its data. Then every reachable graph node is
    /// processed: the gradients of its outputs are passed to the operation's
    /// backward rule and the resulting input gradients are accumulated onto
    /// the inputs. The processing order is chosen by `options.order`.
    ///
    /// Gradients accumulate across calls; use [`Variable::clear_grad`] on the
    /// leaves between independent passes.
    ///
    /// # Errors
    /// * `MissingData` if the variable holds no data and has no gradient.
    /// * `ArityMismatch` if a backward rule returns the wrong number of
    ///   gradients.
    /// * Any error raised by a backward rule or by gradient accumulation.
    ///   Gradients accumulated before the error are kept.
    pub fn backward_with(&self, options: BackwardOptions) -> Result<(), GradFlowError> {
        {
            let mut guard = self.write_data();
            if guard.grad.is_none() {
                let seed = match guard.data.as_ref() {
                    Some(data) => ones_like(data),
                    None => {
                        return Err(GradFlowError::MissingData {
                            operation: "backward".to_string(),
                        })
                    }
                };
                guard.grad = Some(seed);
            }
        }

        let root = match self.grad_fn() {
            Some(grad_fn) => grad_fn,
            None => {
                debug!("backward called on a leaf variable, nothing to propagate");
                return Ok(());
            }
        };

        debug!(
            "backward: start from '{}' (generation {}), order {:?}",
            root.name(),
            self.generation(),
            options.order
        );

        let mut worklist = Worklist::new(options.order);
        worklist.push(root);
        let mut processed = 0usize;

        while let Some(grad_fn) = worklist.pop() {
            processed += 1;
            trace!(
                "backward: processing '{}' (generation {})",
                grad_fn.name(),
                grad_fn.generation()
            );

            let gys = grad_fn.output_grads();
            let xs = grad_fn.input_data()?;
            let gxs = grad_fn.operation().backward(&xs, &gys)?;

            let inputs = grad_fn.inputs();
            if gxs.len() != inputs.len() {
                return Err(GradFlowError::ArityMismatch {
                    operation: grad_fn.name().to_string(),
                    expected: inputs.len(),
                    actual: gxs.len(),
                });
            }

            for (idx, (input, gx)) in inputs.iter().zip(gxs).enumerate() {
                trace!("backward: '{}' accumulating into input {}", grad_fn.name(), idx);
                input.accumulate_grad(gx)?;
                if let Some(creator) = input.grad_fn() {
                    worklist.push(creator);
                }
            }
        }

        debug!("backward: done, {} graph nodes processed", processed);
        Ok(())
    }
}
