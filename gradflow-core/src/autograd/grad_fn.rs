use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use log::debug;

use crate::array::{zeros, NdArray};
use crate::autograd::Operation;
use crate::error::GradFlowError;
use crate::types::DType;
use crate::variable::{Variable, VariableData};

/// Stable identity of a graph node, used to deduplicate the worklist.
pub type NodeId = *const GradFnNode;

/// One output of a node, with the metadata needed to build a zero gradient
/// after the output itself is gone.
struct OutputSlot {
    /// Weak: outputs own their creator, not the other way round.
    variable: Weak<RwLock<VariableData>>,
    shape: Vec<usize>,
    dtype: DType,
}

/// Internal state of one application of an `Operation`.
pub struct GradFnNode {
    op: Box<dyn Operation>,
    /// Strong references: keep the whole upstream graph alive.
    inputs: Vec<Variable>,
    outputs: Vec<OutputSlot>,
    generation: usize,
}

/// The graph node recorded for one application of an [`Operation`].
///
/// Stored in the `grad_fn` field of every output `Variable` (the "creator").
/// Cloning a `GradFn` shares the node; equality is node identity.
#[derive(Clone)]
pub struct GradFn {
    node: Arc<GradFnNode>,
}

impl GradFn {
    /// Records a new node. Only `ops::apply` builds these, after the forward
    /// pass has succeeded.
    ///
    /// # Errors
    /// `MissingData` if an output holds no data.
    pub(crate) fn new(
        op: Box<dyn Operation>,
        inputs: Vec<Variable>,
        outputs: &[Variable],
    ) -> Result<Self, GradFlowError> {
        let generation = inputs.iter().map(Variable::generation).max().unwrap_or(0);
        let outputs = outputs
            .iter()
            .map(|output| {
                let guard = output.read_data();
                let data = guard.data.as_ref().ok_or_else(|| GradFlowError::MissingData {
                    operation: op.name().to_string(),
                })?;
                Ok(OutputSlot {
                    variable: output.downgrade(),
                    shape: data.shape().to_vec(),
                    dtype: data.dtype(),
                })
            })
            .collect::<Result<Vec<_>, GradFlowError>>()?;
        Ok(GradFn {
            node: Arc::new(GradFnNode {
                op,
                inputs,
                outputs,
                generation,
            }),
        })
    }

    pub fn name(&self) -> &'static str {
        self.node.op.name()
    }

    /// The operation this node applied.
    pub fn operation(&self) -> &dyn Operation {
        self.node.op.as_ref()
    }

    /// The input variables, in the order they were passed to `apply`.
    pub fn inputs(&self) -> &[Variable] {
        &self.node.inputs
    }

    /// The output variables still alive, `None` for outputs already dropped.
    pub fn outputs(&self) -> Vec<Option<Variable>> {
        self.node
            .outputs
            .iter()
            .map(|slot| Variable::upgrade(&slot.variable))
            .collect()
    }

    pub fn num_outputs(&self) -> usize {
        self.node.outputs.len()
    }

    /// Highest generation among the inputs.
    pub fn generation(&self) -> usize {
        self.node.generation
    }

    pub fn id(&self) -> NodeId {
        Arc::as_ptr(&self.node)
    }

    /// Collects the retained forward input data.
    pub(crate) fn input_data(&self) -> Result<Vec<NdArray>, GradFlowError> {
        self.node
            .inputs
            .iter()
            .map(|input| {
                input.data().ok_or_else(|| GradFlowError::MissingData {
                    operation: self.name().to_string(),
                })
            })
            .collect()
    }

    /// Collects the current gradient of every output, in output order.
    ///
    /// An output that received no gradient, or that was dropped because the
    /// caller only kept its siblings, contributes zeros of its recorded shape.
    pub(crate) fn output_grads(&self) -> Vec<NdArray> {
        self.node
            .outputs
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let grad = Variable::upgrade(&slot.variable).and_then(|output| output.grad());
                grad.unwrap_or_else(|| {
                    debug!("{}: output {} has no gradient, using zeros", self.name(), idx);
                    zeros(&slot.shape, slot.dtype)
                })
            })
            .collect()
    }
}

impl PartialEq for GradFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for GradFn {}

impl fmt::Debug for GradFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GradFn(op={:?}, inputs={}, outputs={}, generation={})",
            self.node.op,
            self.node.inputs.len(),
            self.node.outputs.len(),
            self.node.generation
        )
    }
}
