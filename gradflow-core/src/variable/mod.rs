// src/variable/mod.rs

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::array::{Data, NdArray};
use crate::autograd::GradFn;
use crate::error::GradFlowError;
use crate::types::DType;

mod autograd_methods;
mod traits;

/// Internal state of a [`Variable`].
///
/// Wrapped in `Arc<RwLock<VariableData>>` by `Variable` so the same node can be
/// shared by every operation that reads it while its gradient stays mutable.
#[derive(Debug)]
pub struct VariableData {
    /// The value. `None` is the "no data" sentinel of an unpopulated node.
    pub(crate) data: Option<NdArray>,
    /// Accumulated gradient, populated by `backward`.
    pub(crate) grad: Option<NdArray>,
    /// The graph node of the operation that produced this variable.
    /// Leaves have `grad_fn = None`. Assigned at most once.
    pub(crate) grad_fn: Option<GradFn>,
    /// Distance from the leaves: 0 for leaves, creator generation + 1 otherwise.
    pub(crate) generation: usize,
    pub(crate) name: Option<String>,
}

/// A value node of the computation graph.
///
/// `Variable` is a handle: clones share the same node, and equality is node
/// identity, never value equality.
pub struct Variable {
    pub(crate) data: Arc<RwLock<VariableData>>,
}

impl Variable {
    /// Wraps a payload in a new leaf variable.
    ///
    /// Accepts arrays and the "no data" sentinel (`None`).
    ///
    /// # Errors
    /// `TypeMismatch` for bare scalars: only `apply` converts scalars into
    /// 0-d arrays.
    pub fn new(data: Option<Data>) -> Result<Self, GradFlowError> {
        let array = match data {
            None => None,
            Some(Data::Array(array)) => Some(array),
            Some(other) => {
                return Err(GradFlowError::TypeMismatch {
                    expected: "NdArray".to_string(),
                    actual: other.type_name().to_string(),
                })
            }
        };
        Ok(Self::from_parts(array, 0))
    }

    /// Wraps an array in a new leaf variable.
    pub fn from_array(array: NdArray) -> Self {
        Self::from_parts(Some(array), 0)
    }

    /// Creates a leaf variable holding no data.
    pub fn empty() -> Self {
        Self::from_parts(None, 0)
    }

    pub(crate) fn from_parts(data: Option<NdArray>, generation: usize) -> Self {
        Variable {
            data: Arc::new(RwLock::new(VariableData {
                data,
                grad: None,
                grad_fn: None,
                generation,
                name: None,
            })),
        }
    }

    /// Acquires a read lock on the variable's state.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> RwLockReadGuard<'_, VariableData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the variable's state.
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, VariableData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Returns a (cheap) clone of the value, if any.
    pub fn data(&self) -> Option<NdArray> {
        self.read_data().data.clone()
    }

    pub fn has_data(&self) -> bool {
        self.read_data().data.is_some()
    }

    /// Shape of the value, `None` when the variable holds no data.
    pub fn shape(&self) -> Option<Vec<usize>> {
        self.read_data().data.as_ref().map(|d| d.shape().to_vec())
    }

    pub fn dtype(&self) -> Option<DType> {
        self.read_data().data.as_ref().map(NdArray::dtype)
    }

    pub fn generation(&self) -> usize {
        self.read_data().generation
    }

    /// True when no operation produced this variable.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    pub fn name(&self) -> Option<String> {
        self.read_data().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.write_data().name = Some(name.into());
    }

    pub(crate) fn downgrade(&self) -> Weak<RwLock<VariableData>> {
        Arc::downgrade(&self.data)
    }

    pub(crate) fn upgrade(weak: &Weak<RwLock<VariableData>>) -> Option<Variable> {
        weak.upgrade().map(|data| Variable { data })
    }
}

#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;
