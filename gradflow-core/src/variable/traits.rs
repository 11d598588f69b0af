// src/variable/traits.rs

use crate::variable::Variable;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

impl Clone for Variable {
    /// Shallow clone: both handles point to the same graph node.
    fn clone(&self) -> Self {
        Variable {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Variable {
    /// Node identity. Two variables holding equal values are still different nodes.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.data).hash(state);
    }
}

impl Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.read() {
            Ok(guard) => {
                write!(f, "Variable(")?;
                if let Some(name) = &guard.name {
                    write!(f, "name={:?}, ", name)?;
                }
                match &guard.data {
                    Some(data) => write!(f, "shape={:?}, dtype={:?}", data.shape(), data.dtype())?,
                    None => write!(f, "data=None")?,
                }
                write!(
                    f,
                    ", generation={}, has_grad={}, grad_fn={})",
                    guard.generation,
                    guard.grad.is_some(),
                    guard.grad_fn.as_ref().map_or("None", |g| g.name())
                )
            }
            Err(_) => write!(f, "Variable(Error: RwLock poisoned)"),
        }
    }
}
