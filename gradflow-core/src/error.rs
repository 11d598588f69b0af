use crate::types::DType;
use thiserror::Error;

/// Custom error type for the gradflow autodiff core.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradFlowError {
    /// A `Variable` was constructed from a payload that is not an array.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Wrong number of inputs for an operation, or wrong number of gradients
    /// returned by its backward rule.
    #[error("Arity mismatch in operation '{operation}': expected {expected}, got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// The default `forward`/`backward` of an `Operation` was invoked.
    #[error("Operation '{operation}' does not implement {method}")]
    NotImplemented {
        operation: String,
        method: &'static str,
    },

    #[error("Graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Variable holds no data (needed by '{operation}')")]
    MissingData { operation: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Data type mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Array creation error: data length {data_len} does not match shape {shape:?}")]
    ArrayCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Internal error: {0}")]
    InternalError(String),
}
