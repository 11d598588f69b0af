use std::fmt::Debug;
use std::sync::Arc;

use crate::error::GradFlowError;
use crate::types::DType;

/// Typed, contiguous CPU storage backing an `NdArray`.
///
/// The vectors are wrapped in `Arc` so that cloning an array (which happens
/// every time a gradient is handed around) never copies element data.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Arc<Vec<f32>>),
    /// Buffer holding f64 data.
    F64(Arc<Vec<f64>>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(data) => data.len(),
            Buffer::F64(data) => data.len(),
        }
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>`.
    ///
    /// Returns an error if the buffer is not of type F32.
    pub fn try_get_f32(&self) -> Result<&Arc<Vec<f32>>, GradFlowError> {
        match self {
            Buffer::F32(data_arc) => Ok(data_arc),
            other => Err(GradFlowError::DataTypeMismatch {
                expected: DType::F32,
                actual: other.dtype(),
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f64>>`.
    ///
    /// Returns an error if the buffer is not of type F64.
    pub fn try_get_f64(&self) -> Result<&Arc<Vec<f64>>, GradFlowError> {
        match self {
            Buffer::F64(data_arc) => Ok(data_arc),
            other => Err(GradFlowError::DataTypeMismatch {
                expected: DType::F64,
                actual: other.dtype(),
                operation: "try_get_f64".to_string(),
            }),
        }
    }
}
