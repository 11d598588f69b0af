/// Defines the possible data types for array elements.
///
/// Only floating point types are differentiable, so the backend carries
/// exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}
