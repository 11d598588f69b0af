// Export foundational arithmetic operations directly
pub mod add;
pub mod mul;
pub mod neg;

// Re-export the primary operation functions
pub use add::{add_op, Add};
pub use mul::{mul_op, Mul};
pub use neg::{neg_op, Neg};
