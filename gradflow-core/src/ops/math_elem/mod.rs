// Element-wise math functions
pub mod exp;
pub mod square;

// Re-export the public functions and operation structs
pub use exp::{exp_op, Exp};
pub use square::{square_op, Square};
