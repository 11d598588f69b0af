//! # Reverse-mode autodiff machinery (`autograd`)
//!
//! - [`Operation`]: the plugin trait every differentiable primitive implements.
//! - [`GradFn`]: the graph node recorded each time an operation is applied.
//! - [`graph`]: traversal orders and the worklist driving `Variable::backward`.
//! - [`grad_check`]: finite-difference verification of backward rules.

pub mod grad_check;
pub mod grad_fn;
pub mod graph;
pub mod operation;

pub use grad_fn::GradFn;
pub use graph::{BackwardOptions, TraversalOrder};
pub use operation::Operation;
