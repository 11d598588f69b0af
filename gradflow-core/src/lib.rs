//! gradflow-core: a define-by-run reverse-mode automatic differentiation core.
//!
//! Applying an [`Operation`](autograd::Operation) to [`Variable`]s records the
//! computation graph as it executes. Calling [`Variable::backward`] on a result
//! walks that graph back to the leaves and accumulates gradients.
//!
//! ```
//! use gradflow_core::{ops, NdArray, Variable};
//!
//! let x = Variable::from_array(NdArray::scalar(3.0));
//! let y = ops::add_op(&x, &x).unwrap();
//! y.backward().unwrap();
//! assert_eq!(x.grad().unwrap().item().unwrap(), 2.0);
//! ```

pub mod array;
pub mod autograd;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod types;
pub mod utils;
pub mod variable;

pub use array::{Data, NdArray};
pub use autograd::{BackwardOptions, GradFn, Operation, TraversalOrder};
pub use error::GradFlowError;
pub use ops::{apply, Outputs};
pub use types::DType;
pub use variable::Variable;
