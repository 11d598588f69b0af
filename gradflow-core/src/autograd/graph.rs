use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::autograd::grad_fn::{GradFn, NodeId};

/// Order in which pending graph nodes are processed during `backward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Highest generation first, every node processed once per pass.
    ///
    /// A node is only processed after all of its consumers have added their
    /// contribution to its outputs' gradients, so accumulation is exact on
    /// any DAG.
    #[default]
    Generation,
    /// Last-in first-out stack without deduplication.
    ///
    /// A node is processed once per time it is reached. When an interior
    /// (non-leaf) variable feeds several consumers, its creator runs several
    /// times with the partially and then fully accumulated gradient, which
    /// over-counts everything upstream of it. Exact when fan-out only
    /// happens at leaves.
    Stack,
}

/// Options for a backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackwardOptions {
    pub order: TraversalOrder,
}

impl BackwardOptions {
    pub fn with_order(order: TraversalOrder) -> Self {
        BackwardOptions { order }
    }
}

/// Heap entry: ordered by generation, then by insertion (later first).
pub(crate) struct Pending {
    generation: usize,
    seq: usize,
    grad_fn: GradFn,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.generation
            .cmp(&other.generation)
            .then(self.seq.cmp(&other.seq))
    }
}

/// The set of graph nodes waiting to be processed by a backward pass.
pub(crate) enum Worklist {
    Stack(Vec<GradFn>),
    Generation {
        heap: BinaryHeap<Pending>,
        seen: HashSet<NodeId>,
        seq: usize,
    },
}

impl Worklist {
    pub(crate) fn new(order: TraversalOrder) -> Self {
        match order {
            TraversalOrder::Stack => Worklist::Stack(Vec::new()),
            TraversalOrder::Generation => Worklist::Generation {
                heap: BinaryHeap::new(),
                seen: HashSet::new(),
                seq: 0,
            },
        }
    }

    /// Adds a node. Returns false when the node was already queued in a
    /// deduplicating worklist.
    pub(crate) fn push(&mut self, grad_fn: GradFn) -> bool {
        match self {
            Worklist::Stack(stack) => {
                stack.push(grad_fn);
                true
            }
            Worklist::Generation { heap, seen, seq } => {
                if !seen.insert(grad_fn.id()) {
                    return false;
                }
                *seq += 1;
                heap.push(Pending {
                    generation: grad_fn.generation(),
                    seq: *seq,
                    grad_fn,
                });
                true
            }
        }
    }

    pub(crate) fn pop(&mut self) -> Option<GradFn> {
        match self {
            Worklist::Stack(stack) => stack.pop(),
            Worklist::Generation { heap, .. } => heap.pop().map(|pending| pending.grad_fn),
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
