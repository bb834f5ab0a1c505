//! Structural invariant reports.
//!
//! [`RbTree::validate`](crate::RbTree::validate) and
//! [`Heap::validate`](crate::Heap::validate) walk the whole structure and
//! return the first violated property. A violation always means a bug in this
//! crate or a caller that mutated ordering fields without notifying the
//! structure; it is never an expected runtime outcome.

/// The first structural property found broken, with the offending handles.
///
/// Handles are reported as `usize` so the type does not depend on the
/// structure's index type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The tree root is red.
    RedRoot,
    /// A red node has a red child.
    RedRed {
        /// Handle of the red parent.
        parent: usize,
        /// Handle of its red child.
        child: usize,
    },
    /// Two subtrees of `node` have different black heights.
    BlackHeight {
        /// Handle of the node whose subtrees disagree.
        node: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order keys are not strictly ascending at `node`.
    KeyOrder {
        /// Handle of the first out-of-order node.
        node: usize,
    },
    /// A child's parent link does not point back at its parent.
    ParentLink {
        /// Handle of the node whose parent link is wrong.
        node: usize,
    },
    /// A handle reachable from the structure has no value in storage.
    Dangling {
        /// The vacant handle.
        index: usize,
    },
    /// The recorded element count disagrees with a full walk.
    Len {
        /// Count kept by the structure.
        recorded: usize,
        /// Count found by walking it.
        counted: usize,
    },
    /// A heap entry's stored slot disagrees with its true position.
    HeapSlot {
        /// Slot the entry actually occupies.
        slot: usize,
        /// Slot the entry believes it occupies.
        recorded: usize,
    },
    /// A heap parent orders after one of its children.
    HeapOrder {
        /// Slot of the parent.
        parent: usize,
        /// Slot of the child that orders first.
        child: usize,
    },
}

impl core::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RedRoot => write!(f, "root is red"),
            Self::RedRed { parent, child } => {
                write!(f, "red node {parent} has red child {child}")
            }
            Self::BlackHeight { node, left, right } => write!(
                f,
                "black height mismatch under node {node} (left {left}, right {right})"
            ),
            Self::KeyOrder { node } => write!(f, "key order violated at node {node}"),
            Self::ParentLink { node } => write!(f, "parent link of node {node} is broken"),
            Self::Dangling { index } => write!(f, "handle {index} is not in storage"),
            Self::Len { recorded, counted } => {
                write!(f, "recorded len {recorded} but walked {counted} elements")
            }
            Self::HeapSlot { slot, recorded } => {
                write!(f, "entry at slot {slot} records slot {recorded}")
            }
            Self::HeapOrder { parent, child } => {
                write!(f, "heap slot {parent} orders after child slot {child}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
