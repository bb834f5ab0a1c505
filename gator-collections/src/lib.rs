//! Ordered index and indexed priority queue over external storage.
//!
//! This crate separates storage from structure. Storage owns the values and
//! hands out stable handles; the structures only coordinate those handles:
//!
//! ```text
//! Storage (BoxedStorage) - owns data, provides stable handles
//! RbTree / Heap          - coordinate handles, don't own data
//! ```
//!
//! Because a handle never moves while its value is live, a value in one
//! structure can hold the handle of its counterpart in another. That is how
//! a ride keyed in the tree finds its entry in the priority queue (and back)
//! in O(1).
//!
//! # Quick Start
//!
//! ```
//! use gator_collections::{BoxedRbStorage, RbTree};
//!
//! let mut storage: BoxedRbStorage<u32, u64> = BoxedRbStorage::with_capacity(100);
//! let mut index: RbTree<u32, u64, BoxedRbStorage<u32, u64>> = RbTree::new();
//!
//! index.try_insert(&mut storage, 7, 70).unwrap();
//! index.try_insert(&mut storage, 3, 30).unwrap();
//!
//! let hits = index.range(&storage, &1, &5);
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a structure must use the storage instance it was built
//! against. Passing a different storage is a logic error and will panic or
//! return unrelated values.
//!
//! # Data Structures
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`RbTree`] | Ordered map, range scans | O(log n) insert/find/remove |
//! | [`Heap`] | Priority queues | O(log n) push/pop/remove-by-handle |
//!
//! Both expose `validate`, which walks the whole structure and reports the
//! first broken property as an [`InvariantViolation`].
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod heap;
pub mod index;
pub mod invariant;
pub mod rbtree;
pub mod storage;

pub use heap::{Heap, HeapEntry};
pub use index::Index;
pub use invariant::InvariantViolation;
pub use rbtree::{BoxedRbStorage, Color, InsertError, RbNode, RbTree};
pub use storage::{BoxedStorage, Full, Storage};
