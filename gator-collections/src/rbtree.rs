//! Red-black tree - a balanced ordered map backed by external storage.
//!
//! The tree stores keys and values inside its own nodes ([`RbNode`]) and the
//! external storage owns those nodes. Links are storage handles, so a handle
//! returned by [`RbTree::try_insert`] stays valid until that key is removed.
//!
//! # Sentinel
//!
//! `Idx::NONE` is the leaf sentinel. Every absent child and the root's parent
//! point at it. It is a valid traversal target: its color always reads black
//! and the tree keeps one writable parent slot for it, which the delete
//! fix-up relies on when the spliced-out position is a leaf.
//!
//! # Example
//!
//! ```
//! use gator_collections::{BoxedRbStorage, RbTree};
//!
//! let mut storage: BoxedRbStorage<u32, &str> = BoxedRbStorage::with_capacity(16);
//! let mut tree: RbTree<u32, &str, BoxedRbStorage<u32, &str>> = RbTree::new();
//!
//! tree.try_insert(&mut storage, 20, "b").unwrap();
//! tree.try_insert(&mut storage, 10, "a").unwrap();
//! tree.try_insert(&mut storage, 30, "c").unwrap();
//!
//! assert_eq!(tree.get(&storage, &10), Some(&"a"));
//! assert_eq!(tree.remove(&mut storage, &20), Some((20, "b")));
//! assert_eq!(tree.keys(&storage).copied().collect::<Vec<_>>(), vec![10, 30]);
//! ```

use core::cmp::Ordering;
use core::marker::PhantomData;

use crate::{BoxedStorage, Index, InvariantViolation, Storage};

/// Type alias for bounded tree storage backed by a boxed allocation.
pub type BoxedRbStorage<K, V, Idx = u32> = BoxedStorage<RbNode<K, V, Idx>, Idx>;

/// Node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node - never has a red child.
    Red,
    /// Black node - counts toward black height.
    Black,
}

/// A tree node holding a key, a value, and its links.
#[derive(Debug, Clone)]
pub struct RbNode<K, V, Idx: Index> {
    key: K,
    /// The value associated with this key.
    pub value: V,
    left: Idx,
    right: Idx,
    parent: Idx,
    color: Color,
}

impl<K, V, Idx: Index> RbNode<K, V, Idx> {
    #[inline]
    fn new(key: K, value: V, parent: Idx) -> Self {
        Self {
            key,
            value,
            left: Idx::NONE,
            right: Idx::NONE,
            parent,
            color: Color::Red,
        }
    }

    /// Returns the key. Keys are immutable once inserted.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the node color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
}

/// Error returned by [`RbTree::try_insert`].
///
/// Both variants hand the rejected key and value back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError<K, V> {
    /// The key is already present; the tree is unchanged.
    Duplicate(K, V),
    /// Storage has no free slot; the tree is unchanged.
    Full(K, V),
}

impl<K, V> InsertError<K, V> {
    /// Returns the rejected key and value.
    pub fn into_inner(self) -> (K, V) {
        match self {
            Self::Duplicate(k, v) | Self::Full(k, v) => (k, v),
        }
    }
}

impl<K, V> core::fmt::Display for InsertError<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Duplicate(..) => write!(f, "duplicate key"),
            Self::Full(..) => write!(f, "storage is full"),
        }
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> std::error::Error for InsertError<K, V> {}

/// A red-black tree keyed by `K` over external storage.
///
/// Insert, lookup, and removal are O(log n) worst case. Ordered iteration
/// and bounded range queries walk in ascending key order.
///
/// # Storage Invariant
///
/// A tree must always be used with the same storage instance.
#[derive(Debug)]
pub struct RbTree<K, V, S, Idx: Index = u32> {
    root: Idx,
    len: usize,
    /// Parent slot of the sentinel, only meaningful during removal.
    nil_parent: Idx,
    _marker: PhantomData<(K, V, S)>,
}

impl<K, V, S, Idx: Index> Default for RbTree<K, V, S, Idx> {
    fn default() -> Self {
        Self {
            root: Idx::NONE,
            len: 0,
            nil_parent: Idx::NONE,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S, Idx> RbTree<K, V, S, Idx>
where
    K: Ord,
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the root handle, or `Idx::NONE` if empty.
    #[inline]
    pub fn root(&self) -> Idx {
        self.root
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Returns the handle of the node holding `key`.
    pub fn find(&self, storage: &S, key: &K) -> Option<Idx> {
        let mut current = self.root;
        while current.is_some() {
            let n = node(storage, current);
            current = match key.cmp(&n.key) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    /// Returns `true` if the tree contains `key`.
    #[inline]
    pub fn contains_key(&self, storage: &S, key: &K) -> bool {
        self.find(storage, key).is_some()
    }

    /// Returns a reference to the value for `key`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: &K) -> Option<&'a V>
    where
        K: 'a,
        Idx: 'a,
    {
        self.find(storage, key).map(|idx| &node(storage, idx).value)
    }

    /// Returns a mutable reference to the value for `key`.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, key: &K) -> Option<&'a mut V>
    where
        K: 'a,
        Idx: 'a,
    {
        let idx = self.find(storage, key)?;
        Some(&mut node_mut(storage, idx).value)
    }

    /// Returns the handle of the smallest key.
    pub fn first(&self, storage: &S) -> Option<Idx> {
        self.root.is_some().then(|| minimum(storage, self.root))
    }

    /// Returns the handle of the largest key.
    pub fn last(&self, storage: &S) -> Option<Idx> {
        self.root.is_some().then(|| maximum(storage, self.root))
    }

    /// Returns the in-order successor of `idx`.
    pub fn successor(&self, storage: &S, idx: Idx) -> Option<Idx> {
        let next = successor(storage, idx);
        next.is_some().then_some(next)
    }

    /// Returns the in-order predecessor of `idx`.
    pub fn predecessor(&self, storage: &S, idx: Idx) -> Option<Idx> {
        let n = node(storage, idx);
        if n.left.is_some() {
            return Some(maximum(storage, n.left));
        }

        let mut child = idx;
        let mut parent = n.parent;
        while parent.is_some() && child == node(storage, parent).left {
            child = parent;
            parent = node(storage, parent).parent;
        }
        parent.is_some().then_some(parent)
    }

    /// Returns handles of all nodes with `low <= key <= high`, ascending.
    ///
    /// Subtrees that cannot hold a qualifying key are skipped, so the walk
    /// touches the qualifying nodes plus O(log n) boundary nodes. An
    /// inverted range yields an empty result.
    pub fn range(&self, storage: &S, low: &K, high: &K) -> Vec<Idx> {
        let mut out = Vec::new();
        if low <= high {
            collect_range(storage, self.root, low, high, &mut out);
        }
        out
    }

    /// Returns an iterator over `(key, value)` pairs in ascending key order.
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, K, V, S, Idx> {
        Iter {
            storage,
            next: self.first(storage).unwrap_or(Idx::NONE),
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys<'a>(
        &self,
        storage: &'a S,
    ) -> impl Iterator<Item = &'a K> + use<'a, K, V, S, Idx>
    where
        K: 'a,
        V: 'a,
        Idx: 'a,
    {
        self.iter(storage).map(|(k, _)| k)
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Inserts `key` with `value`, returning the new node's handle.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Duplicate`] if `key` is already present.
    /// - [`InsertError::Full`] if storage has no free slot.
    ///
    /// In both cases the tree and storage are unchanged.
    pub fn try_insert(
        &mut self,
        storage: &mut S,
        key: K,
        value: V,
    ) -> Result<Idx, InsertError<K, V>> {
        let mut parent = Idx::NONE;
        let mut current = self.root;
        let mut ordering = Ordering::Equal;

        while current.is_some() {
            parent = current;
            let n = node(storage, current);
            ordering = key.cmp(&n.key);
            current = match ordering {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Err(InsertError::Duplicate(key, value)),
            };
        }

        let idx = storage
            .try_insert(RbNode::new(key, value, parent))
            .map_err(|full| {
                let n = full.into_inner();
                InsertError::Full(n.key, n.value)
            })?;

        if parent.is_none() {
            self.root = idx;
        } else if ordering == Ordering::Less {
            node_mut(storage, parent).left = idx;
        } else {
            node_mut(storage, parent).right = idx;
        }

        self.len += 1;
        self.insert_fixup(storage, idx);
        Ok(idx)
    }

    fn insert_fixup(&mut self, storage: &mut S, mut z: Idx) {
        while self.color(storage, self.parent(storage, z)) == Color::Red {
            let p = self.parent(storage, z);
            let g = self.parent(storage, p);

            if p == self.left(storage, g) {
                let uncle = self.right(storage, g);
                if self.color(storage, uncle) == Color::Red {
                    self.set_color(storage, p, Color::Black);
                    self.set_color(storage, uncle, Color::Black);
                    self.set_color(storage, g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(storage, p) {
                        z = p;
                        self.rotate_left(storage, z);
                    }
                    let p = self.parent(storage, z);
                    let g = self.parent(storage, p);
                    self.set_color(storage, p, Color::Black);
                    self.set_color(storage, g, Color::Red);
                    self.rotate_right(storage, g);
                }
            } else {
                let uncle = self.left(storage, g);
                if self.color(storage, uncle) == Color::Red {
                    self.set_color(storage, p, Color::Black);
                    self.set_color(storage, uncle, Color::Black);
                    self.set_color(storage, g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(storage, p) {
                        z = p;
                        self.rotate_right(storage, z);
                    }
                    let p = self.parent(storage, z);
                    let g = self.parent(storage, p);
                    self.set_color(storage, p, Color::Black);
                    self.set_color(storage, g, Color::Red);
                    self.rotate_left(storage, g);
                }
            }
        }

        let root = self.root;
        self.set_color(storage, root, Color::Black);
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes `key`, returning the key and value it held.
    pub fn remove(&mut self, storage: &mut S, key: &K) -> Option<(K, V)> {
        let idx = self.find(storage, key)?;
        Some(self.remove_node(storage, idx))
    }

    /// Removes the node at `idx`, returning its key and value.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a live node of this tree.
    pub fn remove_node(&mut self, storage: &mut S, idx: Idx) -> (K, V) {
        self.unlink(storage, idx);
        let n = storage.remove(idx).expect("tree handle not in storage");
        (n.key, n.value)
    }

    /// Splices `z` out of the tree and rebalances. `z` stays in storage.
    fn unlink(&mut self, storage: &mut S, z: Idx) {
        let z_left = self.left(storage, z);
        let z_right = self.right(storage, z);

        let mut removed_color = self.color(storage, z);
        let x;

        if z_left.is_none() {
            x = z_right;
            self.transplant(storage, z, z_right);
        } else if z_right.is_none() {
            x = z_left;
            self.transplant(storage, z, z_left);
        } else {
            let y = minimum(storage, z_right);
            removed_color = self.color(storage, y);
            x = self.right(storage, y);

            if self.parent(storage, y) == z {
                self.set_parent(storage, x, y);
            } else {
                self.transplant(storage, y, x);
                node_mut(storage, y).right = z_right;
                self.set_parent(storage, z_right, y);
            }

            self.transplant(storage, z, y);
            node_mut(storage, y).left = z_left;
            self.set_parent(storage, z_left, y);
            let z_color = self.color(storage, z);
            node_mut(storage, y).color = z_color;
        }

        if removed_color == Color::Black {
            self.remove_fixup(storage, x);
        }

        self.nil_parent = Idx::NONE;
        self.len -= 1;
    }

    fn remove_fixup(&mut self, storage: &mut S, mut x: Idx) {
        while x != self.root && self.color(storage, x) == Color::Black {
            let xp = self.parent(storage, x);

            if x == self.left(storage, xp) {
                let mut w = self.right(storage, xp);
                if self.color(storage, w) == Color::Red {
                    self.set_color(storage, w, Color::Black);
                    self.set_color(storage, xp, Color::Red);
                    self.rotate_left(storage, xp);
                    w = self.right(storage, self.parent(storage, x));
                }

                let w_left = self.left(storage, w);
                let w_right = self.right(storage, w);
                if self.color(storage, w_left) == Color::Black
                    && self.color(storage, w_right) == Color::Black
                {
                    self.set_color(storage, w, Color::Red);
                    x = self.parent(storage, x);
                } else {
                    if self.color(storage, w_right) == Color::Black {
                        self.set_color(storage, w_left, Color::Black);
                        self.set_color(storage, w, Color::Red);
                        self.rotate_right(storage, w);
                        w = self.right(storage, self.parent(storage, x));
                    }
                    let xp = self.parent(storage, x);
                    let xp_color = self.color(storage, xp);
                    self.set_color(storage, w, xp_color);
                    self.set_color(storage, xp, Color::Black);
                    let w_right = self.right(storage, w);
                    self.set_color(storage, w_right, Color::Black);
                    self.rotate_left(storage, xp);
                    x = self.root;
                }
            } else {
                let mut w = self.left(storage, xp);
                if self.color(storage, w) == Color::Red {
                    self.set_color(storage, w, Color::Black);
                    self.set_color(storage, xp, Color::Red);
                    self.rotate_right(storage, xp);
                    w = self.left(storage, self.parent(storage, x));
                }

                let w_left = self.left(storage, w);
                let w_right = self.right(storage, w);
                if self.color(storage, w_left) == Color::Black
                    && self.color(storage, w_right) == Color::Black
                {
                    self.set_color(storage, w, Color::Red);
                    x = self.parent(storage, x);
                } else {
                    if self.color(storage, w_left) == Color::Black {
                        self.set_color(storage, w_right, Color::Black);
                        self.set_color(storage, w, Color::Red);
                        self.rotate_left(storage, w);
                        w = self.left(storage, self.parent(storage, x));
                    }
                    let xp = self.parent(storage, x);
                    let xp_color = self.color(storage, xp);
                    self.set_color(storage, w, xp_color);
                    self.set_color(storage, xp, Color::Black);
                    let w_left = self.left(storage, w);
                    self.set_color(storage, w_left, Color::Black);
                    self.rotate_right(storage, xp);
                    x = self.root;
                }
            }
        }

        self.set_color(storage, x, Color::Black);
    }

    /// Removes every node from the tree and from storage.
    pub fn clear(&mut self, storage: &mut S) {
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push(self.root);
        }
        while let Some(idx) = stack.pop() {
            let n = storage.remove(idx).expect("tree handle not in storage");
            if n.left.is_some() {
                stack.push(n.left);
            }
            if n.right.is_some() {
                stack.push(n.right);
            }
        }

        self.root = Idx::NONE;
        self.nil_parent = Idx::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the red-black and search-tree properties over the whole tree.
    ///
    /// Verifies: root is black, no red node has a red child, equal black
    /// height on every path, strictly ascending in-order keys, parent links
    /// consistent, and `len` matches the node count.
    pub fn validate(&self, storage: &S) -> Result<(), InvariantViolation> {
        if self.root.is_none() {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::Len {
                    recorded: self.len,
                    counted: 0,
                })
            };
        }

        let root = storage
            .get(self.root)
            .ok_or(InvariantViolation::Dangling {
                index: self.root.as_usize(),
            })?;
        if root.color == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }
        if root.parent.is_some() {
            return Err(InvariantViolation::ParentLink {
                node: self.root.as_usize(),
            });
        }

        let mut counted = 0;
        black_height(storage, self.root, &mut counted)?;
        if counted != self.len {
            return Err(InvariantViolation::Len {
                recorded: self.len,
                counted,
            });
        }

        let mut prev: Option<&K> = None;
        for (key, _) in self.iter(storage) {
            if prev.is_some_and(|p| p >= key) {
                let idx = self.find(storage, key).unwrap_or(Idx::NONE);
                return Err(InvariantViolation::KeyOrder {
                    node: idx.as_usize(),
                });
            }
            prev = Some(key);
        }

        Ok(())
    }

    // ========================================================================
    // Sentinel-aware link access
    // ========================================================================

    #[inline]
    fn color(&self, storage: &S, idx: Idx) -> Color {
        if idx.is_none() {
            Color::Black
        } else {
            node(storage, idx).color
        }
    }

    #[inline]
    fn set_color(&self, storage: &mut S, idx: Idx, color: Color) {
        if idx.is_none() {
            debug_assert_eq!(color, Color::Black, "sentinel must stay black");
            return;
        }
        node_mut(storage, idx).color = color;
    }

    #[inline]
    fn parent(&self, storage: &S, idx: Idx) -> Idx {
        if idx.is_none() {
            self.nil_parent
        } else {
            node(storage, idx).parent
        }
    }

    #[inline]
    fn set_parent(&mut self, storage: &mut S, idx: Idx, parent: Idx) {
        if idx.is_none() {
            self.nil_parent = parent;
        } else {
            node_mut(storage, idx).parent = parent;
        }
    }

    #[inline]
    fn left(&self, storage: &S, idx: Idx) -> Idx {
        if idx.is_none() {
            Idx::NONE
        } else {
            node(storage, idx).left
        }
    }

    #[inline]
    fn right(&self, storage: &S, idx: Idx) -> Idx {
        if idx.is_none() {
            Idx::NONE
        } else {
            node(storage, idx).right
        }
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    fn transplant(&mut self, storage: &mut S, u: Idx, v: Idx) {
        let up = self.parent(storage, u);
        if up.is_none() {
            self.root = v;
        } else if u == self.left(storage, up) {
            node_mut(storage, up).left = v;
        } else {
            node_mut(storage, up).right = v;
        }
        self.set_parent(storage, v, up);
    }

    fn rotate_left(&mut self, storage: &mut S, x: Idx) {
        let y = self.right(storage, x);
        let y_left = self.left(storage, y);

        node_mut(storage, x).right = y_left;
        if y_left.is_some() {
            node_mut(storage, y_left).parent = x;
        }

        let xp = self.parent(storage, x);
        node_mut(storage, y).parent = xp;
        if xp.is_none() {
            self.root = y;
        } else if x == self.left(storage, xp) {
            node_mut(storage, xp).left = y;
        } else {
            node_mut(storage, xp).right = y;
        }

        node_mut(storage, y).left = x;
        node_mut(storage, x).parent = y;
    }

    fn rotate_right(&mut self, storage: &mut S, x: Idx) {
        let y = self.left(storage, x);
        let y_right = self.right(storage, y);

        node_mut(storage, x).left = y_right;
        if y_right.is_some() {
            node_mut(storage, y_right).parent = x;
        }

        let xp = self.parent(storage, x);
        node_mut(storage, y).parent = xp;
        if xp.is_none() {
            self.root = y;
        } else if x == self.right(storage, xp) {
            node_mut(storage, xp).right = y;
        } else {
            node_mut(storage, xp).left = y;
        }

        node_mut(storage, y).right = x;
        node_mut(storage, x).parent = y;
    }
}

// ============================================================================
// Free helpers over storage
// ============================================================================

#[inline]
fn node<K, V, Idx, S>(storage: &S, idx: Idx) -> &RbNode<K, V, Idx>
where
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    storage.get(idx).expect("tree handle not in storage")
}

#[inline]
fn node_mut<K, V, Idx, S>(storage: &mut S, idx: Idx) -> &mut RbNode<K, V, Idx>
where
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    storage.get_mut(idx).expect("tree handle not in storage")
}

fn minimum<K, V, Idx, S>(storage: &S, mut idx: Idx) -> Idx
where
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    loop {
        let left = node(storage, idx).left;
        if left.is_none() {
            return idx;
        }
        idx = left;
    }
}

fn maximum<K, V, Idx, S>(storage: &S, mut idx: Idx) -> Idx
where
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    loop {
        let right = node(storage, idx).right;
        if right.is_none() {
            return idx;
        }
        idx = right;
    }
}

/// In-order successor, or `Idx::NONE` past the largest key.
fn successor<K, V, Idx, S>(storage: &S, idx: Idx) -> Idx
where
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    let n = node(storage, idx);
    if n.right.is_some() {
        return minimum(storage, n.right);
    }

    let mut child = idx;
    let mut parent = n.parent;
    while parent.is_some() && child == node(storage, parent).right {
        child = parent;
        parent = node(storage, parent).parent;
    }
    parent
}

fn collect_range<K, V, Idx, S>(storage: &S, idx: Idx, low: &K, high: &K, out: &mut Vec<Idx>)
where
    K: Ord,
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    if idx.is_none() {
        return;
    }
    let n = node(storage, idx);

    if low < &n.key {
        collect_range(storage, n.left, low, high, out);
    }
    if low <= &n.key && &n.key <= high {
        out.push(idx);
    }
    if &n.key < high {
        collect_range(storage, n.right, low, high, out);
    }
}

/// Returns the black height below `idx` (sentinel counts as 1).
fn black_height<K, V, Idx, S>(
    storage: &S,
    idx: Idx,
    counted: &mut usize,
) -> Result<usize, InvariantViolation>
where
    K: Ord,
    Idx: Index,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    if idx.is_none() {
        return Ok(1);
    }

    let n = storage
        .get(idx)
        .ok_or(InvariantViolation::Dangling {
            index: idx.as_usize(),
        })?;
    *counted += 1;

    for child in [n.left, n.right] {
        if child.is_none() {
            continue;
        }
        let c = storage
            .get(child)
            .ok_or(InvariantViolation::Dangling {
                index: child.as_usize(),
            })?;
        if c.parent != idx {
            return Err(InvariantViolation::ParentLink {
                node: child.as_usize(),
            });
        }
        if n.color == Color::Red && c.color == Color::Red {
            return Err(InvariantViolation::RedRed {
                parent: idx.as_usize(),
                child: child.as_usize(),
            });
        }
    }

    let left = black_height(storage, n.left, counted)?;
    let right = black_height(storage, n.right, counted)?;
    if left != right {
        return Err(InvariantViolation::BlackHeight {
            node: idx.as_usize(),
            left,
            right,
        });
    }

    Ok(left + usize::from(n.color == Color::Black))
}

// ============================================================================
// Iterator
// ============================================================================

/// In-order iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V, S, Idx: Index> {
    storage: &'a S,
    next: Idx,
    _marker: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V, S, Idx> Iterator for Iter<'a, K, V, S, Idx>
where
    K: 'a,
    V: 'a,
    Idx: Index + 'a,
    S: Storage<RbNode<K, V, Idx>, Index = Idx>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = successor(self.storage, current);
        let n = node(self.storage, current);
        Some((&n.key, &n.value))
    }
}
