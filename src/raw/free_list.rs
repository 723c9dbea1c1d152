use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use parking_lot::Mutex;
use tracing::trace;

use super::node::Node;

/// The number of retired nodes a tree's private free list keeps by default.
pub const DEFAULT_FREE_LIST_SIZE: usize = 32;

/// A bounded pool of retired B-tree nodes.
///
/// Every [`BTree`](crate::BTree) allocates nodes through a free list. By default
/// each tree owns a private one, but several trees may share a single list by
/// passing the same `Arc<FreeList<T>>` to
/// [`BTree::with_free_list`](crate::BTree::with_free_list) or
/// [`Builder::free_list`](crate::Builder::free_list). Trees sharing a free list
/// can be mutated concurrently from different threads; the list's internal lock
/// is the only state they share.
///
/// The pool never holds live data: nodes are cleared before they are released.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pairtree::{BTree, FreeList, Natural};
///
/// let free_list = Arc::new(FreeList::new(64));
/// let mut a: BTree<u32> = BTree::with_free_list(Natural, Arc::clone(&free_list));
/// let mut b: BTree<u32> = BTree::with_free_list(Natural, Arc::clone(&free_list));
///
/// a.replace_or_insert(1);
/// b.replace_or_insert(2);
/// assert_eq!(free_list.capacity(), 64);
/// ```
pub struct FreeList<T> {
    nodes: Mutex<Vec<Arc<Node<T>>>>,
    capacity: usize,
}

impl<T> FreeList<T> {
    /// Creates an empty free list that retains at most `capacity` nodes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Returns the maximum number of nodes this list retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of nodes currently pooled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    /// Returns `true` if no nodes are pooled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out a pooled node, or a freshly allocated one if the pool is empty.
    ///
    /// The returned node is empty, unstamped and uniquely owned.
    pub(crate) fn acquire(&self) -> Arc<Node<T>> {
        let pooled = self.nodes.lock().pop();
        pooled.unwrap_or_else(|| Arc::new(Node::new()))
    }

    /// Takes back a cleared node, dropping it if the pool is already full.
    pub(crate) fn release(&self, node: Arc<Node<T>>) {
        debug_assert!(node.is_cleared(), "`FreeList::release()` - node still holds data!");
        let mut nodes = self.nodes.lock();
        if nodes.len() < self.capacity {
            nodes.push(node);
        } else {
            drop(nodes);
            trace!(capacity = self.capacity, "free list full, dropping retired node");
        }
    }
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_LIST_SIZE)
    }
}

impl<T> fmt::Debug for FreeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeList").field("len", &self.len()).field("capacity", &self.capacity).finish()
    }
}
