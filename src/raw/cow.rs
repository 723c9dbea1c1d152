use alloc::sync::Arc;

use super::free_list::FreeList;
use super::node::Node;

/// Write ownership tag for copy-on-write nodes.
///
/// A tree may only modify a node in place if the node is stamped with the
/// tree's context and no other tree references the node's allocation. Any
/// other node is copied into a fresh node stamped with the writer's context
/// before it is touched. Contexts are compared by identity, never by value.
pub(crate) struct WriteContext<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    free_list: Arc<FreeList<T>>,
}

impl<T> WriteContext<T> {
    pub(crate) fn new(free_list: Arc<FreeList<T>>) -> Self {
        Self {
            inner: Arc::new(Inner { free_list }),
        }
    }

    /// Returns a new, distinct context allocating from the same free list.
    pub(crate) fn fork(&self) -> Self {
        Self::new(Arc::clone(&self.inner.free_list))
    }

    pub(crate) fn free_list(&self) -> &Arc<FreeList<T>> {
        &self.inner.free_list
    }

    #[inline]
    pub(crate) fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if `node` carries this context's stamp.
    #[inline]
    fn stamped(&self, node: &Node<T>) -> bool {
        node.cow().is_some_and(|cow| cow.same(self))
    }

    /// Returns `true` if this context may write to the node in `slot` in place.
    #[inline]
    pub(crate) fn owns(&self, slot: &mut Arc<Node<T>>) -> bool {
        self.stamped(slot) && Arc::get_mut(slot).is_some()
    }

    /// Allocates an empty node stamped with this context and fills it.
    pub(crate) fn new_node_with<F>(&self, fill: F) -> Arc<Node<T>>
    where
        F: FnOnce(&mut Node<T>),
    {
        let mut node = self.inner.free_list.acquire();
        let shell = Arc::get_mut(&mut node).expect("`WriteContext::new_node_with()` - pooled node is shared!");
        shell.stamp(self.clone());
        fill(shell);
        node
    }

    /// Returns a retired node to the free list.
    ///
    /// Nodes stamped with another context, or still referenced elsewhere, are
    /// simply dropped: they may be part of some other tree.
    pub(crate) fn free_node(&self, mut node: Arc<Node<T>>) {
        if !self.stamped(&node) {
            return;
        }
        if let Some(shell) = Arc::get_mut(&mut node) {
            shell.reset();
            self.inner.free_list.release(node);
        }
    }
}

impl<T: Clone> WriteContext<T> {
    /// Makes the node in `slot` writable for this context.
    ///
    /// An owned node is returned as is. Otherwise the node's items are cloned
    /// and its child handles shallow-copied into a new node stamped with this
    /// context, which replaces the shared one in `slot`.
    pub(crate) fn mutable<'n>(&self, slot: &'n mut Arc<Node<T>>) -> &'n mut Node<T> {
        if !self.owns(slot) {
            let copy = self.new_node_with(|fresh| fresh.copy_from(&**slot));
            *slot = copy;
        }
        Arc::get_mut(slot).expect("`WriteContext::mutable()` - node is shared after copy!")
    }
}

impl<T> Clone for WriteContext<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
