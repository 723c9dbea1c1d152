use alloc::sync::Arc;
use core::fmt;
use core::mem;

use tracing::trace;

use crate::builder::Builder;
use crate::comparator::{Comparator, Natural};
use crate::cursor::Cursor;
use crate::raw::{DEFAULT_DEGREE, DEFAULT_FREE_LIST_SIZE, FreeList, Node, Removal, WriteContext};

mod iter;
mod range;

pub use iter::Iter;

/// An ordered collection of items based on a copy-on-write B-Tree.
///
/// Items are kept in the order defined by the tree's [`Comparator`]; two items
/// neither of which orders before the other are the same key, and the tree
/// stores at most one of them. Inserting an equivalent item replaces the
/// stored one and hands it back.
///
/// Cloning a tree is O(1): the clone shares every node with the original, and
/// whichever tree later writes to a shared node copies it first. Both trees
/// can then be modified independently, including from different threads.
///
/// Nodes are recycled through a [`FreeList`], which several trees may share.
///
/// It is a logic error for an item to be modified in such a way that its
/// ordering relative to any other item changes while it is in the tree. The
/// behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `BTree` that observed it and not result in undefined
/// behavior.
///
/// # Examples
///
/// ```
/// use pairtree::BTree;
///
/// let mut tree: BTree<&str> = BTree::new();
/// for word in ["pear", "apple", "fig", "kiwi"] {
///     tree.replace_or_insert(word);
/// }
///
/// assert_eq!(tree.len(), 4);
/// assert_eq!(tree.min(), Some(&"apple"));
/// assert!(tree.has(&"fig"));
///
/// // Snapshots are cheap and isolated.
/// let snapshot = tree.clone();
/// tree.delete(&"fig");
/// assert!(!tree.has(&"fig"));
/// assert!(snapshot.has(&"fig"));
///
/// let mut words = Vec::new();
/// snapshot.ascend_greater_or_equal(&"fig", |word| {
///     words.push(*word);
///     true
/// });
/// assert_eq!(words, ["fig", "kiwi", "pear"]);
/// ```
pub struct BTree<T, C = Natural> {
    degree: usize,
    len: usize,
    root: Option<Arc<Node<T>>>,
    less: C,
    cow: WriteContext<T>,
}

impl<T, C> BTree<T, C> {
    /// Makes a new, empty tree ordered by `less`, with the default degree and a
    /// private free list.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree = BTree::with_comparator(|a: &u8, b: &u8| a > b);
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    #[must_use]
    pub fn with_comparator(less: C) -> Self {
        Self::from_parts(DEFAULT_DEGREE, less, Arc::new(FreeList::new(DEFAULT_FREE_LIST_SIZE)))
    }

    /// Makes a new, empty tree ordered by `less` that allocates nodes from
    /// `free_list`.
    ///
    /// Trees sharing a free list may live on different threads.
    #[must_use]
    pub fn with_free_list(less: C, free_list: Arc<FreeList<T>>) -> Self {
        Self::from_parts(DEFAULT_DEGREE, less, free_list)
    }

    pub(crate) fn from_parts(degree: usize, less: C, free_list: Arc<FreeList<T>>) -> Self {
        debug_assert!(degree >= 2, "`BTree::from_parts()` - degree must be at least 2!");
        Self {
            degree,
            len: 0,
            root: None,
            less,
            cow: WriteContext::new(free_list),
        }
    }

    /// Returns the number of items in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the degree the tree was built with.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the number of node levels, `0` for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree: BTree<u32> = BTree::new();
    /// assert_eq!(tree.height(), 0);
    /// tree.replace_or_insert(1);
    /// assert_eq!(tree.height(), 1);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    /// Returns the free list this tree allocates nodes from.
    #[must_use]
    pub fn free_list(&self) -> &Arc<FreeList<T>> {
        self.cow.free_list()
    }

    /// Returns the tree's comparator.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.less
    }

    /// Returns the smallest item in the tree, or `None` if it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree: BTree<u32> = BTree::new();
    /// assert_eq!(tree.min(), None);
    /// tree.extend([5, 3, 8]);
    /// assert_eq!(tree.min(), Some(&3));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.root.as_deref().and_then(Node::min)
    }

    /// Returns the largest item in the tree, or `None` if it is empty.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.root.as_deref().and_then(Node::max)
    }

    /// Returns a cursor over the tree. The cursor is unpositioned until one of
    /// [`Cursor::first`], [`Cursor::last`] or [`Cursor::seek`] is called.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, T, C> {
        Cursor::new(self)
    }

    /// Gets an iterator that visits the items in the tree in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let tree: BTree<_> = [3, 1, 2].into_iter().collect();
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self)
    }

    pub(crate) fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    #[inline]
    fn max_items(&self) -> usize {
        self.degree * 2 - 1
    }

    #[inline]
    fn min_items(&self) -> usize {
        self.degree - 1
    }
}

impl<T, C: Default> BTree<T, C> {
    /// Makes a new, empty tree with the default degree and comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree: BTree<u32> = BTree::new();
    /// tree.replace_or_insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    /// Returns a [`Builder`] for configuring a tree's degree and free list.
    #[must_use]
    pub fn builder() -> Builder<T, C> {
        Builder::default()
    }
}

impl<T, C: Comparator<T>> BTree<T, C> {
    /// Returns the stored item equivalent to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::{Pair, PairTree};
    ///
    /// let mut tree = PairTree::new();
    /// tree.replace_or_insert(Pair::new("id", "42"));
    ///
    /// let found = tree.get(&Pair::key_only("id")).map(Pair::value);
    /// assert_eq!(found, Some(&b"42"[..]));
    /// ```
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        self.root.as_ref()?.get(key, &self.less)
    }

    /// Returns `true` if the tree holds an item equivalent to `key`.
    #[must_use]
    pub fn has(&self, key: &T) -> bool {
        self.get(key).is_some()
    }
}

impl<T: Clone, C: Comparator<T>> BTree<T, C> {
    /// Adds `item` to the tree.
    ///
    /// If an equivalent item is already present, it is replaced and returned;
    /// otherwise `None` is returned and the tree grows by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// // Order by the first field only.
    /// let mut tree = BTree::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0 < b.0);
    /// assert_eq!(tree.replace_or_insert((1, 'a')), None);
    /// assert_eq!(tree.replace_or_insert((1, 'b')), Some((1, 'a')));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn replace_or_insert(&mut self, item: T) -> Option<T> {
        let max_items = self.max_items();
        let Some(root) = self.root.as_mut() else {
            self.root = Some(self.cow.new_node_with(|root| root.items.push(item)));
            self.len = 1;
            return None;
        };

        let node = self.cow.mutable(root);
        if node.items.len() >= max_items {
            let (pivot, second) = node.split(max_items / 2, &self.cow);
            let top = self.cow.new_node_with(|top| top.items.push(pivot));
            let first = mem::replace(root, top);
            let top = self.cow.mutable(root);
            top.children.push(first);
            top.children.push(second);
            trace!(height = top.height(), "root split");
        }

        let out = self.cow.mutable(root).insert(item, max_items, &self.less, &self.cow);
        if out.is_none() {
            self.len += 1;
        }
        out
    }

    /// Removes the item equivalent to `key` and returns it, or `None` if there
    /// is no such item.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree: BTree<_> = (1..=3).collect();
    /// assert_eq!(tree.delete(&2), Some(2));
    /// assert_eq!(tree.delete(&2), None);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn delete(&mut self, key: &T) -> Option<T> {
        self.remove(Removal::Item(key))
    }

    /// Removes and returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let mut tree: BTree<_> = [2, 1].into_iter().collect();
    /// assert_eq!(tree.delete_min(), Some(1));
    /// assert_eq!(tree.delete_min(), Some(2));
    /// assert_eq!(tree.delete_min(), None);
    /// ```
    pub fn delete_min(&mut self) -> Option<T> {
        self.remove(Removal::Min)
    }

    /// Removes and returns the largest item.
    pub fn delete_max(&mut self) -> Option<T> {
        self.remove(Removal::Max)
    }

    fn remove(&mut self, target: Removal<'_, T>) -> Option<T> {
        let min_items = self.min_items();
        let root = self.root.as_mut()?;
        let node = self.cow.mutable(root);
        let out = node.remove(target, min_items, &self.less, &self.cow);

        if node.items.is_empty() {
            if node.is_leaf() {
                if let Some(old) = self.root.take() {
                    self.cow.free_node(old);
                }
            } else {
                let child = node.children.pop();
                let old = mem::replace(root, child);
                self.cow.free_node(old);
                trace!(height = root.height(), "root collapsed");
            }
        }

        if out.is_some() {
            self.len -= 1;
        }
        out
    }
}

impl<T, C: Clone> Clone for BTree<T, C> {
    /// Returns a snapshot of the tree in O(1).
    ///
    /// The clone starts out sharing every node with `self`. Writes on either
    /// side copy the nodes they touch, so neither tree observes the other's
    /// changes.
    fn clone(&self) -> Self {
        trace!(len = self.len, "cloning tree");
        Self {
            degree: self.degree,
            len: self.len,
            root: self.root.clone(),
            less: self.less.clone(),
            cow: self.cow.fork(),
        }
    }
}

impl<T, C: Default> Default for BTree<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Comparator<T>> Extend<T> for BTree<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |item| {
            self.replace_or_insert(item);
        });
    }
}

impl<'a, T: 'a + Copy, C: Comparator<T>> Extend<&'a T> for BTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Clone, C: Comparator<T> + Default> FromIterator<T> for BTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, C> IntoIterator for &'a BTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}
