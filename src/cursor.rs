use core::fmt;

use smallvec::SmallVec;

use crate::btree::BTree;
use crate::comparator::{Comparator, Natural};
use crate::raw::Node;

// Trees deeper than this are unheard of; deeper stacks spill onto the heap.
const INLINE_DEPTH: usize = 16;

/// A bidirectional position in a [`BTree`].
///
/// A cursor starts out unpositioned. [`first`], [`last`] and [`seek`] place it
/// on an item; [`next`] and [`prev`] then walk the tree in either direction,
/// returning `None` once they fall off an end. A cursor that has fallen off an
/// end stays unpositioned until it is placed again.
///
/// The cursor borrows its tree, so the tree cannot change underneath it.
///
/// # Examples
///
/// ```
/// use pairtree::BTree;
///
/// let tree: BTree<_> = (0..100).map(|i| i * 10).collect();
/// let mut cursor = tree.cursor();
///
/// assert_eq!(cursor.seek(&255), Some(&260));
/// assert_eq!(cursor.next(), Some(&270));
/// assert_eq!(cursor.prev(), Some(&260));
/// assert_eq!(cursor.prev(), Some(&250));
///
/// assert_eq!(cursor.last(), Some(&990));
/// assert_eq!(cursor.next(), None);
/// ```
///
/// [`first`]: Cursor::first
/// [`last`]: Cursor::last
/// [`seek`]: Cursor::seek
/// [`next`]: Cursor::next
/// [`prev`]: Cursor::prev
pub struct Cursor<'a, T, C = Natural> {
    tree: &'a BTree<T, C>,
    stack: SmallVec<[Frame<'a, T>; INLINE_DEPTH]>,
}

/// One level of the path from the root to the cursor's item.
///
/// `position` interleaves children and items. In a leaf it is an item index.
/// In an internal node even positions `2i` address child `i` and odd
/// positions `2i + 1` address item `i`. Positions outside
/// `0..node.positions()` mean the walk has left the node.
struct Frame<'a, T> {
    node: &'a Node<T>,
    position: isize,
}

enum Slot<'a, T> {
    Item(&'a T),
    Child(&'a Node<T>),
}

impl<'a, T> Frame<'a, T> {
    fn new(node: &'a Node<T>, position: usize) -> Self {
        Self {
            node,
            position: to_position(position),
        }
    }

    /// A frame just before the node's first position.
    fn before(node: &'a Node<T>) -> Self {
        Self { node, position: -1 }
    }

    /// A frame just past the node's last position.
    fn after(node: &'a Node<T>) -> Self {
        Self::new(node, node.positions())
    }

    fn slot(&self) -> Option<Slot<'a, T>> {
        let node = self.node;
        let position = usize::try_from(self.position).ok()?;
        if position >= node.positions() {
            return None;
        }
        if node.is_leaf() {
            Some(Slot::Item(&node.items[position]))
        } else if position % 2 == 1 {
            Some(Slot::Item(&node.items[position / 2]))
        } else {
            Some(Slot::Child(&node.children[position / 2]))
        }
    }
}

impl<T> Clone for Frame<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Frame<'_, T> {}

#[inline]
#[allow(clippy::cast_possible_wrap)]
fn to_position(position: usize) -> isize {
    position as isize
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(crate) fn new(tree: &'a BTree<T, C>) -> Self {
        Self {
            tree,
            stack: SmallVec::new(),
        }
    }

    /// Moves to the smallest item and returns it, or `None` if the tree is
    /// empty.
    pub fn first(&mut self) -> Option<&'a T> {
        self.stack.clear();
        let tree = self.tree;
        let mut node = tree.root()?;
        loop {
            self.stack.push(Frame::new(node, 0));
            match node.children.first() {
                Some(child) => node = child,
                None => return node.items.first(),
            }
        }
    }

    /// Moves to the largest item and returns it, or `None` if the tree is
    /// empty.
    pub fn last(&mut self) -> Option<&'a T> {
        self.stack.clear();
        let tree = self.tree;
        let mut node = tree.root()?;
        loop {
            self.stack.push(Frame::new(node, node.positions() - 1));
            match node.children.last() {
                Some(child) => node = child,
                None => return node.items.last(),
            }
        }
    }

    /// Advances to the next item in order and returns it.
    ///
    /// Returns `None`, leaving the cursor unpositioned, when the current item
    /// is the largest one or the cursor is unpositioned.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a T> {
        loop {
            let frame = self.stack.last_mut()?;
            frame.position += 1;
            match frame.slot() {
                Some(Slot::Item(item)) => return Some(item),
                Some(Slot::Child(child)) => self.stack.push(Frame::before(child)),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    /// Steps back to the previous item in order and returns it.
    ///
    /// Returns `None`, leaving the cursor unpositioned, when the current item
    /// is the smallest one or the cursor is unpositioned.
    pub fn prev(&mut self) -> Option<&'a T> {
        loop {
            let frame = self.stack.last_mut()?;
            frame.position -= 1;
            match frame.slot() {
                Some(Slot::Item(item)) => return Some(item),
                Some(Slot::Child(child)) => self.stack.push(Frame::after(child)),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    /// Returns `true` if the cursor currently sits on an item.
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        !self.stack.is_empty()
    }
}

impl<'a, T, C: Comparator<T>> Cursor<'a, T, C> {
    /// Moves to the item equivalent to `pivot`, or if there is none, to the
    /// smallest item ordered after it. Returns that item, or `None` if every
    /// item orders before `pivot`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let tree: BTree<_> = [10, 20, 30].into_iter().collect();
    /// let mut cursor = tree.cursor();
    /// assert_eq!(cursor.seek(&20), Some(&20));
    /// assert_eq!(cursor.seek(&21), Some(&30));
    /// assert_eq!(cursor.seek(&31), None);
    /// ```
    pub fn seek(&mut self, pivot: &T) -> Option<&'a T> {
        self.stack.clear();
        let tree = self.tree;
        let less = tree.comparator();
        let mut node = tree.root()?;
        loop {
            let (index, found) = node.items.find(pivot, less);
            if found {
                let position = if node.is_leaf() { index } else { 2 * index + 1 };
                self.stack.push(Frame::new(node, position));
                return Some(&node.items[index]);
            }
            if node.is_leaf() {
                self.stack.push(Frame::new(node, index));
                return match node.items.get(index) {
                    Some(item) => Some(item),
                    // Every item of this leaf orders before `pivot`; the
                    // successor is the next separator up the path.
                    None => self.next(),
                };
            }
            self.stack.push(Frame::new(node, 2 * index));
            node = &node.children[index];
        }
    }
}

impl<T, C> Clone for Cursor<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.stack.last().and_then(|frame| match frame.slot() {
            Some(Slot::Item(item)) => Some(item),
            _ => None,
        });
        f.debug_struct("Cursor")
            .field("current", &current)
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn build(degree: usize, items: impl IntoIterator<Item = u32>) -> BTree<u32> {
        let mut tree = BTree::builder().degree(degree).build().expect("valid degree");
        tree.extend(items);
        tree
    }

    #[test]
    fn empty_tree() {
        let tree = build(2, []);
        let mut cursor = tree.cursor();
        assert_eq!(cursor.first(), None);
        assert_eq!(cursor.last(), None);
        assert_eq!(cursor.seek(&1), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.prev(), None);
        assert!(!cursor.is_positioned());
    }

    #[test]
    fn unpositioned_cursor_yields_nothing() {
        let tree = build(2, 0..10);
        let mut cursor = tree.cursor();
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.prev(), None);
    }

    #[test]
    fn forward_walk_matches_ascend() {
        let tree = build(2, (0..500).rev());
        let mut expected = Vec::new();
        tree.ascend(|&item| {
            expected.push(item);
            true
        });

        let mut cursor = tree.cursor();
        let mut walked = Vec::new();
        let mut item = cursor.first();
        while let Some(&value) = item {
            walked.push(value);
            item = cursor.next();
        }
        assert_eq!(walked, expected);
        assert!(!cursor.is_positioned());
    }

    #[test]
    fn backward_walk_matches_descend() {
        let tree = build(3, 0..500);
        let mut expected = Vec::new();
        tree.descend(|&item| {
            expected.push(item);
            true
        });

        let mut cursor = tree.cursor();
        let mut walked = Vec::new();
        let mut item = cursor.last();
        while let Some(&value) = item {
            walked.push(value);
            item = cursor.prev();
        }
        assert_eq!(walked, expected);
    }

    #[test]
    fn direction_changes() {
        let tree = build(2, 0..100);
        let mut cursor = tree.cursor();
        assert_eq!(cursor.seek(&50), Some(&50));
        for expected in 51..60 {
            assert_eq!(cursor.next(), Some(&expected));
        }
        for expected in (40..59).rev() {
            assert_eq!(cursor.prev(), Some(&expected));
        }
    }

    #[test]
    fn seek_lands_on_successor() {
        let tree = build(2, (0..200).map(|i| i * 3));
        let mut cursor = tree.cursor();
        for pivot in 0u32..=597 {
            let expected = pivot.div_ceil(3) * 3;
            assert_eq!(cursor.seek(&pivot), Some(&expected), "seek({pivot})");
            if expected + 3 < 600 {
                assert_eq!(cursor.next(), Some(&(expected + 3)));
            }
        }
        assert_eq!(cursor.seek(&598), None);
        assert!(!cursor.is_positioned());
    }

    #[test]
    fn seek_then_prev() {
        let tree = build(2, (0..200).map(|i| i * 2));
        let mut cursor = tree.cursor();
        assert_eq!(cursor.seek(&101), Some(&102));
        assert_eq!(cursor.prev(), Some(&100));
        assert_eq!(cursor.seek(&0), Some(&0));
        assert_eq!(cursor.prev(), None);
    }

    #[test]
    fn debug_shows_current_item() {
        let tree = build(2, 0..10);
        let mut cursor = tree.cursor();
        cursor.seek(&4);
        assert!(alloc::format!("{cursor:?}").contains("current: Some(4)"));
    }

    proptest! {
        #[test]
        fn seek_matches_model(
            degree in 2usize..5,
            items in proptest::collection::btree_set(0u32..1000, 1..300),
            pivot in 0u32..1000,
        ) {
            let tree = build(degree, items.iter().copied());
            let mut cursor = tree.cursor();

            let mut model = items.range(pivot..);
            prop_assert_eq!(cursor.seek(&pivot), model.next());
            prop_assert_eq!(cursor.next(), model.next());

            let mut model = items.range(..pivot).rev();
            if cursor.seek(&pivot).is_some() {
                prop_assert_eq!(cursor.prev(), model.next());
                prop_assert_eq!(cursor.prev(), model.next());
            }
        }
    }
}
