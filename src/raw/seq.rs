use core::ops::{Deref, DerefMut};

use smallvec::{Array, SmallVec};

use crate::comparator::Comparator;

/// An ordered, resizable sequence backing a node's items or children.
///
/// Every removal hands the element back (or drops it), so vacated slots never
/// keep an item or a child alive after it has left the node.
pub(crate) struct Seq<A: Array>(SmallVec<A>);

impl<A: Array> Seq<A> {
    pub(crate) fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Inserts `element` at `index`, shifting all subsequent elements forward.
    #[inline]
    pub(crate) fn insert_at(&mut self, index: usize, element: A::Item) {
        self.0.insert(index, element);
    }

    /// Removes the element at `index`, shifting all subsequent elements back.
    #[inline]
    pub(crate) fn remove_at(&mut self, index: usize) -> A::Item {
        self.0.remove(index)
    }

    /// Removes and returns the last element.
    pub(crate) fn pop(&mut self) -> A::Item {
        self.0.pop().expect("`Seq::pop()` - sequence is empty!")
    }

    pub(crate) fn push(&mut self, element: A::Item) {
        self.0.push(element);
    }

    /// Keeps only the first `index` elements, dropping the rest.
    pub(crate) fn truncate(&mut self, index: usize) {
        assert!(index <= self.0.len(), "`Seq::truncate()` - `index` > `len`!");
        self.0.truncate(index);
    }

    /// Moves every element from `index` onwards out of this sequence.
    pub(crate) fn split_off(&mut self, index: usize) -> Self {
        Self(self.0.drain(index..).collect())
    }

    /// Moves all elements of `other` to the end of this sequence.
    pub(crate) fn append(&mut self, other: &mut Self) {
        self.0.extend(other.0.drain(..));
    }
}

impl<A: Array> Seq<A>
where
    A::Item: Clone,
{
    /// Replaces the contents with clones of `source`, reusing spilled capacity.
    pub(crate) fn clone_from_slice(&mut self, source: &[A::Item]) {
        self.0.clear();
        self.0.extend(source.iter().cloned());
    }
}

impl<T, A: Array<Item = T>> Seq<A> {
    /// Binary search with the tree's comparator.
    ///
    /// Returns `(index, true)` when an equivalent item sits at `index`, or
    /// `(index, false)` where `index` is the insertion point that keeps the
    /// sequence ordered.
    pub(crate) fn find<C>(&self, item: &T, less: &C) -> (usize, bool)
    where
        C: Comparator<T> + ?Sized,
    {
        // First slot whose item is strictly greater than `item`.
        let index = self.0.partition_point(|other| !less.less(item, other));
        if index > 0 && !less.less(&self.0[index - 1], item) {
            (index - 1, true)
        } else {
            (index, false)
        }
    }
}

impl<A: Array> Deref for Seq<A> {
    type Target = [A::Item];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<A: Array> DerefMut for Seq<A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<A: Array> Extend<A::Item> for Seq<A> {
    fn extend<I: IntoIterator<Item = A::Item>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
