use core::fmt;
use core::iter::FusedIterator;

use super::BTree;
use crate::comparator::Natural;
use crate::cursor::Cursor;

/// An iterator over the items of a [`BTree`], in order.
///
/// This `struct` is created by the [`iter`] method on [`BTree`].
/// See its documentation for more.
///
/// [`iter`]: BTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, C = Natural> {
    front: Cursor<'a, T, C>,
    back: Cursor<'a, T, C>,
    remaining: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(super) fn new(tree: &'a BTree<T, C>) -> Self {
        Self {
            front: tree.cursor(),
            back: tree.cursor(),
            remaining: tree.len(),
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.front.is_positioned() {
            self.front.next()
        } else {
            self.front.first()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.back.is_positioned() {
            self.back.prev()
        } else {
            self.back.last()
        }
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use pretty_assertions::assert_eq;

    use super::*;

    fn build(degree: usize, items: impl IntoIterator<Item = u32>) -> BTree<u32> {
        let mut tree = BTree::builder().degree(degree).build().expect("valid degree");
        tree.extend(items);
        tree
    }

    #[test]
    fn forward_and_backward() {
        let tree = build(2, (0..300).rev());
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (0..300).collect::<Vec<_>>());
        assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), (0..300).rev().collect::<Vec<_>>());
    }

    #[test]
    fn ends_meet_in_the_middle() {
        let tree = build(3, 0..101);
        let mut iter = tree.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        loop {
            match iter.next() {
                Some(&item) => front.push(item),
                None => break,
            }
            match iter.next_back() {
                Some(&item) => back.push(item),
                None => break,
            }
        }
        assert_eq!(front, (0..=50).collect::<Vec<_>>());
        assert_eq!(back, (51..101).rev().collect::<Vec<_>>());
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn exact_size() {
        let tree = build(2, 0..10);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), 8);
        assert_eq!(iter.size_hint(), (8, Some(8)));
        assert_eq!(iter.clone().last(), Some(&8));
    }

    #[test]
    fn empty() {
        let tree = build(2, []);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(alloc::format!("{:?}", tree.iter()), "[]");
    }

    #[test]
    fn into_iterator_for_reference() {
        let tree = build(2, [3, 1, 2]);
        let mut seen = Vec::new();
        for item in &tree {
            seen.push(*item);
        }
        assert_eq!(seen, [1, 2, 3]);
    }
}
