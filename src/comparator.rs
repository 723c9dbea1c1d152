/// A strict weak ordering injected into a [`BTree`](crate::BTree).
///
/// The tree never looks inside its items; everything it knows about them comes
/// from `less`. Two items `a` and `b` are treated as the same key when neither
/// `less(a, b)` nor `less(b, a)` holds.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator:
///
/// ```
/// use pairtree::BTree;
///
/// let mut tree: BTree<i32, _> = BTree::with_comparator(|a: &i32, b: &i32| b < a);
/// tree.replace_or_insert(1);
/// tree.replace_or_insert(3);
/// tree.replace_or_insert(2);
///
/// assert_eq!(tree.min(), Some(&3));
/// assert_eq!(tree.max(), Some(&1));
/// ```
///
/// It is a logic error for the ordering to change while items are in the tree.
/// The resulting behavior is not specified, but will not result in undefined
/// behavior.
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Orders items by their [`Ord`] implementation.
///
/// This is the default comparator of [`BTree`](crate::BTree).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order() {
        assert!(Natural.less(&1, &2));
        assert!(!Natural.less(&2, &2));
        assert!(!Natural.less(&3, &2));
        assert!(Natural.less("abc", "abd"));
    }

    #[test]
    fn closures_are_comparators() {
        let by_len = |a: &&str, b: &&str| a.len() < b.len();
        assert!(by_len.less(&"ab", &"abc"));
        assert!(!by_len.less(&"abc", &"xyz"));
    }
}
