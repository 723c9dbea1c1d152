use super::BTree;
use crate::comparator::Comparator;
use crate::raw::{Bounds, Direction};

/// Range scans.
///
/// Each scan hands items to `visit` in order until the range is exhausted or
/// `visit` returns `false`.
impl<T, C: Comparator<T>> BTree<T, C> {
    /// Calls `visit` for every item in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let tree: BTree<_> = (1..=10).collect();
    /// let mut seen = Vec::new();
    /// tree.ascend(|&item| {
    ///     seen.push(item);
    ///     item < 3
    /// });
    /// assert_eq!(seen, [1, 2, 3]);
    /// ```
    pub fn ascend<F>(&self, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.scan(Direction::Ascend, Bounds::unbounded(), visit);
    }

    /// Calls `visit` for every item in `[greater_or_equal, less_than)`, in
    /// ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let tree: BTree<_> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// tree.ascend_range(&3, &6, |&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [3, 4, 5]);
    /// ```
    pub fn ascend_range<F>(&self, greater_or_equal: &T, less_than: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: Some(greater_or_equal),
            stop: Some(less_than),
            include_start: true,
        };
        self.scan(Direction::Ascend, bounds, visit);
    }

    /// Calls `visit` for every item in `[first, pivot)`, in ascending order.
    pub fn ascend_less_than<F>(&self, pivot: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: None,
            stop: Some(pivot),
            include_start: false,
        };
        self.scan(Direction::Ascend, bounds, visit);
    }

    /// Calls `visit` for every item in `[pivot, last]`, in ascending order.
    pub fn ascend_greater_or_equal<F>(&self, pivot: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: Some(pivot),
            stop: None,
            include_start: true,
        };
        self.scan(Direction::Ascend, bounds, visit);
    }

    /// Calls `visit` for every item in descending order.
    pub fn descend<F>(&self, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.scan(Direction::Descend, Bounds::unbounded(), visit);
    }

    /// Calls `visit` for every item `x` with `greater_than < x <= less_or_equal`,
    /// in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::BTree;
    ///
    /// let tree: BTree<_> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// tree.descend_range(&6, &3, |&item| {
    ///     seen.push(item);
    ///     true
    /// });
    /// assert_eq!(seen, [6, 5, 4]);
    /// ```
    pub fn descend_range<F>(&self, less_or_equal: &T, greater_than: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: Some(less_or_equal),
            stop: Some(greater_than),
            include_start: true,
        };
        self.scan(Direction::Descend, bounds, visit);
    }

    /// Calls `visit` for every item in `[pivot, first]`, in descending order.
    pub fn descend_less_or_equal<F>(&self, pivot: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: Some(pivot),
            stop: None,
            include_start: true,
        };
        self.scan(Direction::Descend, bounds, visit);
    }

    /// Calls `visit` for every item in `(pivot, last]`, in descending order.
    pub fn descend_greater_than<F>(&self, pivot: &T, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let bounds = Bounds {
            start: None,
            stop: Some(pivot),
            include_start: false,
        };
        self.scan(Direction::Descend, bounds, visit);
    }

    fn scan<F>(&self, direction: Direction, bounds: Bounds<'_, T>, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        if let Some(root) = self.root() {
            // `Break` only means the scan stopped early.
            let _ = root.iterate(direction, &bounds, false, &mut visit, &self.less);
        }
    }
}
