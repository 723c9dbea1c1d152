use alloc::sync::Arc;
use core::mem;
use core::ops::ControlFlow;

use super::cow::WriteContext;
use super::seq::Seq;
use crate::comparator::Comparator;

/// The degree of a tree built without an explicit one.
pub const DEFAULT_DEGREE: usize = 9;

// Nodes of a default-degree tree never spill onto the heap.
const INLINE_ITEMS: usize = 2 * DEFAULT_DEGREE - 1;

pub(crate) type Items<T> = Seq<[T; INLINE_ITEMS]>;
pub(crate) type Children<T> = Seq<[Arc<Node<T>>; INLINE_ITEMS + 1]>;

/// A B-tree node.
///
/// At all times either `children` is empty (a leaf, any number of items), or
/// `children.len() == items.len() + 1` (an internal node), and `items[i]`
/// orders strictly between the subtrees `children[i]` and `children[i + 1]`.
pub(crate) struct Node<T> {
    pub(crate) items: Items<T>,
    pub(crate) children: Children<T>,
    cow: Option<WriteContext<T>>,
}

/// What a call to [`Node::remove`] takes out of a subtree.
#[derive(Debug)]
pub(crate) enum Removal<'k, T> {
    /// The item equivalent to the given one.
    Item(&'k T),
    /// The smallest item.
    Min,
    /// The largest item.
    Max,
}

impl<T> Clone for Removal<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Removal<'_, T> {}

/// Traversal order of [`Node::iterate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Ascend,
    Descend,
}

/// Bounds of a range scan; `None` means unbounded.
pub(crate) struct Bounds<'k, T> {
    pub(crate) start: Option<&'k T>,
    pub(crate) stop: Option<&'k T>,
    /// Emit an item equal to `start` instead of skipping it.
    pub(crate) include_start: bool,
}

impl<T> Bounds<'_, T> {
    pub(crate) fn unbounded() -> Self {
        Self {
            start: None,
            stop: None,
            include_start: false,
        }
    }
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Items::new(),
            children: Children::new(),
            cow: None,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn cow(&self) -> Option<&WriteContext<T>> {
        self.cow.as_ref()
    }

    pub(crate) fn stamp(&mut self, cow: WriteContext<T>) {
        self.cow = Some(cow);
    }

    /// Drops all contents and the ownership stamp so the node can be pooled.
    pub(crate) fn reset(&mut self) {
        self.items.truncate(0);
        self.children.truncate(0);
        self.cow = None;
    }

    pub(crate) fn is_cleared(&self) -> bool {
        self.items.is_empty() && self.children.is_empty() && self.cow.is_none()
    }

    /// Number of cursor positions in this node: one per item, plus one per
    /// child for internal nodes.
    #[inline]
    pub(crate) fn positions(&self) -> usize {
        self.items.len() + self.children.len()
    }

    /// Returns the item equivalent to `key` in this subtree.
    pub(crate) fn get<C>(&self, key: &T, less: &C) -> Option<&T>
    where
        C: Comparator<T> + ?Sized,
    {
        let mut node = self;
        loop {
            let (index, found) = node.items.find(key, less);
            if found {
                return Some(&node.items[index]);
            }
            if node.is_leaf() {
                return None;
            }
            node = &node.children[index];
        }
    }

    /// Returns the smallest item in this subtree.
    pub(crate) fn min(&self) -> Option<&T> {
        let mut node = self;
        while let Some(first) = node.children.first() {
            node = first;
        }
        node.items.first()
    }

    /// Returns the largest item in this subtree.
    pub(crate) fn max(&self) -> Option<&T> {
        let mut node = self;
        while let Some(last) = node.children.last() {
            node = last;
        }
        node.items.last()
    }

    /// Number of levels below and including this node.
    pub(crate) fn height(&self) -> usize {
        let mut node = self;
        let mut height = 1;
        while let Some(first) = node.children.first() {
            node = first;
            height += 1;
        }
        height
    }

    /// Visits the items of this subtree within `bounds`, in `direction` order.
    ///
    /// `hit` records whether an item at or past the start bound has already
    /// been reached. Returns `Break` as soon as `visit` returns `false` or the
    /// stop bound is reached.
    pub(crate) fn iterate<C, F>(
        &self,
        direction: Direction,
        bounds: &Bounds<'_, T>,
        mut hit: bool,
        visit: &mut F,
        less: &C,
    ) -> ControlFlow<(), bool>
    where
        C: Comparator<T> + ?Sized,
        F: FnMut(&T) -> bool,
    {
        match direction {
            Direction::Ascend => {
                for (index, item) in self.items.iter().enumerate() {
                    if bounds.start.is_some_and(|start| less.less(item, start)) {
                        continue;
                    }
                    if !self.is_leaf() {
                        hit = self.children[index].iterate(direction, bounds, hit, visit, less)?;
                    }
                    if !bounds.include_start && !hit && bounds.start.is_some_and(|start| !less.less(start, item)) {
                        hit = true;
                        continue;
                    }
                    hit = true;
                    if bounds.stop.is_some_and(|stop| !less.less(item, stop)) {
                        return ControlFlow::Break(());
                    }
                    if !visit(item) {
                        return ControlFlow::Break(());
                    }
                }
                if let Some(last) = self.children.last() {
                    hit = last.iterate(direction, bounds, hit, visit, less)?;
                }
            }
            Direction::Descend => {
                for (index, item) in self.items.iter().enumerate().rev() {
                    if let Some(start) = bounds.start
                        && !less.less(item, start)
                        && (!bounds.include_start || hit || less.less(start, item))
                    {
                        continue;
                    }
                    if !self.is_leaf() {
                        self.children[index + 1].iterate(direction, bounds, hit, visit, less)?;
                    }
                    if bounds.stop.is_some_and(|stop| !less.less(stop, item)) {
                        return ControlFlow::Break(());
                    }
                    hit = true;
                    if !visit(item) {
                        return ControlFlow::Break(());
                    }
                }
                if let Some(first) = self.children.first() {
                    hit = first.iterate(direction, bounds, hit, visit, less)?;
                }
            }
        }
        ControlFlow::Continue(hit)
    }
}

impl<T: Clone> Node<T> {
    /// Overwrites this node's contents with a shallow copy of `source`.
    ///
    /// Items are cloned; children are shared, not copied.
    pub(crate) fn copy_from(&mut self, source: &Node<T>) {
        self.items.clone_from_slice(&source.items);
        self.children.clone_from_slice(&source.children);
    }

    /// Splits this node at `index`.
    ///
    /// This node keeps the items before `index`; the item at `index` is
    /// returned along with a new node holding everything after it.
    pub(crate) fn split(&mut self, index: usize, cx: &WriteContext<T>) -> (T, Arc<Node<T>>) {
        let mut tail_items = self.items.split_off(index + 1);
        let pivot = self.items.pop();
        let mut tail_children = if self.is_leaf() {
            Children::new()
        } else {
            self.children.split_off(index + 1)
        };
        let next = cx.new_node_with(|next| {
            next.items.append(&mut tail_items);
            next.children.append(&mut tail_children);
        });
        (pivot, next)
    }

    /// Splits child `index` if it is full, hoisting its middle item into this
    /// node. Returns whether a split happened.
    fn maybe_split_child(&mut self, index: usize, max_items: usize, cx: &WriteContext<T>) -> bool {
        if self.children[index].items.len() < max_items {
            return false;
        }
        let first = cx.mutable(&mut self.children[index]);
        let (pivot, second) = first.split(max_items / 2, cx);
        self.items.insert_at(index, pivot);
        self.children.insert_at(index + 1, second);
        true
    }

    /// Inserts `item` into this subtree, replacing and returning an equivalent
    /// item if one exists.
    ///
    /// Full children are split before descending into them, so no node on the
    /// way down ever exceeds `max_items`. The caller guarantees that this node
    /// itself is not full.
    pub(crate) fn insert<C>(&mut self, item: T, max_items: usize, less: &C, cx: &WriteContext<T>) -> Option<T>
    where
        C: Comparator<T> + ?Sized,
    {
        let (mut index, found) = self.items.find(&item, less);
        if found {
            return Some(mem::replace(&mut self.items[index], item));
        }
        if self.is_leaf() {
            self.items.insert_at(index, item);
            return None;
        }
        if self.maybe_split_child(index, max_items, cx) {
            let in_tree = &self.items[index];
            if less.less(&item, in_tree) {
                // The new item belongs in the first half.
            } else if less.less(in_tree, &item) {
                index += 1;
            } else {
                return Some(mem::replace(&mut self.items[index], item));
            }
        }
        cx.mutable(&mut self.children[index]).insert(item, max_items, less, cx)
    }

    /// Removes `target` from this subtree, rebalancing on the way down so that
    /// every node left behind keeps at least `min_items` items.
    pub(crate) fn remove<C>(
        &mut self,
        target: Removal<'_, T>,
        min_items: usize,
        less: &C,
        cx: &WriteContext<T>,
    ) -> Option<T>
    where
        C: Comparator<T> + ?Sized,
    {
        let mut found = false;
        let index = match target {
            Removal::Max => {
                if self.is_leaf() {
                    return (!self.items.is_empty()).then(|| self.items.pop());
                }
                self.items.len()
            }
            Removal::Min => {
                if self.is_leaf() {
                    return (!self.items.is_empty()).then(|| self.items.remove_at(0));
                }
                0
            }
            Removal::Item(item) => {
                let (index, in_node) = self.items.find(item, less);
                if self.is_leaf() {
                    return in_node.then(|| self.items.remove_at(index));
                }
                found = in_node;
                index
            }
        };

        if self.children[index].items.len() <= min_items {
            return self.grow_child_and_remove(index, target, min_items, less, cx);
        }

        let child = cx.mutable(&mut self.children[index]);
        if found {
            // Child `index` holds more than `min_items` items, so it can give up
            // its largest one as the in-order predecessor of `items[index]`.
            let predecessor = child
                .remove(Removal::Max, min_items, less, cx)
                .expect("`Node::remove()` - left subtree has no predecessor!");
            return Some(mem::replace(&mut self.items[index], predecessor));
        }
        child.remove(target, min_items, less, cx)
    }

    /// Grows child `index` above `min_items` by stealing from a sibling or
    /// merging with one, then retries the removal at this node.
    fn grow_child_and_remove<C>(
        &mut self,
        index: usize,
        target: Removal<'_, T>,
        min_items: usize,
        less: &C,
        cx: &WriteContext<T>,
    ) -> Option<T>
    where
        C: Comparator<T> + ?Sized,
    {
        if index > 0 && self.children[index - 1].items.len() > min_items {
            self.steal_from_left(index, cx);
        } else if index < self.items.len() && self.children[index + 1].items.len() > min_items {
            self.steal_from_right(index, cx);
        } else {
            let index = if index >= self.items.len() { index - 1 } else { index };
            self.merge_children(index, cx);
        }
        self.remove(target, min_items, less, cx)
    }

    /// Rotates the last item of child `index - 1` through the parent separator
    /// into the front of child `index`.
    fn steal_from_left(&mut self, index: usize, cx: &WriteContext<T>) {
        let left = cx.mutable(&mut self.children[index - 1]);
        let stolen = left.items.pop();
        let stolen_child = (!left.is_leaf()).then(|| left.children.pop());

        let separator = mem::replace(&mut self.items[index - 1], stolen);
        let child = cx.mutable(&mut self.children[index]);
        child.items.insert_at(0, separator);
        if let Some(grandchild) = stolen_child {
            child.children.insert_at(0, grandchild);
        }
    }

    /// Rotates the first item of child `index + 1` through the parent separator
    /// onto the end of child `index`.
    fn steal_from_right(&mut self, index: usize, cx: &WriteContext<T>) {
        let right = cx.mutable(&mut self.children[index + 1]);
        let stolen = right.items.remove_at(0);
        let stolen_child = (!right.is_leaf()).then(|| right.children.remove_at(0));

        let separator = mem::replace(&mut self.items[index], stolen);
        let child = cx.mutable(&mut self.children[index]);
        child.items.push(separator);
        if let Some(grandchild) = stolen_child {
            child.children.push(grandchild);
        }
    }

    /// Folds separator `index` and child `index + 1` into child `index`.
    fn merge_children(&mut self, index: usize, cx: &WriteContext<T>) {
        let separator = self.items.remove_at(index);
        let mut sibling = self.children.remove_at(index + 1);
        let child = cx.mutable(&mut self.children[index]);
        child.items.push(separator);
        match Arc::get_mut(&mut sibling) {
            Some(owned) => {
                child.items.append(&mut owned.items);
                child.children.append(&mut owned.children);
            }
            None => {
                child.items.extend(sibling.items.iter().cloned());
                child.children.extend(sibling.children.iter().cloned());
            }
        }
        tracing::trace!(index, items = child.items.len(), "merged sibling nodes");
        cx.free_node(sibling);
    }
}
