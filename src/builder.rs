use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use crate::btree::BTree;
use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::raw::{DEFAULT_DEGREE, DEFAULT_FREE_LIST_SIZE, FreeList};

/// The smallest degree that still forms a B-tree (a 2-3-4 tree).
pub const MIN_DEGREE: usize = 2;

/// Configures and builds a [`BTree`].
///
/// # Examples
///
/// ```
/// use pairtree::BTree;
///
/// // A 2-3-4 tree: every node holds 1 to 3 items.
/// let mut tree: BTree<u32> = BTree::builder().degree(2).free_list_capacity(8).build()?;
/// for i in 1..=7 {
///     tree.replace_or_insert(i);
/// }
/// assert_eq!(tree.height(), 2);
/// # Ok::<(), pairtree::Error>(())
/// ```
///
/// An invalid degree is reported instead of producing a broken tree:
///
/// ```
/// use pairtree::{BTree, Error};
///
/// let result = BTree::<u32>::builder().degree(1).build();
/// assert_eq!(result.err(), Some(Error::InvalidDegree(1)));
/// ```
pub struct Builder<T, C = Natural> {
    degree: usize,
    free_list: Option<Arc<FreeList<T>>>,
    free_list_capacity: usize,
    less: C,
    marker: PhantomData<fn() -> T>,
}

impl<T, C> Builder<T, C> {
    /// Starts a configuration with the default degree and a private free list.
    #[must_use]
    pub fn new(less: C) -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            free_list: None,
            free_list_capacity: DEFAULT_FREE_LIST_SIZE,
            less,
            marker: PhantomData,
        }
    }

    /// Sets the degree: non-root nodes hold `degree - 1 ..= 2 * degree - 1` items.
    #[must_use]
    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Sets the capacity of the tree's private free list.
    ///
    /// Ignored when a shared free list is supplied with [`Builder::free_list`].
    #[must_use]
    pub fn free_list_capacity(mut self, capacity: usize) -> Self {
        self.free_list_capacity = capacity;
        self
    }

    /// Allocates nodes from a free list shared with other trees.
    #[must_use]
    pub fn free_list(mut self, free_list: Arc<FreeList<T>>) -> Self {
        self.free_list = Some(free_list);
        self
    }

    /// Replaces the comparator.
    #[must_use]
    pub fn comparator<D>(self, less: D) -> Builder<T, D> {
        Builder {
            degree: self.degree,
            free_list: self.free_list,
            free_list_capacity: self.free_list_capacity,
            less,
            marker: PhantomData,
        }
    }

    /// Validates the configuration and creates an empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`] if the degree is below [`MIN_DEGREE`]
    /// or so large that `2 * degree` overflows.
    pub fn build(self) -> Result<BTree<T, C>>
    where
        C: Comparator<T>,
    {
        if self.degree < MIN_DEGREE || self.degree > usize::MAX / 2 {
            return Err(Error::InvalidDegree(self.degree));
        }
        let free_list = self.free_list.unwrap_or_else(|| Arc::new(FreeList::new(self.free_list_capacity)));
        Ok(BTree::from_parts(self.degree, self.less, free_list))
    }
}

impl<T, C: Default> Default for Builder<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<T, C> fmt::Debug for Builder<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("degree", &self.degree)
            .field("shared_free_list", &self.free_list.is_some())
            .field("free_list_capacity", &self.free_list_capacity)
            .finish_non_exhaustive()
    }
}
