use alloc::boxed::Box;
use core::fmt;

use crate::btree::BTree;
use crate::comparator::Comparator;

/// A byte-string key with a byte-string value.
///
/// Pairs are ordered by key alone when stored in a [`PairTree`], so looking up
/// a pair only needs its key; see [`Pair::key_only`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Pair {
    key: Box<[u8]>,
    value: Box<[u8]>,
}

impl Pair {
    /// Creates a pair by copying `key` and `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairtree::Pair;
    ///
    /// let pair = Pair::new("name", b"ada");
    /// assert_eq!(pair.key(), b"name");
    /// assert_eq!(pair.value(), b"ada");
    /// ```
    #[must_use]
    pub fn new(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().into(),
            value: value.as_ref().into(),
        }
    }

    /// Creates a pair with an empty value, for lookups by key.
    #[must_use]
    pub fn key_only(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().into(),
            value: Box::default(),
        }
    }

    /// The bytes the pair is ordered by.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The payload, empty for pairs made with [`Pair::key_only`].
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Consumes the pair, returning its key and value.
    #[must_use]
    pub fn into_parts(self) -> (Box<[u8]>, Box<[u8]>) {
        (self.key, self.value)
    }
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("key", &self.key.escape_ascii().to_string())
            .field("value", &self.value.escape_ascii().to_string())
            .finish()
    }
}

/// Orders [`Pair`]s by key, bytewise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ByKey;

impl Comparator<Pair> for ByKey {
    #[inline]
    fn less(&self, a: &Pair, b: &Pair) -> bool {
        a.key < b.key
    }
}

/// A tree of [`Pair`]s keyed by their byte-string keys.
///
/// # Examples
///
/// ```
/// use pairtree::{Pair, PairTree};
///
/// let mut tree = PairTree::new();
/// tree.replace_or_insert(Pair::new("b", "2"));
/// tree.replace_or_insert(Pair::new("a", "1"));
///
/// let old = tree.replace_or_insert(Pair::new("a", "one"));
/// assert_eq!(old.map(|pair| pair.value().to_vec()), Some(b"1".to_vec()));
///
/// let keys: Vec<_> = tree.iter().map(|pair| pair.key().to_vec()).collect();
/// assert_eq!(keys, [b"a".to_vec(), b"b".to_vec()]);
/// ```
pub type PairTree = BTree<Pair, ByKey>;
