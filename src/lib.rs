//! An in-memory, copy-on-write B-Tree for Rust.
//!
//! This crate provides [`BTree`], an ordered collection of items whose order
//! comes from an injected [`Comparator`] rather than from the items themselves:
//!
//! - [`replace_or_insert`](BTree::replace_or_insert) - Upsert, handing back the replaced item
//! - [`delete`](BTree::delete), [`delete_min`](BTree::delete_min), [`delete_max`](BTree::delete_max)
//! - [`ascend_range`](BTree::ascend_range) and friends - Bounded scans in either direction
//! - [`cursor`](BTree::cursor) - Bidirectional walks with [`seek`](Cursor::seek)
//! - [`Clone`] in O(1) - Snapshots share nodes until either side writes to them
//!
//! # Example
//!
//! ```
//! use pairtree::{Pair, PairTree};
//!
//! let mut tree = PairTree::new();
//! tree.replace_or_insert(Pair::new("carol", "92"));
//! tree.replace_or_insert(Pair::new("alice", "100"));
//! tree.replace_or_insert(Pair::new("bob", "85"));
//!
//! // Take a snapshot before changing anything.
//! let before = tree.clone();
//! tree.delete(&Pair::key_only("bob"));
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(before.len(), 3);
//! assert!(before.has(&Pair::key_only("bob")));
//!
//! // Walk from the first key at or after "b".
//! let mut cursor = before.cursor();
//! assert_eq!(cursor.seek(&Pair::key_only("b")).map(Pair::key), Some(&b"bob"[..]));
//! assert_eq!(cursor.next().map(Pair::key), Some(&b"carol"[..]));
//! assert_eq!(cursor.next(), None);
//! ```
//!
//! # Features
//!
//! - **Copy-on-write snapshots** - Cloning is O(1); nodes are copied lazily on first write
//! - **Node recycling** - Retired nodes go to a bounded [`FreeList`], optionally shared between trees
//! - **Thread friendly** - Snapshots and trees sharing a free list can be mutated on different threads
//! - **Configurable** - Degree and free-list capacity via [`Builder`]
//!
//! # Implementation
//!
//! Items live in every node, as in a classic B-Tree. Inserts split full nodes on
//! the way down and deletes grow minimal nodes on the way down, so each operation
//! is a single root-to-leaf pass. Nodes are reference counted; a tree writes a
//! node in place only if the node is stamped with the tree's write context and
//! nobody else holds it.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Collections and `Arc` come from `alloc`; only `FreeList` needs `std` for its lock.
extern crate alloc;

mod btree;
mod builder;
mod comparator;
mod cursor;
mod error;
mod pair;
mod raw;

pub use btree::{BTree, Iter};
pub use builder::{Builder, MIN_DEGREE};
pub use comparator::{Comparator, Natural};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use pair::{ByKey, Pair, PairTree};
pub use raw::{DEFAULT_DEGREE, DEFAULT_FREE_LIST_SIZE, FreeList};
