use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported while configuring a [`BTree`](crate::BTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested degree cannot form a B-tree.
    ///
    /// A degree `d` allows `d - 1 ..= 2 * d - 1` items per node, so it must be
    /// at least 2 and small enough for `2 * d` not to overflow.
    #[error("invalid B-tree degree {0}: must be at least 2 and at most usize::MAX / 2")]
    InvalidDegree(usize),
}
