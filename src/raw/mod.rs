mod cow;
mod free_list;
mod node;
mod seq;

pub(crate) use cow::WriteContext;
pub use free_list::{DEFAULT_FREE_LIST_SIZE, FreeList};
pub use node::DEFAULT_DEGREE;
pub(crate) use node::{Bounds, Direction, Node, Removal};
