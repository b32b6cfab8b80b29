//! Read-only shards and the neighbor queries answered from them.

pub use callback::{NeighborCollector, Neighbors, QueryCallback};
pub use index::{IndexEntry, ShardIndex, SparseIndex};
pub use store::{ShardStore, END};

mod callback;
mod index;
mod store;
