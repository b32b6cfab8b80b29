//! Out-of-core neighbor queries over a horizontally sharded graph.

pub mod error;
pub mod filenames;
pub mod memory_manager;
pub mod packet;
pub mod shard;
pub mod translate;
pub mod types;
