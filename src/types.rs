//! Various types shared by the shard readers.

use derive_more::Display;

/// The vertex id type.
pub type VId = u64;

/// The edge type tag stored in the low bits of an edge packet.
pub type EdgeType = u8;

/// The contiguous range of internal vertex ids owned by one shard.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display(fmt = "[{}, {}]", first, last)]
pub struct ShardInterval {
    first: VId,
    last: VId,
}

impl ShardInterval {
    pub fn new(first: VId, last: VId) -> Self {
        Self { first, last }
    }

    pub fn first(&self) -> VId {
        self.first
    }

    pub fn last(&self) -> VId {
        self.last
    }

    pub fn contains(&self, vid: VId) -> bool {
        self.first <= vid && vid <= self.last
    }

    /// Returns the number of vertex ids in the interval.
    pub fn len(&self) -> usize {
        if self.last < self.first {
            0
        } else {
            (self.last - self.first).saturating_add(1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
