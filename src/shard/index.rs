use crate::{
    error::{Error, Result},
    memory_manager::MemoryManager,
    types::VId,
};
use std::mem::size_of;
use std::path::Path;

/// A sampled checkpoint into the pointer region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexEntry {
    /// The vertex id of the sampled pointer record.
    pub vertex: VId,
    /// The position of that record in the pointer region.
    pub vertex_seq: usize,
    /// The byte offset of the vertex's out-edges in the adjacency region.
    pub file_offset: u64,
}

/// A coarse lookup into the pointer region.
///
/// Entries returned never overshoot: callers scan forward from them.
pub trait SparseIndex {
    /// Returns the closest entry with `entry.vertex <= vid`.
    fn lookup(&self, vid: VId) -> IndexEntry;

    /// Returns the closest entry with `entry.file_offset <= byte_offset`.
    fn lookup_by_offset(&self, byte_offset: u64) -> IndexEntry;
}

/// The sparse index stored next to the adjacency file.
///
/// ```text
/// +------------------+------------------+------------------+
/// |    vertex: u64   |  vertex_seq: u64 | file_offset: u64 |   ...
/// +------------------+------------------+------------------+
/// ```
#[derive(Debug, Default)]
pub struct ShardIndex {
    entries: Vec<IndexEntry>,
}

const ENTRY_SIZE: usize = 3 * size_of::<u64>();

impl ShardIndex {
    /// Creates an index from entries sorted by both vertex and file offset.
    pub fn new(entries: Vec<IndexEntry>) -> Result<Self> {
        for (i, pair) in entries.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.vertex > next.vertex
                || prev.vertex_seq > next.vertex_seq
                || prev.file_offset > next.file_offset
            {
                return Err(Error::Format(format!(
                    "index entry {} is out of order: {:?} > {:?}",
                    i + 1,
                    prev,
                    next
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mm = MemoryManager::new_mmap(path)?;
        if mm.len() % ENTRY_SIZE != 0 {
            return Err(Error::Format(format!(
                "{}: {} bytes is not a multiple of {}",
                path.display(),
                mm.len(),
                ENTRY_SIZE
            )));
        }
        let entries = (0..mm.len() / ENTRY_SIZE)
            .filter_map(|i| {
                Some(IndexEntry {
                    vertex: mm.read_u64(3 * i)?,
                    vertex_seq: mm.read_u64(3 * i + 1)? as usize,
                    file_offset: mm.read_u64(3 * i + 2)?,
                })
            })
            .collect();
        ShardIndex::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn floor<F: Fn(&IndexEntry) -> bool>(&self, not_after: F) -> IndexEntry {
        match self.entries.partition_point(not_after) {
            0 => IndexEntry::default(),
            idx => self.entries[idx - 1],
        }
    }
}

impl SparseIndex for ShardIndex {
    fn lookup(&self, vid: VId) -> IndexEntry {
        self.floor(|entry| entry.vertex <= vid)
    }

    fn lookup_by_offset(&self, byte_offset: u64) -> IndexEntry {
        self.floor(|entry| entry.file_offset <= byte_offset)
    }
}
