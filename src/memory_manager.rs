use crate::error::{Error, Result};
use memmap::Mmap;
use std::convert::TryInto;
use std::fs::File;
use std::mem::size_of;
use std::path::Path;

/// A read-only memory mapped file.
pub struct MmapFile {
    mmap: Mmap,
}

impl MmapFile {
    fn len(&self) -> usize {
        self.mmap.len()
    }
}

/// A memory manager to hide the underlying type of a read-only region.
///
/// All multi-byte values are stored big-endian.
pub enum MemoryManager {
    /// A memory buffer.
    Mem(Vec<u8>),
    /// A read-only memory mapped buffer.
    Mmap(MmapFile),
}

impl MemoryManager {
    pub fn new_mem(bytes: Vec<u8>) -> Self {
        MemoryManager::Mem(bytes)
    }

    /// Maps the whole file read-only.
    ///
    /// An empty file cannot be mapped, so it becomes an empty buffer.
    pub fn new_mmap<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let len = file.metadata().map_err(|e| Error::io(path, e))?.len();
        if len == 0 {
            return Ok(MemoryManager::Mem(vec![]));
        }
        Ok(MemoryManager::Mmap(MmapFile {
            mmap: unsafe { Mmap::map(&file) }.map_err(|e| Error::io(path, e))?,
        }))
    }

    /// Builds a buffer holding `words` as big-endian `u64`s.
    pub fn from_u64s(words: &[u64]) -> Self {
        MemoryManager::Mem(words.iter().flat_map(|w| w.to_be_bytes()).collect())
    }

    /// Builds a buffer holding `values` as big-endian `i32`s.
    pub fn from_i32s(values: &[i32]) -> Self {
        MemoryManager::Mem(values.iter().flat_map(|v| v.to_be_bytes()).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            MemoryManager::Mem(vec) => vec.len(),
            MemoryManager::Mmap(mmapfile) => mmapfile.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MemoryManager::Mem(vec) => vec.as_slice(),
            MemoryManager::Mmap(mmapfile) => &mmapfile.mmap[..],
        }
    }

    /// Returns the number of whole `u64` words in the buffer.
    pub fn num_u64s(&self) -> usize {
        self.len() / size_of::<u64>()
    }

    /// Returns the number of whole `i32` values in the buffer.
    pub fn num_i32s(&self) -> usize {
        self.len() / size_of::<i32>()
    }

    /// Reads the `idx`-th `u64` word, or `None` past the end.
    pub fn read_u64(&self, idx: usize) -> Option<u64> {
        let pos = idx.checked_mul(size_of::<u64>())?;
        let bytes = self.as_bytes().get(pos..pos.checked_add(size_of::<u64>())?)?;
        Some(u64::from_be_bytes(bytes.try_into().ok()?))
    }

    /// Reads the `idx`-th `i32` value, or `None` past the end.
    pub fn read_i32(&self, idx: usize) -> Option<i32> {
        let pos = idx.checked_mul(size_of::<i32>())?;
        let bytes = self.as_bytes().get(pos..pos.checked_add(size_of::<i32>())?)?;
        Some(i32::from_be_bytes(bytes.try_into().ok()?))
    }
}
