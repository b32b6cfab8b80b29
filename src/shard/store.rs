use super::{
    callback::{Neighbors, QueryCallback},
    index::{ShardIndex, SparseIndex},
};
use crate::{
    error::{Error, Result},
    filenames::{adjacency_path, in_edge_starts_path, index_path, load_intervals, pointers_path},
    memory_manager::MemoryManager,
    packet::{EdgePacket, AUX_CHAIN_END},
    types::{ShardInterval, VId},
};
use itertools::Itertools;
use log::{debug, info};
use std::cmp::Ordering;
use std::mem::size_of;
use std::path::Path;
use std::time::Instant;

/// The in-edge start index value of a vertex without in-edges.
pub const END: i32 = (1 << 30) - 1;

/// One shard of the graph, answering neighbor queries straight from its files.
///
/// ```text
/// pointers:    +-------------+-------------+-----+-------------+----------+
///              | (v0, aux0)  | (v1, aux1)  | ... | (vk, auxk)  | (_, end) |
///              +------+------+------+------+-----+-------------+----------+
///                     |             |
///                     v             v
/// adjacency:   +------+-----+------+------+-----+------+-------+
///              | out-edges of v0    | out-edges of v1 | ...   |
///              +-------------+-------------+-----+------+-------+
///                     ^  aux chains link the in-edges of a vertex
///                     |
/// in-edge starts: one i32 per vertex of the interval, END if none
/// ```
///
/// Every region is read-only, and queries thread explicit offsets through
/// them, so a store can be shared between threads.
pub struct ShardStore<I = ShardIndex> {
    shard_num: usize,
    interval: ShardInterval,
    adjacency: MemoryManager,
    pointers: MemoryManager,
    in_edge_starts: MemoryManager,
    index: I,
}

impl ShardStore<ShardIndex> {
    /// Maps the files of shard `shard_num` of the graph stored under `base`.
    pub fn open<P: AsRef<Path>>(base: P, shard_num: usize, num_shards: usize) -> Result<Self> {
        let base = base.as_ref();
        if shard_num >= num_shards {
            return Err(Error::Format(format!(
                "shard {} out of {} shards",
                shard_num, num_shards
            )));
        }
        let interval = load_intervals(base, num_shards)?[shard_num];
        let adj_path = adjacency_path(base, shard_num, num_shards);
        let adjacency = MemoryManager::new_mmap(&adj_path)?;
        let pointers = MemoryManager::new_mmap(pointers_path(&adj_path))?;
        let in_edge_starts = MemoryManager::new_mmap(in_edge_starts_path(&adj_path))?;
        let index = ShardIndex::load(index_path(&adj_path))?;
        let store =
            ShardStore::from_parts(shard_num, interval, adjacency, pointers, in_edge_starts, index)?;
        info!(
            "opened shard {}/{}: interval={} num_vertices={} num_edges={} index_len={}",
            shard_num,
            num_shards,
            interval,
            store.num_vertices(),
            store.num_edges(),
            store.index.len()
        );
        Ok(store)
    }
}

impl<I: SparseIndex> ShardStore<I> {
    pub fn from_parts(
        shard_num: usize,
        interval: ShardInterval,
        adjacency: MemoryManager,
        pointers: MemoryManager,
        in_edge_starts: MemoryManager,
        index: I,
    ) -> Result<Self> {
        check_records("adjacency", &adjacency, size_of::<u64>())?;
        check_records("pointer", &pointers, size_of::<u64>())?;
        check_records("in-edge start", &in_edge_starts, size_of::<i32>())?;
        if in_edge_starts.num_i32s() < interval.len() {
            return Err(Error::Format(format!(
                "{} in-edge starts for interval {}",
                in_edge_starts.num_i32s(),
                interval
            )));
        }
        Ok(Self {
            shard_num,
            interval,
            adjacency,
            pointers,
            in_edge_starts,
            index,
        })
    }

    pub fn shard_num(&self) -> usize {
        self.shard_num
    }

    pub fn interval(&self) -> ShardInterval {
        self.interval
    }

    /// Returns the number of vertices with out-edges in this shard.
    pub fn num_vertices(&self) -> usize {
        self.pointers.num_u64s().saturating_sub(1)
    }

    /// Returns the number of edge records, deleted ones included.
    pub fn num_edges(&self) -> usize {
        self.adjacency.num_u64s()
    }

    /// Answers the out-neighbors of every vertex in `ids`.
    ///
    /// The callback receives each distinct id exactly once, in ascending order,
    /// with an empty list for ids that have no out-edges in this shard.
    pub fn query_out<T, C>(&self, ids: T, callback: &mut C) -> Result<()>
    where
        T: IntoIterator<Item = VId>,
        C: QueryCallback + ?Sized,
    {
        let time_start = Instant::now();
        let ids = ids.into_iter().sorted().dedup().collect_vec();
        let immediate = callback.immediate_receive();
        let mut cursor = 0;
        for &vid in &ids {
            let entry = self.index.lookup(vid);
            if entry.vertex_seq > self.num_vertices() {
                return Err(Error::Corrupt(format!(
                    "index entry {:?} points past {} pointer records",
                    entry,
                    self.num_vertices()
                )));
            }
            let (found, stop) = self.find_pointer(vid, entry.vertex_seq.max(cursor))?;
            cursor = stop;
            let neighbors = match found {
                Some(seq) => self.out_neighbors(seq)?,
                None => Neighbors::default(),
            };
            if immediate {
                for i in 0..neighbors.len() {
                    callback.receive_edge(
                        vid,
                        neighbors.ids[i],
                        neighbors.edge_types[i],
                        neighbors.data_pointers[i],
                    );
                }
            }
            callback.receive_out_neighbors(vid, neighbors);
        }
        debug!(
            "shard {}: query_out of {} ids took {:?}",
            self.shard_num,
            ids.len(),
            time_start.elapsed()
        );
        Ok(())
    }

    /// Answers the in-neighbors of `vid` with a single callback.
    pub fn query_in<C>(&self, vid: VId, callback: &mut C) -> Result<()>
    where
        C: QueryCallback + ?Sized,
    {
        if !self.interval.contains(vid) {
            return Err(Error::OutOfInterval(vid, self.interval));
        }
        let time_start = Instant::now();
        let chain = self
            .in_edge_chain(vid)?
            .into_iter()
            .filter(|(_, edge)| !edge.is_deleted())
            .collect_vec();
        debug!(
            "shard {}: in-edge phase 1 of {} found {} edges in {:?}",
            self.shard_num,
            vid,
            chain.len(),
            time_start.elapsed()
        );
        let time_start = Instant::now();
        let offsets = chain.iter().map(|&(off, _)| off).collect_vec();
        let owners = self.resolve_owners(&offsets)?;
        debug!(
            "shard {}: in-edge phase 2 of {} took {:?}",
            self.shard_num,
            vid,
            time_start.elapsed()
        );
        let immediate = callback.immediate_receive();
        let mut neighbors = Neighbors::with_capacity(chain.len());
        for ((off, edge), src) in chain.into_iter().zip(owners) {
            if immediate {
                callback.receive_edge(src, vid, edge.edge_type(), off);
            }
            neighbors.push(src, edge.edge_type(), off);
        }
        callback.receive_in_neighbors(vid, neighbors);
        Ok(())
    }
}

// Private methods.
impl<I: SparseIndex> ShardStore<I> {
    fn pointer(&self, seq: usize) -> Result<EdgePacket> {
        self.pointers
            .read_u64(seq)
            .map(EdgePacket::from_raw)
            .ok_or_else(|| {
                Error::Corrupt(format!(
                    "pointer record {} past {} records",
                    seq,
                    self.pointers.num_u64s()
                ))
            })
    }

    fn edge(&self, off: u64) -> Result<EdgePacket> {
        self.adjacency
            .read_u64(off as usize)
            .map(EdgePacket::from_raw)
            .ok_or_else(|| {
                Error::Corrupt(format!(
                    "adjacency offset {} past {} records",
                    off,
                    self.num_edges()
                ))
            })
    }

    /// Scans the pointer records forward from `from` looking for `vid`.
    ///
    /// Returns the matching position, if any, and the position where the scan
    /// stopped. Records before the stop position all hold smaller ids.
    fn find_pointer(&self, vid: VId, from: usize) -> Result<(Option<usize>, usize)> {
        let num_vertices = self.num_vertices();
        let mut seq = from;
        while seq < num_vertices {
            match self.pointer(seq)?.vertex_id().cmp(&vid) {
                Ordering::Less => seq += 1,
                Ordering::Equal => return Ok((Some(seq), seq)),
                Ordering::Greater => return Ok((None, seq)),
            }
        }
        Ok((None, num_vertices))
    }

    fn out_neighbors(&self, seq: usize) -> Result<Neighbors> {
        let (begin, end) = (self.pointer(seq)?.aux(), self.pointer(seq + 1)?.aux());
        if end < begin {
            return Err(Error::Corrupt(format!(
                "pointer record {} decreases from {} to {}",
                seq + 1,
                begin,
                end
            )));
        }
        if end > self.num_edges() as u64 {
            return Err(Error::Corrupt(format!(
                "pointer record {} ends at {} past {} records",
                seq + 1,
                end,
                self.num_edges()
            )));
        }
        let mut neighbors = Neighbors::with_capacity((end - begin) as usize);
        for off in begin..end {
            let edge = self.edge(off)?;
            if !edge.is_deleted() {
                neighbors.push(edge.vertex_id(), edge.edge_type(), off);
            }
        }
        Ok(neighbors)
    }

    /// Follows the in-edge chain of `vid` and returns the offsets and records
    /// in chain order.
    fn in_edge_chain(&self, vid: VId) -> Result<Vec<(u64, EdgePacket)>> {
        let local = (vid - self.interval.first()) as usize;
        let head = self.in_edge_starts.read_i32(local).ok_or_else(|| {
            Error::Corrupt(format!("no in-edge start for local vertex {}", local))
        })?;
        let mut chain = Vec::new();
        let mut off = head as i64;
        while off != END as i64 {
            if off < 0 || off > END as i64 {
                return Err(Error::Corrupt(format!(
                    "in-edge offset {} of vertex {} is out of bounds",
                    off, vid
                )));
            }
            if chain.len() >= self.num_edges() {
                return Err(Error::Corrupt(format!(
                    "in-edge chain of vertex {} does not terminate",
                    vid
                )));
            }
            let edge = self.edge(off as u64)?;
            if edge.vertex_id() != vid {
                return Err(Error::Corrupt(format!(
                    "mismatch in edge linkage at {}: {} != {}",
                    off,
                    edge.vertex_id(),
                    vid
                )));
            }
            chain.push((off as u64, edge));
            off = match edge.aux() {
                AUX_CHAIN_END => END as i64,
                aux => aux as i64,
            };
        }
        Ok(chain)
    }

    /// Resolves every adjacency offset to the vertex whose out-edge run holds it.
    ///
    /// The pointer records are passed once in increasing offset order, so the
    /// offsets are visited sorted and the owners are written back in the
    /// original order.
    fn resolve_owners(&self, offsets: &[u64]) -> Result<Vec<VId>> {
        let order = (0..offsets.len())
            .sorted_by_key(|&i| offsets[i])
            .collect_vec();
        let first = match order.first() {
            Some(&i) => offsets[i],
            None => return Ok(vec![]),
        };
        let num_vertices = self.num_vertices();
        let mut owner = self
            .index
            .lookup_by_offset(first * size_of::<u64>() as u64)
            .vertex_seq;
        if owner >= num_vertices || self.pointer(owner)?.aux() > first {
            return Err(Error::Corrupt(format!(
                "no pointer record precedes adjacency offset {}",
                first
            )));
        }
        let mut owners = vec![0; offsets.len()];
        for i in order {
            let off = offsets[i];
            while self.pointer(owner + 1)?.aux() <= off {
                owner += 1;
                if owner >= num_vertices {
                    return Err(Error::Corrupt(format!(
                        "adjacency offset {} lies past the last pointer record",
                        off
                    )));
                }
            }
            owners[i] = self.pointer(owner)?.vertex_id();
        }
        Ok(owners)
    }
}

fn check_records(name: &str, mm: &MemoryManager, record_size: usize) -> Result<()> {
    if mm.len() % record_size == 0 {
        Ok(())
    } else {
        Err(Error::Format(format!(
            "{} region of {} bytes is not a multiple of {}",
            name,
            mm.len(),
            record_size
        )))
    }
}
