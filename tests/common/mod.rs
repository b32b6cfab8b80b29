use itertools::Itertools;
use shardgraph::{
    filenames::{
        adjacency_path, in_edge_starts_path, index_path, intervals_path, pointers_path,
        translate_path,
    },
    packet::{EdgePacket, AUX_CHAIN_END},
    shard::END,
    translate::VertexIdTranslate,
    types::{EdgeType, ShardInterval, VId},
};
use std::path::Path;

pub type Edge = (VId, VId, EdgeType);

fn write_u64s<P: AsRef<Path>>(path: P, words: &[u64]) {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    std::fs::write(path, bytes).unwrap();
}

fn write_i32s<P: AsRef<Path>>(path: P, values: &[i32]) {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    std::fs::write(path, bytes).unwrap();
}

/// Writes the intervals file, which can only express intervals that start at
/// vertex 0 and follow each other without gaps.
pub fn write_intervals(base: &Path, intervals: &[ShardInterval]) {
    let mut first = 0;
    for interval in intervals {
        assert_eq!(interval.first(), first, "interval {} leaves a gap", interval);
        first = interval.last() + 1;
    }
    let text: String = intervals
        .iter()
        .map(|interval| format!("{}\n", interval.last()))
        .collect();
    std::fs::write(intervals_path(base, intervals.len()), text).unwrap();
}

pub fn write_translate(base: &Path, num_shards: usize, translate: &VertexIdTranslate) {
    std::fs::write(translate_path(base, num_shards), translate.to_string()).unwrap();
}

/// Writes the raw files of one shard.
pub fn write_shard(
    base: &Path,
    shard_num: usize,
    num_shards: usize,
    adjacency: &[u64],
    pointers: &[u64],
    starts: &[i32],
    index: &[(u64, u64, u64)],
) {
    let adj = adjacency_path(base, shard_num, num_shards);
    write_u64s(&adj, adjacency);
    write_u64s(pointers_path(&adj), pointers);
    write_i32s(in_edge_starts_path(&adj), starts);
    write_u64s(
        index_path(&adj),
        &index
            .iter()
            .flat_map(|&(vertex, seq, offset)| vec![vertex, seq, offset])
            .collect_vec(),
    );
}

/// Shards `edges` over `intervals` by destination, the way the preprocessor does.
///
/// In-edge chains are linked from the latest record back to the earliest, and
/// every `index_every`-th pointer record is sampled into the sparse index.
pub fn write_graph(base: &Path, intervals: &[ShardInterval], edges: &[Edge], index_every: usize) {
    write_intervals(base, intervals);
    for (shard_num, interval) in intervals.iter().enumerate() {
        let shard_edges = edges
            .iter()
            .filter(|(_, dst, _)| interval.contains(*dst))
            .copied()
            .sorted_by_key(|&(src, dst, _)| (src, dst))
            .collect_vec();
        let mut starts = vec![END; interval.len()];
        let mut adjacency = Vec::with_capacity(shard_edges.len());
        for (off, &(_, dst, edge_type)) in shard_edges.iter().enumerate() {
            let local = (dst - interval.first()) as usize;
            let aux = match starts[local] {
                END => AUX_CHAIN_END,
                next => next as u64,
            };
            starts[local] = off as i32;
            adjacency.push(EdgePacket::encode(edge_type, dst, aux).unwrap().raw());
        }
        let mut pointers = vec![];
        let mut index = vec![];
        let groups = shard_edges.iter().enumerate().group_by(|&(_, edge)| edge.0);
        for (seq, (src, group)) in groups.into_iter().enumerate() {
            let off = group.into_iter().next().unwrap().0 as u64;
            if seq % index_every == 0 {
                index.push((src, seq as u64, off * 8));
            }
            pointers.push(EdgePacket::encode(0, src, off).unwrap().raw());
        }
        pointers.push(EdgePacket::encode(0, 0, shard_edges.len() as u64).unwrap().raw());
        write_shard(
            base,
            shard_num,
            intervals.len(),
            &adjacency,
            &pointers,
            &starts,
            &index,
        );
    }
}

/// A small graph with multi-edges, self loops and vertices without edges.
pub fn create_edges(num_vertices: VId) -> Vec<Edge> {
    let mut edges = vec![];
    for v in 0..num_vertices {
        for k in 0..v % 5 {
            edges.push((v, (v * 7 + k * 13) % num_vertices, (k % 3) as EdgeType));
        }
    }
    edges.push((3, 3, 1));
    edges.push((3, 3, 2));
    edges
}
