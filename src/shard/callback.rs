use crate::types::{EdgeType, VId};

/// The neighbors of one queried vertex.
///
/// The three vectors are parallel: `data_pointers[i]` is the adjacency word
/// offset of the edge to `ids[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub ids: Vec<VId>,
    pub edge_types: Vec<EdgeType>,
    pub data_pointers: Vec<u64>,
}

impl Neighbors {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            edge_types: Vec::with_capacity(capacity),
            data_pointers: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, id: VId, edge_type: EdgeType, data_pointer: u64) {
        self.ids.push(id);
        self.edge_types.push(edge_type);
        self.data_pointers.push(data_pointer);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Receives the results of shard queries.
pub trait QueryCallback {
    /// Whether every edge should also be streamed through
    /// [`receive_edge`](#method.receive_edge) as soon as it is decoded.
    fn immediate_receive(&self) -> bool {
        false
    }

    fn receive_out_neighbors(&mut self, vid: VId, neighbors: Neighbors);

    fn receive_in_neighbors(&mut self, vid: VId, neighbors: Neighbors);

    fn receive_edge(&mut self, _src: VId, _dst: VId, _edge_type: EdgeType, _data_pointer: u64) {}
}

/// A callback collecting every answer in arrival order.
#[derive(Debug, Default)]
pub struct NeighborCollector {
    pub out_neighbors: Vec<(VId, Neighbors)>,
    pub in_neighbors: Vec<(VId, Neighbors)>,
}

impl NeighborCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the out-neighbor ids of `vid`, if it was answered.
    pub fn out_ids(&self, vid: VId) -> Option<&[VId]> {
        find(&self.out_neighbors, vid)
    }

    /// Returns the in-neighbor ids of `vid`, if it was answered.
    pub fn in_ids(&self, vid: VId) -> Option<&[VId]> {
        find(&self.in_neighbors, vid)
    }
}

fn find(answers: &[(VId, Neighbors)], vid: VId) -> Option<&[VId]> {
    answers
        .iter()
        .find(|(v, _)| *v == vid)
        .map(|(_, neighbors)| neighbors.ids.as_slice())
}

impl QueryCallback for NeighborCollector {
    fn receive_out_neighbors(&mut self, vid: VId, neighbors: Neighbors) {
        self.out_neighbors.push((vid, neighbors));
    }

    fn receive_in_neighbors(&mut self, vid: VId, neighbors: Neighbors) {
        self.in_neighbors.push((vid, neighbors));
    }
}
