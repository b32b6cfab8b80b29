//! The 64-bit edge packet shared by the adjacency and pointer regions.
//!
//! ```text
//! 63                               30 29                 4 3      0
//! +----------------------------------+--------------------+--------+
//! |          vertex id (34)          |      aux (26)      |type (4)|
//! +----------------------------------+--------------------+--------+
//! ```

use crate::{
    error::{Error, Result},
    types::{EdgeType, VId},
};

pub const TYPE_BITS: u32 = 4;
pub const AUX_BITS: u32 = 26;
pub const VID_BITS: u32 = 34;

const AUX_SHIFT: u32 = TYPE_BITS;
const VID_SHIFT: u32 = TYPE_BITS + AUX_BITS;

const TYPE_MASK: u64 = (1 << TYPE_BITS) - 1;
const AUX_MASK: u64 = ((1 << AUX_BITS) - 1) << AUX_SHIFT;
const VID_MASK: u64 = ((1 << VID_BITS) - 1) << VID_SHIFT;

/// One past the largest encodable vertex id.
pub const MAX_VERTICES: u64 = 1 << VID_BITS;

/// One past the largest encodable aux value, which bounds the records per shard.
pub const MAX_AUX: u64 = 1 << AUX_BITS;

/// The aux value that terminates an in-edge chain.
///
/// It is the in-edge start sentinel `2^30 - 1` truncated to the aux width.
pub const AUX_CHAIN_END: u64 = MAX_AUX - 1;

/// The type tag of a deleted edge.
pub const DELETED_TYPE: EdgeType = 0xf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgePacket(u64);

impl EdgePacket {
    pub fn encode(edge_type: EdgeType, vid: VId, aux: u64) -> Result<Self> {
        check_width("edge type", edge_type as u64, TYPE_BITS)?;
        check_width("vertex id", vid, VID_BITS)?;
        check_width("aux", aux, AUX_BITS)?;
        Ok(EdgePacket(
            (vid << VID_SHIFT) | (aux << AUX_SHIFT) | edge_type as u64,
        ))
    }

    pub fn encode_as_deleted(vid: VId, aux: u64) -> Result<Self> {
        EdgePacket::encode(DELETED_TYPE, vid, aux)
    }

    pub fn from_raw(raw: u64) -> Self {
        EdgePacket(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn vertex_id(&self) -> VId {
        (self.0 & VID_MASK) >> VID_SHIFT
    }

    pub fn aux(&self) -> u64 {
        (self.0 & AUX_MASK) >> AUX_SHIFT
    }

    pub fn edge_type(&self) -> EdgeType {
        (self.0 & TYPE_MASK) as EdgeType
    }

    pub fn is_deleted(&self) -> bool {
        self.edge_type() == DELETED_TYPE
    }
}

fn check_width(field: &'static str, value: u64, bits: u32) -> Result<()> {
    if value >> bits == 0 {
        Ok(())
    } else {
        Err(Error::PacketOverflow { field, value, bits })
    }
}
