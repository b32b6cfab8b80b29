//! Translation between original and internal vertex ids.
//!
//! Original ids are shuffled modulo the number of shards so that consecutive
//! ids land in different shards. This balances the edges over the shards
//! without counting the degree distribution first, at the cost of translating
//! ids back and forth.

use crate::{
    error::{Error, Result},
    types::VId,
};
use std::{fmt, path::Path, str::FromStr};

const INTERVAL_LENGTH_KEY: &str = "vertex_interval_length=";
const NUM_SHARDS_KEY: &str = "numShards=";
const IDENTITY: &str = "none";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexIdTranslate {
    Identity,
    Shuffled { interval_length: u64, num_shards: u64 },
}

impl VertexIdTranslate {
    pub fn new(interval_length: u64, num_shards: u64) -> Result<Self> {
        if interval_length == 0 || num_shards == 0 {
            return Err(Error::Format(format!(
                "interval length {} and shard count {} must be positive",
                interval_length, num_shards
            )));
        }
        Ok(VertexIdTranslate::Shuffled {
            interval_length,
            num_shards,
        })
    }

    /// Translates an original vertex id to an internal vertex id.
    ///
    /// The translation is a bijection on `[0, interval_length * num_shards)`.
    /// Ids outside that range map to unspecified values (the arithmetic wraps).
    pub fn forward(&self, orig: VId) -> VId {
        match *self {
            VertexIdTranslate::Identity => orig,
            VertexIdTranslate::Shuffled {
                interval_length,
                num_shards,
            } => (orig % num_shards)
                .wrapping_mul(interval_length)
                .wrapping_add(orig / num_shards),
        }
    }

    /// Translates an internal vertex id back to the original vertex id.
    ///
    /// Inverse of [`forward`](Self::forward) on the same range.
    pub fn backward(&self, internal: VId) -> VId {
        match *self {
            VertexIdTranslate::Identity => internal,
            VertexIdTranslate::Shuffled {
                interval_length,
                num_shards,
            } => {
                let shard = internal / interval_length;
                let off = internal % interval_length;
                off.wrapping_mul(num_shards).wrapping_add(shard)
            }
        }
    }

    /// Returns the interval length, or `-1` for the identity.
    pub fn interval_length(&self) -> i64 {
        match *self {
            VertexIdTranslate::Identity => -1,
            VertexIdTranslate::Shuffled {
                interval_length, ..
            } => interval_length as i64,
        }
    }

    /// Returns the shard count, or `-1` for the identity.
    pub fn num_shards(&self) -> i64 {
        match *self {
            VertexIdTranslate::Identity => -1,
            VertexIdTranslate::Shuffled { num_shards, .. } => num_shards as i64,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(|e| Error::io(path, e))?
            .parse()
    }
}

impl fmt::Display for VertexIdTranslate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VertexIdTranslate::Identity => write!(f, "{}", IDENTITY),
            VertexIdTranslate::Shuffled {
                interval_length,
                num_shards,
            } => write!(
                f,
                "{}{}\n{}{}\n",
                INTERVAL_LENGTH_KEY, interval_length, NUM_SHARDS_KEY, num_shards
            ),
        }
    }
}

impl FromStr for VertexIdTranslate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == IDENTITY {
            return Ok(VertexIdTranslate::Identity);
        }
        let (mut interval_length, mut num_shards) = (None, None);
        for line in s.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix(INTERVAL_LENGTH_KEY) {
                interval_length = Some(parse_field(s, value)?);
            } else if let Some(value) = line.strip_prefix(NUM_SHARDS_KEY) {
                num_shards = Some(parse_field(s, value)?);
            }
        }
        match (interval_length, num_shards) {
            (Some(interval_length), Some(num_shards)) => {
                VertexIdTranslate::new(interval_length, num_shards)
            }
            _ => Err(Error::Format(format!("{:?}", s))),
        }
    }
}

fn parse_field(s: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Format(format!("{:?}", s)))
}
