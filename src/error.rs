//! Error management.

use crate::types::{ShardInterval, VId};
use derive_more::Display;

#[derive(Debug, Display)]
pub enum Error {
    /// A file could not be opened, mapped or read.
    #[display(fmt = "{}: {}", path, source)]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Malformed text or a region whose size does not fit its record layout.
    #[display(fmt = "illegal format: {}", _0)]
    Format(String),
    #[display(fmt = "vertex {} not part of interval {}", _0, _1)]
    OutOfInterval(VId, ShardInterval),
    #[display(fmt = "{} {} does not fit in {} bits", field, value, bits)]
    PacketOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
    },
    /// The on-disk data disagrees with itself.
    #[display(fmt = "corrupt shard: {}", _0)]
    Corrupt(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
