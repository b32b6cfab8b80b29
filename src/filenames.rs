//! File naming and the small metadata files next to the shards.

use crate::{
    error::{Error, Result},
    packet::MAX_VERTICES,
    translate::VertexIdTranslate,
    types::{ShardInterval, VId},
};
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// The width of one record in the vertex names file.
pub const NAME_LEN: usize = 16;

fn with_suffix<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_ref().as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

pub fn adjacency_path<P: AsRef<Path>>(base: P, shard_num: usize, num_shards: usize) -> PathBuf {
    with_suffix(base, &format!(".{}_{}.adj", shard_num, num_shards))
}

pub fn pointers_path<P: AsRef<Path>>(adjacency: P) -> PathBuf {
    with_suffix(adjacency, ".ptr")
}

pub fn in_edge_starts_path<P: AsRef<Path>>(adjacency: P) -> PathBuf {
    with_suffix(adjacency, ".instart")
}

pub fn index_path<P: AsRef<Path>>(adjacency: P) -> PathBuf {
    with_suffix(adjacency, ".index")
}

pub fn intervals_path<P: AsRef<Path>>(base: P, num_shards: usize) -> PathBuf {
    with_suffix(base, &format!(".{}.intervals", num_shards))
}

pub fn translate_path<P: AsRef<Path>>(base: P, num_shards: usize) -> PathBuf {
    with_suffix(base, &format!(".{}.vtranslate", num_shards))
}

pub fn names_path<P: AsRef<Path>>(base: P) -> PathBuf {
    with_suffix(base, "_names.dat")
}

/// Loads the shard intervals.
///
/// Each line holds the last vertex id of one shard. The first shard starts at
/// vertex 0 and every other shard right after its predecessor.
pub fn load_intervals<P: AsRef<Path>>(base: P, num_shards: usize) -> Result<Vec<ShardInterval>> {
    let path = intervals_path(base, num_shards);
    let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let mut intervals = Vec::with_capacity(num_shards);
    let mut first = 0;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let last: VId = line
            .parse()
            .map_err(|_| Error::Format(format!("{}: bad interval {:?}", path.display(), line)))?;
        if last >= MAX_VERTICES {
            return Err(Error::Format(format!(
                "{}: interval end {} exceeds the largest vertex id {}",
                path.display(),
                last,
                MAX_VERTICES - 1
            )));
        }
        if last < first {
            return Err(Error::Format(format!(
                "{}: interval end {} precedes start {}",
                path.display(),
                last,
                first
            )));
        }
        intervals.push(ShardInterval::new(first, last));
        first = last.checked_add(1).ok_or_else(|| {
            Error::Format(format!("{}: interval end {} overflows", path.display(), last))
        })?;
    }
    if intervals.len() != num_shards {
        return Err(Error::Format(format!(
            "{}: expected {} intervals, found {}",
            path.display(),
            num_shards,
            intervals.len()
        )));
    }
    Ok(intervals)
}

pub fn load_translate<P: AsRef<Path>>(base: P, num_shards: usize) -> Result<VertexIdTranslate> {
    VertexIdTranslate::from_file(translate_path(base, num_shards))
}

/// Returns a printable name of `vid`.
///
/// Falls back to the bare id when the graph has no names file.
pub fn vertex_name<P: AsRef<Path>>(base: P, vid: VId) -> Result<String> {
    let path = names_path(base);
    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vid.to_string()),
        Err(e) => return Err(Error::io(&path, e)),
    };
    let pos = vid.checked_mul(NAME_LEN as u64).ok_or_else(|| {
        Error::Format(format!("{}: no name record for vertex {}", path.display(), vid))
    })?;
    let mut buf = [0; NAME_LEN];
    file.seek(SeekFrom::Start(pos))
        .and_then(|_| file.read_exact(&mut buf))
        .map_err(|e| Error::io(&path, e))?;
    let name = String::from_utf8_lossy(&buf);
    Ok(format!(
        "{}({})",
        name.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()),
        vid
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let adj = adjacency_path("/data/graph", 2, 4);
        assert_eq!(adj, PathBuf::from("/data/graph.2_4.adj"));
        assert_eq!(pointers_path(&adj), PathBuf::from("/data/graph.2_4.adj.ptr"));
        assert_eq!(
            in_edge_starts_path(&adj),
            PathBuf::from("/data/graph.2_4.adj.instart")
        );
        assert_eq!(index_path(&adj), PathBuf::from("/data/graph.2_4.adj.index"));
        assert_eq!(
            intervals_path("/data/graph", 4),
            PathBuf::from("/data/graph.4.intervals")
        );
        assert_eq!(
            translate_path("/data/graph", 4),
            PathBuf::from("/data/graph.4.vtranslate")
        );
        assert_eq!(names_path("/data/graph"), PathBuf::from("/data/graph_names.dat"));
    }

    #[test]
    fn test_load_intervals() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("graph");
        std::fs::write(intervals_path(&base, 3), "9\n19\n\n29\n").unwrap();
        assert_eq!(
            load_intervals(&base, 3).unwrap(),
            [
                ShardInterval::new(0, 9),
                ShardInterval::new(10, 19),
                ShardInterval::new(20, 29)
            ]
        );
        std::fs::write(intervals_path(&base, 2), "9\n").unwrap();
        assert!(matches!(load_intervals(&base, 2), Err(Error::Format(_))));
        std::fs::write(intervals_path(&base, 2), "9\nx\n").unwrap();
        assert!(matches!(load_intervals(&base, 2), Err(Error::Format(_))));
        std::fs::write(intervals_path(&base, 2), "9\n5\n").unwrap();
        assert!(matches!(load_intervals(&base, 2), Err(Error::Format(_))));
        assert!(matches!(load_intervals(&base, 5), Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_intervals_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("graph");
        std::fs::write(intervals_path(&base, 1), format!("{}\n", u64::MAX)).unwrap();
        assert!(matches!(load_intervals(&base, 1), Err(Error::Format(_))));
        std::fs::write(intervals_path(&base, 1), format!("{}\n", MAX_VERTICES)).unwrap();
        assert!(matches!(load_intervals(&base, 1), Err(Error::Format(_))));
        std::fs::write(intervals_path(&base, 1), format!("{}\n", MAX_VERTICES - 1)).unwrap();
        assert_eq!(
            load_intervals(&base, 1).unwrap(),
            [ShardInterval::new(0, MAX_VERTICES - 1)]
        );
    }

    #[test]
    fn test_vertex_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("graph");
        assert_eq!(vertex_name(&base, 7).unwrap(), "7");
        let mut names = vec![0u8; 2 * NAME_LEN];
        names[..5].copy_from_slice(b"alice");
        names[NAME_LEN..NAME_LEN + 3].copy_from_slice(b"bob");
        std::fs::write(names_path(&base), &names).unwrap();
        assert_eq!(vertex_name(&base, 0).unwrap(), "alice(0)");
        assert_eq!(vertex_name(&base, 1).unwrap(), "bob(1)");
        assert!(matches!(vertex_name(&base, 2), Err(Error::Io { .. })));
        assert!(matches!(vertex_name(&base, u64::MAX), Err(Error::Format(_))));
    }
}
