//! Hierarchical path sharding of numeric indices
//!
//! An index is split into bytes, least significant first, each written as two uppercase hex
//! digits. Every byte but the last becomes a directory, so no directory holds more than 256
//! entries per level.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::hex;

/// Indices below this are served from a precomputed table
const CACHE_SIZE: usize = 512;

fn segments_impl(mut index: u64) -> Vec<String> {
    if index == 0 {
        return vec!["00".to_string()];
    }

    let mut segments = Vec::with_capacity(8);
    while index != 0 {
        segments.push(hex::byte_to_hex((index & 0xFF) as u8));
        index >>= 8;
    }
    segments
}

fn cache() -> &'static [Vec<String>] {
    static CACHE: OnceLock<Vec<Vec<String>>> = OnceLock::new();
    CACHE.get_or_init(|| (0..CACHE_SIZE as u64).map(segments_impl).collect())
}

/// Hex path segments of `index`, least significant byte first
pub fn index_to_segments(index: u64) -> Cow<'static, [String]> {
    if index < CACHE_SIZE as u64 {
        return Cow::Borrowed(&cache()[index as usize]);
    }
    Cow::Owned(segments_impl(index))
}

/// Path of `index` under `root`, with `suffix` appended to the final segment
///
/// # Example
/// ```
/// use std::path::Path;
/// use parcella::archive::shard::index_to_path;
///
/// let path = index_to_path(Path::new("tiles"), 0x1234, ".txt");
/// assert_eq!(path, Path::new("tiles").join("34").join("12.txt"));
/// ```
pub fn index_to_path(root: &Path, index: u64, suffix: &str) -> PathBuf {
    let segments = index_to_segments(index);
    let last = segments.len() - 1;

    let mut path = root.to_path_buf();
    for (i, segment) in segments.iter().enumerate() {
        if i == last {
            path.push(format!("{}{}", segment, suffix));
        } else {
            path.push(segment);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_to_path() {
        let root = Path::new(".");
        let check = |index: u64, expected: &str| {
            let path = index_to_path(root, index, ".dat");
            assert_eq!(path, root.join(expected), "index {:X}", index);
        };

        check(0x00, "00.dat");
        check(0x01, "01.dat");
        check(0x0F, "0F.dat");
        check(0xFF, "FF.dat");
        check(0x1234, "34/12.dat");
        check(0x240F, "0F/24.dat");
        check(0x01240F, "0F/24/01.dat");
        check(0x31240F, "0F/24/31.dat");
        check(0xFF063412, "12/34/06/FF.dat");
    }

    #[test]
    fn test_segments() {
        assert_eq!(index_to_segments(0).as_ref(), ["00"]);
        assert_eq!(index_to_segments(0x100).as_ref(), ["00", "01"]);
        assert_eq!(index_to_segments(u64::MAX).len(), 8);
    }

    #[test]
    fn test_cache_matches_direct() {
        for i in 0..CACHE_SIZE as u64 {
            assert_eq!(index_to_segments(i).as_ref(), segments_impl(i).as_slice());
        }
    }

    #[test]
    fn test_injective() {
        let root = Path::new("r");
        let mut seen = HashSet::new();
        for i in (0..70_000u64).chain([u64::MAX, 1 << 40, (1 << 40) + 1]) {
            assert!(seen.insert(index_to_path(root, i, ".txt")), "collision at {}", i);
        }
    }
}
