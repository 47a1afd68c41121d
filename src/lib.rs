//! Parcella - directory archives for sparse voxel regions
//!
//! A region is cut into anchor-aligned tiles of at most 16³ voxels. Each voxel is mapped to a
//! small palette id, each tile is stored as a short text file named by the signed Z-order index
//! of its grid coordinate, and the palette is stored once per archive.

pub mod core;
pub mod math;
pub mod voxel;
pub mod archive;

#[cfg(test)]
mod test_util;
