//! Morton encoding (Z-order curve) for spatial indexing
//!
//! The unsigned variants interleave the low 21 bits of each axis. The signed variants fold
//! every octant onto the positive one (`v >= 0 ? v : -v - 1`) and keep the octant in the
//! low 3 bits of the index, so the 512 smallest indices cover the cube `[-4, 4)^3`.

use std::sync::OnceLock;

use crate::core::types::{IVec3, Result};
use crate::core::Error;

/// Largest magnitude representable per axis
pub const MAX_COMPONENT: i32 = 0x1f_ffff;

/// Indices below this are memoized
const CACHE_SIZE: usize = 512;

/// Spread bits of a 21-bit integer into every third bit of a 64-bit integer
fn spread_bits(x: u32) -> u64 {
    let mut x = x as u64 & 0x1fffff; // 21 bits max
    x = (x | (x << 32)) & 0x1f00000000ffff;
    x = (x | (x << 16)) & 0x1f0000ff0000ff;
    x = (x | (x << 8)) & 0x100f00f00f00f00f;
    x = (x | (x << 4)) & 0x10c30c30c30c30c3;
    x = (x | (x << 2)) & 0x1249249249249249;
    x
}

/// Compact every third bit of a 64-bit integer into a 21-bit integer
fn compact_bits(x: u64) -> u32 {
    let mut x = x & 0x1249249249249249;
    x = (x | (x >> 2)) & 0x10c30c30c30c30c3;
    x = (x | (x >> 4)) & 0x100f00f00f00f00f;
    x = (x | (x >> 8)) & 0x1f0000ff0000ff;
    x = (x | (x >> 16)) & 0x1f00000000ffff;
    x = (x | (x >> 32)) & 0x1fffff;
    x as u32
}

/// Encode 3D coordinates into Morton code (Z-order curve)
/// Each coordinate can be up to 21 bits (0..2097151)
pub fn encode_morton_3d(x: u32, y: u32, z: u32) -> u64 {
    spread_bits(x) | (spread_bits(y) << 1) | (spread_bits(z) << 2)
}

/// Decode Morton code back to 3D coordinates
pub fn decode_morton_3d(code: u64) -> (u32, u32, u32) {
    (
        compact_bits(code),
        compact_bits(code >> 1),
        compact_bits(code >> 2),
    )
}

/// Encode a non-negative coordinate
///
/// Fails with [`Error::InvalidArgument`] if any component is negative.
pub fn encode_unsigned(coord: IVec3) -> Result<u64> {
    if coord.x < 0 || coord.y < 0 || coord.z < 0 {
        return Err(Error::InvalidArgument(format!(
            "coordinates must be non-negative for unsigned Z-order encoding, got {}",
            coord
        )));
    }
    Ok(encode_morton_3d(coord.x as u32, coord.y as u32, coord.z as u32))
}

/// Decode an index produced by [`encode_unsigned`]
pub fn decode_unsigned(index: u64) -> IVec3 {
    let (x, y, z) = decode_morton_3d(index);
    IVec3::new(x as i32, y as i32, z as i32)
}

/// Per-octant `(sign, offset)` so that `v = magnitude * sign + offset`
///
/// Octant bit 2 marks a negative x, bit 1 a negative y, bit 0 a negative z.
const SIGN_OFFSET: [(IVec3, IVec3); 8] = [
    (IVec3::new(1, 1, 1), IVec3::new(0, 0, 0)),
    (IVec3::new(1, 1, -1), IVec3::new(0, 0, -1)),
    (IVec3::new(1, -1, 1), IVec3::new(0, -1, 0)),
    (IVec3::new(1, -1, -1), IVec3::new(0, -1, -1)),
    (IVec3::new(-1, 1, 1), IVec3::new(-1, 0, 0)),
    (IVec3::new(-1, 1, -1), IVec3::new(-1, 0, -1)),
    (IVec3::new(-1, -1, 1), IVec3::new(-1, -1, 0)),
    (IVec3::new(-1, -1, -1), IVec3::new(-1, -1, -1)),
];

fn fold(v: i32) -> u32 {
    if v >= 0 { v as u32 } else { (-(v as i64) - 1) as u32 }
}

fn encode_signed_impl(coord: IVec3) -> u64 {
    let mut octant = 0u64;
    if coord.x < 0 {
        octant |= 0b100;
    }
    if coord.y < 0 {
        octant |= 0b010;
    }
    if coord.z < 0 {
        octant |= 0b001;
    }
    (encode_morton_3d(fold(coord.x), fold(coord.y), fold(coord.z)) << 3) | octant
}

fn decode_signed_impl(index: u64) -> IVec3 {
    let (sign, offset) = SIGN_OFFSET[(index & 0b111) as usize];
    decode_unsigned(index >> 3) * sign + offset
}

fn decode_cache() -> &'static [IVec3] {
    static CACHE: OnceLock<Vec<IVec3>> = OnceLock::new();
    CACHE.get_or_init(|| (0..CACHE_SIZE as u64).map(decode_signed_impl).collect())
}

fn encode_cache() -> &'static [u64] {
    static CACHE: OnceLock<Vec<u64>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let mut table = vec![0u64; CACHE_SIZE];
        for (index, coord) in decode_cache().iter().enumerate() {
            table[cube_slot(*coord)] = index as u64;
        }
        table
    })
}

/// Slot of a coordinate inside the memoized cube `[-4, 4)^3`
fn cube_slot(c: IVec3) -> usize {
    let c = c + IVec3::splat(4);
    (c.x * 64 + c.y * 8 + c.z) as usize
}

/// Encode a coordinate from any octant
///
/// Each folded component must fit in 21 bits, i.e. `-2^21 <= v < 2^21`; higher bits are
/// discarded.
pub fn encode_signed(coord: IVec3) -> u64 {
    if coord.cmpge(IVec3::splat(-4)).all() && coord.cmplt(IVec3::splat(4)).all() {
        return encode_cache()[cube_slot(coord)];
    }
    encode_signed_impl(coord)
}

/// Decode an index produced by [`encode_signed`]
pub fn decode_signed(index: u64) -> IVec3 {
    if index < CACHE_SIZE as u64 {
        return decode_cache()[index as usize];
    }
    decode_signed_impl(index)
}
