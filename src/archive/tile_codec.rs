//! Text encoding of a single tile
//!
//! Microparcel mode writes one record per box:
//!
//! ```text
//! <x><y><z><sx-1><sy-1><sz-1>=<id>
//! ```
//!
//! where every coordinate is one hex digit of the tile-local origin, every size digit stores
//! `size - 1` (so `F` means 16), and `<id>` is the palette id in variable-width hex.
//!
//! Flat mode writes one `<id>` line per voxel, x outermost and z innermost.

use std::path::Path;

use crate::core::hex;
use crate::core::types::{IVec3, Result};
use crate::core::Error;
use crate::voxel::{Microparcel, Tile, TILE_SIZE};

/// Record layout of a tile file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMode {
    Microparcel,
    Flat,
}

/// Decoded palette ids of one tile, in [`crate::math::Parcel::voxels`] order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileData {
    pub tile: Tile,
    ids: Vec<u32>,
}

impl TileData {
    fn slot(&self, local: IVec3) -> usize {
        let size = self.tile.bounds.size();
        ((local.x * size.y + local.y) * size.z + local.z) as usize
    }

    /// Palette id at an absolute position, `None` outside the tile
    pub fn get(&self, pos: IVec3) -> Option<u32> {
        if !self.tile.bounds.contains(pos) {
            return None;
        }
        Some(self.ids[self.slot(self.tile.to_local(pos))])
    }

    /// Absolute positions with their palette ids
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, u32)> + '_ {
        self.tile.bounds.voxels().zip(self.ids.iter().copied())
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }
}

fn check_tile(tile: &Tile) -> Result<()> {
    if tile.bounds.size().cmpgt(IVec3::splat(TILE_SIZE)).any() {
        return Err(Error::InvalidArgument(format!(
            "tile {} exceeds {} voxels per axis",
            tile.bounds, TILE_SIZE
        )));
    }
    Ok(())
}

/// Encode microparcels of `tile` (absolute coordinates) as records
pub fn encode_microparcels(tile: &Tile, parts: &[Microparcel]) -> Result<String> {
    check_tile(tile)?;

    let mut out = String::with_capacity(parts.len() * 10);
    for part in parts {
        if !tile.bounds.contains_parcel(&part.bounds) {
            return Err(Error::InvalidArgument(format!(
                "microparcel {} lies outside tile {}",
                part.bounds, tile.bounds
            )));
        }
        let origin = tile.to_local(part.bounds.origin());
        let size = part.bounds.size() - IVec3::ONE;

        for v in [origin.x, origin.y, origin.z, size.x, size.y, size.z] {
            out.push(hex::digit(v as u8));
        }
        out.push('=');
        out.push_str(&hex::to_hex(part.value as u64));
        out.push('\n');
    }
    Ok(out)
}

/// Encode one id per voxel, `ids` in [`crate::math::Parcel::voxels`] order
pub fn encode_flat(tile: &Tile, ids: impl IntoIterator<Item = u32>) -> Result<String> {
    check_tile(tile)?;

    let mut out = String::with_capacity(tile.bounds.volume() as usize * 2);
    for id in ids {
        out.push_str(&hex::to_hex(id as u64));
        out.push('\n');
    }
    Ok(out)
}

/// Decode a tile file; `path` is only used for error messages
pub fn decode_tile(tile: &Tile, text: &str, mode: TileMode, path: &Path) -> Result<TileData> {
    check_tile(tile)?;
    match mode {
        TileMode::Microparcel => decode_microparcels(tile, text, path),
        TileMode::Flat => decode_flat(tile, text, path),
    }
}

fn parse_id(s: &str, path: &Path, line: usize) -> Result<u32> {
    hex::parse_u32(s)
        .ok_or_else(|| Error::tile_parse(path, line, format!("invalid palette id {:?}", s)))
}

fn decode_microparcels(tile: &Tile, text: &str, path: &Path) -> Result<TileData> {
    let size = tile.bounds.size();
    let mut slots: Vec<Option<u32>> = vec![None; tile.bounds.volume() as usize];
    let mut data = TileData { tile: *tile, ids: Vec::new() };

    let mut line_count = 0;
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        line_count = line_no;

        let (geometry, id) = line
            .split_once('=')
            .ok_or_else(|| Error::tile_parse(path, line_no, "expected '='"))?;
        let digits = geometry
            .chars()
            .map(hex::parse_digit)
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| {
                Error::tile_parse(path, line_no, format!("non-hex digit in {:?}", geometry))
            })?;
        if digits.len() != 6 {
            return Err(Error::tile_parse(
                path,
                line_no,
                format!("expected 6 geometry digits, found {}", digits.len()),
            ));
        }
        let id = parse_id(id, path, line_no)?;

        let origin = IVec3::new(digits[0] as i32, digits[1] as i32, digits[2] as i32);
        let extent =
            IVec3::new(digits[3] as i32, digits[4] as i32, digits[5] as i32) + IVec3::ONE;
        let end = origin + extent;
        if end.cmpgt(size).any() {
            return Err(Error::tile_parse(
                path,
                line_no,
                format!("box at {} of size {} exceeds tile size {}", origin, extent, size),
            ));
        }

        for x in origin.x..end.x {
            for y in origin.y..end.y {
                for z in origin.z..end.z {
                    let slot = data.slot(IVec3::new(x, y, z));
                    if slots[slot].replace(id).is_some() {
                        return Err(Error::tile_parse(
                            path,
                            line_no,
                            format!("voxel ({}, {}, {}) covered twice", x, y, z),
                        ));
                    }
                }
            }
        }
    }

    let missing = slots.iter().filter(|s| s.is_none()).count();
    if missing > 0 {
        return Err(Error::tile_parse(
            path,
            line_count.max(1),
            format!("{} voxels of the tile are not covered", missing),
        ));
    }

    data.ids = slots.into_iter().flatten().collect();
    Ok(data)
}

fn decode_flat(tile: &Tile, text: &str, path: &Path) -> Result<TileData> {
    let volume = tile.bounds.volume() as usize;
    let mut ids = Vec::with_capacity(volume);

    for (i, line) in text.lines().enumerate() {
        if i >= volume {
            return Err(Error::tile_parse(
                path,
                i + 1,
                format!("more records than the {} voxels of the tile", volume),
            ));
        }
        ids.push(parse_id(line, path, i + 1)?);
    }
    if ids.len() != volume {
        return Err(Error::tile_parse(
            path,
            ids.len().max(1),
            format!("expected {} records, found {}", volume, ids.len()),
        ));
    }

    Ok(TileData { tile: *tile, ids })
}
