//! Archive encoding
//!
//! The writer walks a region tile by tile, assigns palette ids to every voxel and writes one
//! text file per tile. The palette table is rewritten once at the end of
//! [`ArchiveWriter::write_region`].
//!
//! Files are written in place. Callers that need an all-or-nothing archive should write into a
//! staging directory and rename it when done. Two writers sharing one root must be serialized
//! by the caller, since each holds its own copy of the palette.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};

use crate::archive::config::ArchiveConfig;
use crate::archive::layout::ArchiveLayout;
use crate::archive::tile_codec::{self, TileMode};
use crate::core::error::IoResultExt;
use crate::core::types::{IVec3, Result};
use crate::math::Parcel;
use crate::voxel::tiler::subdivide;
use crate::voxel::{decompose, Palette, PaletteEntry, Tile};

/// Counts reported by [`ArchiveWriter::write_region`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub tiles: usize,
    /// Lines written across all tile files
    pub records: usize,
    pub palette_entries: usize,
}

pub struct ArchiveWriter {
    layout: ArchiveLayout,
    config: ArchiveConfig,
    palette: Palette,
}

impl ArchiveWriter {
    /// Open `root` for writing, creating it and storing `config`
    ///
    /// An existing palette table is reused so ids stay stable across runs. A palette that
    /// fails to load is logged and replaced by an empty one.
    pub fn create(root: impl Into<PathBuf>, config: ArchiveConfig) -> Result<Self> {
        let layout = ArchiveLayout::new(root);
        let palette_path = layout.palette_path();
        let palette = if palette_path.exists() {
            Palette::load_or_new(&palette_path, &layout.blob_dir(), config.blob_format)
        } else {
            Palette::new()
        };
        Self::with_palette(layout, config, palette)
    }

    /// Open `layout` for writing with an explicit starting palette
    pub fn with_palette(
        layout: ArchiveLayout,
        config: ArchiveConfig,
        palette: Palette,
    ) -> Result<Self> {
        fs::create_dir_all(layout.root()).with_path(layout.root())?;
        config.save(&layout.config_path())?;
        debug!(
            "Opened archive {} for writing ({} palette entries)",
            layout.root().display(),
            palette.len()
        );
        Ok(Self { layout, config, palette })
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Encode one tile; `values` is called once per voxel with its absolute position
    ///
    /// Returns the number of records written.
    pub fn write_tile<F>(&mut self, tile: &Tile, anchor: IVec3, mut values: F) -> Result<usize>
    where
        F: FnMut(IVec3) -> PaletteEntry,
    {
        let ids = tile
            .bounds
            .voxels()
            .map(|pos| self.palette.collect(values(pos)))
            .collect::<Result<Vec<u32>>>()?;

        let (text, records) = match self.config.tile_mode() {
            TileMode::Microparcel => {
                let origin = tile.bounds.origin();
                let size = tile.bounds.size();
                let parts = decompose(&tile.bounds, |pos| {
                    let l = pos - origin;
                    ids[((l.x * size.y + l.y) * size.z + l.z) as usize]
                });
                (tile_codec::encode_microparcels(tile, &parts)?, parts.len())
            }
            TileMode::Flat => (tile_codec::encode_flat(tile, ids.iter().copied())?, ids.len()),
        };

        let path = self.layout.tile_path(tile, anchor);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&path, text).with_path(&path)?;
        Ok(records)
    }

    /// Encode every tile of `region`, then save the palette
    pub fn write_region<F>(&mut self, region: &Parcel, mut values: F) -> Result<WriteStats>
    where
        F: FnMut(IVec3) -> PaletteEntry,
    {
        let start = Instant::now();
        let anchor = self.config.anchor(region);
        let tiles = subdivide(region, anchor);

        let mut stats = WriteStats { tiles: tiles.len(), ..Default::default() };
        for tile in &tiles {
            stats.records += self.write_tile(tile, anchor, &mut values)?;
        }

        self.save_palette()?;
        stats.palette_entries = self.palette.len();

        info!(
            "Wrote {} to {}: {} tiles, {} records, {} palette entries in {:.2}s",
            region,
            self.layout.root().display(),
            stats.tiles,
            stats.records,
            stats.palette_entries,
            start.elapsed().as_secs_f64()
        );
        Ok(stats)
    }

    /// Write the palette table and blobs
    pub fn save_palette(&self) -> Result<()> {
        self.palette.save(
            &self.layout.palette_path(),
            &self.layout.blob_dir(),
            self.config.blob_format,
        )
    }
}
