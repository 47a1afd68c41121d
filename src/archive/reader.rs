//! Archive decoding

use std::fs;
use std::path::PathBuf;

use log::debug;
use rayon::prelude::*;

use crate::archive::config::ArchiveConfig;
use crate::archive::layout::ArchiveLayout;
use crate::archive::tile_codec::{self, TileData};
use crate::core::error::IoResultExt;
use crate::core::types::{IVec3, Result};
use crate::core::Error;
use crate::math::Parcel;
use crate::voxel::tiler::subdivide;
use crate::voxel::{Palette, PaletteEntry, Tile};

/// Read access to a finished archive
///
/// The tile layout is taken from the stored config; tile files are never sniffed.
pub struct ArchiveReader {
    layout: ArchiveLayout,
    config: ArchiveConfig,
    palette: Palette,
}

impl ArchiveReader {
    /// Open the archive at `root`
    ///
    /// A missing config means defaults. The palette table must exist and parse.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = ArchiveLayout::new(root);
        let config_path = layout.config_path();
        let config = if config_path.exists() {
            ArchiveConfig::load(&config_path)?
        } else {
            ArchiveConfig::default()
        };
        let palette =
            Palette::load(&layout.palette_path(), &layout.blob_dir(), config.blob_format)?;

        debug!(
            "Opened archive {} ({} palette entries, {:?} tiles)",
            layout.root().display(),
            palette.len(),
            config.tile_mode()
        );
        Ok(Self { layout, config, palette })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Decode one tile, checking every id against the palette
    pub fn read_tile(&self, tile: &Tile, anchor: IVec3) -> Result<TileData> {
        let path = self.layout.tile_path(tile, anchor);
        let text = fs::read_to_string(&path).with_path(&path)?;
        let data = tile_codec::decode_tile(tile, &text, self.config.tile_mode(), &path)?;

        if let Some(&id) = data.ids().iter().find(|id| self.palette.get(**id).is_none()) {
            return Err(Error::UnknownId { id, path });
        }
        Ok(data)
    }

    /// Decode every tile of `region` in parallel
    ///
    /// Tiles come back in [`subdivide`] order. The first failing tile aborts the read.
    pub fn read_region(&self, region: &Parcel) -> Result<Vec<TileData>> {
        let anchor = self.config.anchor(region);
        let tiles = subdivide(region, anchor);
        tiles
            .par_iter()
            .map(|tile| self.read_tile(tile, anchor))
            .collect()
    }

    /// Call `visit` for every voxel of `region` with its palette entry
    pub fn replay<F>(&self, region: &Parcel, mut visit: F) -> Result<()>
    where
        F: FnMut(IVec3, &PaletteEntry),
    {
        for data in self.read_region(region)? {
            for (pos, id) in data.iter() {
                // ids were checked in read_tile
                if let Some(entry) = self.palette.get(id) {
                    visit(pos, entry);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::writer::ArchiveWriter;
    use tempfile::TempDir;

    #[test]
    fn test_read_back_single_tile() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let region = Parcel::new(IVec3::new(3, -5, 0), IVec3::new(5, 6, 7)).unwrap();
        let entry =
            |pos: IVec3| PaletteEntry::new(format!("block{}", (pos.x + pos.z).rem_euclid(3)));

        ArchiveWriter::create(dir.path(), ArchiveConfig::default())
            .unwrap()
            .write_region(&region, entry)
            .unwrap();

        let reader = ArchiveReader::open(dir.path()).unwrap();
        let mut count = 0i64;
        reader
            .replay(&region, |pos, e| {
                assert_eq!(*e, entry(pos));
                count += 1;
            })
            .unwrap();
        assert_eq!(count, region.volume());
    }

    #[test]
    fn test_unknown_id() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let region = Parcel::new(IVec3::ZERO, IVec3::ONE).unwrap();
        ArchiveWriter::create(dir.path(), ArchiveConfig::default())
            .unwrap()
            .write_region(&region, |_| PaletteEntry::new("stone"))
            .unwrap();
        fs::write(dir.path().join("tiles/00.txt"), "000000=3\n").unwrap();

        let reader = ArchiveReader::open(dir.path()).unwrap();
        let tile = Tile::new(region);
        assert!(matches!(
            reader.read_tile(&tile, IVec3::ZERO),
            Err(Error::UnknownId { id: 3, .. })
        ));
    }

    #[test]
    fn test_missing_palette() {
        let dir = TempDir::new().expect("failed to create temp dir");
        assert!(matches!(ArchiveReader::open(dir.path()), Err(Error::Io { .. })));
    }
}
