//! File layout of an archive directory
//!
//! ```text
//! <root>/palette.txt
//! <root>/blobs/<id>.<ext>
//! <root>/tiles/<shard path>.txt
//! <root>/format-options.json
//! ```

use std::path::{Path, PathBuf};

use crate::archive::shard::index_to_path;
use crate::core::types::IVec3;
use crate::math::morton::encode_signed;
use crate::voxel::Tile;

pub const PALETTE_FILE_NAME: &str = "palette.txt";
pub const BLOB_DIR_NAME: &str = "blobs";
pub const TILES_DIR_NAME: &str = "tiles";
pub const CONFIG_FILE_NAME: &str = "format-options.json";
pub const TILE_SUFFIX: &str = ".txt";

/// Paths inside one archive root
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn palette_path(&self) -> PathBuf {
        self.root.join(PALETTE_FILE_NAME)
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.root.join(BLOB_DIR_NAME)
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.root.join(TILES_DIR_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// File holding `tile`, named after the Z-order index of its grid coordinate
    pub fn tile_path(&self, tile: &Tile, anchor: IVec3) -> PathBuf {
        index_to_path(&self.tiles_dir(), encode_signed(tile.coord(anchor)), TILE_SUFFIX)
    }
}
