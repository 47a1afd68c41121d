//! Archive encoding options

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::error::IoResultExt;
use crate::core::types::{IVec3, Result};
use crate::core::Error;
use crate::archive::tile_codec::TileMode;
use crate::math::Parcel;
use crate::voxel::BlobFormat;

/// Options shared by the writer and reader of one archive
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveConfig {
    /// Tile grid anchor relative to the region origin
    pub anchor_offset: [i32; 3],
    /// Sub-format for palette blobs
    pub blob_format: BlobFormat,
    /// Store tiles as microparcels instead of one id per voxel
    pub enable_microparcel: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            anchor_offset: [0, 0, 0],
            blob_format: BlobFormat::Text,
            enable_microparcel: true,
        }
    }
}

impl ArchiveConfig {
    /// Absolute tile grid anchor for `region`
    pub fn anchor(&self, region: &Parcel) -> IVec3 {
        region.origin() + IVec3::from_array(self.anchor_offset)
    }

    /// Record layout used for tile files
    pub fn tile_mode(&self) -> TileMode {
        if self.enable_microparcel {
            TileMode::Microparcel
        } else {
            TileMode::Flat
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_path(path)?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a JSON file, falling back to defaults if it is missing or malformed
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring archive config: {}", e);
                Self::default()
            }
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).with_path(path)
    }
}
