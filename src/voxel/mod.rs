//! Voxel palettes, tiling and box decomposition

pub mod blob;
pub mod palette;
pub mod tiler;
pub mod microparcel;

pub use blob::BlobFormat;
pub use palette::{Palette, PaletteEntry};
pub use tiler::{Tile, TILE_SIZE};
pub use microparcel::{Microparcel, decompose};
