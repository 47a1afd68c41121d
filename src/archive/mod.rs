//! On-disk archive: sharded tile files plus a palette
//!
//! ```text
//! region --subdivide--> tiles --decompose--> microparcels --tile_codec--> tiles/<shard>.txt
//!                                   |
//!                                   +--palette--> palette.txt, blobs/
//! ```

pub mod shard;
pub mod config;
pub mod layout;
pub mod tile_codec;
pub mod writer;
pub mod reader;

pub use config::ArchiveConfig;
pub use layout::ArchiveLayout;
pub use tile_codec::{TileData, TileMode};
pub use writer::{ArchiveWriter, WriteStats};
pub use reader::ArchiveReader;
