//! On-disk sub-formats for palette blobs

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::core::error::IoResultExt;
use crate::core::types::Result;
use crate::core::Error;

/// How blob bytes are laid out in their file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobFormat {
    /// Standard base64 on one line
    ///
    /// "Text" means ASCII-safe, not human-readable: every archive file stays line-oriented text
    /// whatever bytes the blob holds, and the decoder never has to guess which encoding was used.
    #[default]
    Text,
    /// Raw bytes
    Binary,
}

impl BlobFormat {
    /// File name suffix including the dot
    pub fn suffix(&self) -> &'static str {
        match self {
            BlobFormat::Text => ".b64",
            BlobFormat::Binary => ".bin",
        }
    }

    /// File name of the blob belonging to a palette id
    pub fn file_name(&self, id: u32) -> String {
        format!("{}{}", id, self.suffix())
    }

    /// Write a blob, replacing any existing file
    pub fn write(&self, path: &Path, blob: &[u8]) -> Result<()> {
        match self {
            BlobFormat::Text => {
                let mut text = STANDARD.encode(blob);
                text.push('\n');
                fs::write(path, text).with_path(path)
            }
            BlobFormat::Binary => fs::write(path, blob).with_path(path),
        }
    }

    /// Read a blob written by [`BlobFormat::write`]
    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match self {
            BlobFormat::Text => {
                let text = fs::read_to_string(path).with_path(path)?;
                STANDARD.decode(text.trim()).map_err(|e| {
                    Error::InvalidPaletteEntry(format!(
                        "malformed base64 blob {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
            BlobFormat::Binary => fs::read(path).with_path(path),
        }
    }
}
