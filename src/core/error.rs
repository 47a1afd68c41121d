//! Error types for parcel archives

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archive encoding and decoding
#[derive(Debug, Error)]
pub enum Error {
    /// A box was constructed with a non-positive extent
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A caller violated an argument contract (e.g. negative unsigned Z-order input)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A palette table line or blob could not be parsed
    #[error("invalid palette entry: {0}")]
    InvalidPaletteEntry(String),

    /// A tile file is corrupt
    #[error("{}:{line}: {reason}", .path.display())]
    TileParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A tile references a palette id the loaded palette does not know
    #[error("unknown palette id {id:X} referenced by {}", .path.display())]
    UnknownId { id: u32, path: PathBuf },

    /// Archive configuration could not be parsed
    #[error("config error in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying filesystem failure
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a tile parse error for a 1-based line number
    pub fn tile_parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Error::TileParse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Extension for attaching a path to `std::io::Result`
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T, Error>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T, Error> {
        self.map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_mentions_path() {
        let err = Error::io("/tmp/archive/palette.txt", io::Error::from(io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/archive/palette.txt"), "{}", msg);
    }

    #[test]
    fn test_tile_parse_display() {
        let err = Error::tile_parse("tiles/00.txt", 3, "expected '='");
        assert_eq!(err.to_string(), "tiles/00.txt:3: expected '='");
    }

    #[test]
    fn test_with_path() {
        let res: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        match res.with_path("x") {
            Err(Error::Io { path, .. }) => assert_eq!(path, PathBuf::from("x")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
