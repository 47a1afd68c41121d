//! Deduplicating palette of voxel types
//!
//! Maps a `(descriptor, optional blob)` pair to a small integer id. Ids are handed out in
//! increasing order and never reused within a session. The palette persists as a text table
//! (`<ID-HEX>=<descriptor>` per line) plus one file per blob-bearing id.
//!
//! `collect` takes `&mut self`; encoders running in parallel must each own a palette or share
//! one behind their own lock.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, error, warn};

use crate::core::error::IoResultExt;
use crate::core::hex;
use crate::core::types::Result;
use crate::core::Error;
use crate::voxel::blob::BlobFormat;

/// A voxel type: its descriptor plus optional auxiliary data compared by content
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub descriptor: String,
    pub blob: Option<Vec<u8>>,
}

impl PaletteEntry {
    /// Entry without auxiliary data
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            blob: None,
        }
    }

    /// Entry carrying a blob
    pub fn with_blob(descriptor: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        Self {
            descriptor: descriptor.into(),
            blob: Some(blob.into()),
        }
    }
}

/// Bidirectional entry/id registry
#[derive(Debug, Default, Clone)]
pub struct Palette {
    by_id: BTreeMap<u32, PaletteEntry>,
    by_entry: HashMap<PaletteEntry, u32>,
    blob_ids: BTreeSet<u32>,
    /// One past the largest id ever assigned; reaches `2^32` once `u32::MAX` is taken
    next_id: u64,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `entry`, assigning the next free id on first sight
    ///
    /// Only fails once every `u32` id has been handed out.
    pub fn collect(&mut self, entry: PaletteEntry) -> Result<u32> {
        if let Some(&id) = self.by_entry.get(&entry) {
            return Ok(id);
        }

        let id = u32::try_from(self.next_id).map_err(|_| {
            Error::InvalidPaletteEntry(format!(
                "no palette id left for {:?}, all {} ids are taken",
                entry.descriptor, self.next_id
            ))
        })?;
        self.next_id += 1;

        if entry.blob.is_some() {
            self.blob_ids.insert(id);
        }
        self.by_id.insert(id, entry.clone());
        self.by_entry.insert(entry, id);
        Ok(id)
    }

    /// Lookup an entry by id
    pub fn get(&self, id: u32) -> Option<&PaletteEntry> {
        self.by_id.get(&id)
    }

    /// Lookup the id of an entry without collecting it
    pub fn id_of(&self, entry: &PaletteEntry) -> Option<u32> {
        self.by_entry.get(entry).copied()
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &PaletteEntry)> {
        self.by_id.iter().map(|(id, entry)| (*id, entry))
    }

    /// Ids whose entry carries a blob, ascending
    pub fn blob_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.blob_ids.iter().copied()
    }

    /// Id the next new entry will receive, `2^32` when the id space is used up
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Forget every entry and restart ids at zero
    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_entry.clear();
        self.blob_ids.clear();
        self.next_id = 0;
    }

    /// Write the table file and every blob
    ///
    /// `blob_dir` is created if missing. Existing files are overwritten; stale blob files of
    /// ids no longer present are left alone. Descriptors that would not read back unchanged
    /// (line breaks, trailing whitespace) are rejected before anything is written.
    pub fn save(&self, table_path: &Path, blob_dir: &Path, blob_format: BlobFormat) -> Result<()> {
        for (id, entry) in &self.by_id {
            check_descriptor(*id, &entry.descriptor)?;
        }

        if let Some(parent) = table_path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::create_dir_all(blob_dir).with_path(blob_dir)?;

        let file = fs::File::create(table_path).with_path(table_path)?;
        let mut writer = BufWriter::new(file);
        for (id, entry) in &self.by_id {
            writeln!(writer, "{}={}", hex::to_hex(*id as u64), entry.descriptor)
                .with_path(table_path)?;
        }
        writer.flush().with_path(table_path)?;

        for id in &self.blob_ids {
            if let Some(blob) = self.by_id.get(id).and_then(|e| e.blob.as_deref()) {
                blob_format.write(&blob_dir.join(blob_format.file_name(*id)), blob)?;
            }
        }

        debug!(
            "Saved palette with {} entries ({} blobs) to {}",
            self.by_id.len(),
            self.blob_ids.len(),
            table_path.display()
        );
        Ok(())
    }

    /// Load a palette strictly
    ///
    /// Fails with [`Error::InvalidPaletteEntry`] on a line without `=` or with a malformed id.
    /// Duplicate ids are logged and the later line wins.
    pub fn load(table_path: &Path, blob_dir: &Path, blob_format: BlobFormat) -> Result<Self> {
        let text = fs::read_to_string(table_path).with_path(table_path)?;
        let mut palette = Palette::new();
        let mut max_id: Option<u32> = None;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let (id_str, descriptor) = line.split_once('=').ok_or_else(|| {
                Error::InvalidPaletteEntry(format!(
                    "{}:{}: missing '=' in {:?}",
                    table_path.display(),
                    line_no + 1,
                    line
                ))
            })?;
            let id = hex::parse_u32(id_str).ok_or_else(|| {
                Error::InvalidPaletteEntry(format!(
                    "{}:{}: invalid hex id {:?}",
                    table_path.display(),
                    line_no + 1,
                    id_str
                ))
            })?;
            max_id = Some(max_id.map_or(id, |m| m.max(id)));

            let blob_path = blob_dir.join(blob_format.file_name(id));
            let blob = if blob_path.exists() {
                Some(blob_format.read(&blob_path)?)
            } else {
                None
            };

            if palette.by_id.contains_key(&id) {
                warn!(
                    "Duplicate id {:X} in palette file {}, keeping the later entry",
                    id,
                    table_path.display()
                );
            }
            palette.insert(id, PaletteEntry { descriptor: descriptor.to_string(), blob });
        }

        palette.next_id = max_id.map_or(0, |m| m as u64 + 1);
        debug!(
            "Loaded palette with {} entries from {}",
            palette.len(),
            table_path.display()
        );
        Ok(palette)
    }

    /// Load a palette, or an empty one if the table file does not exist
    pub fn load_if_exists(
        table_path: &Path,
        blob_dir: &Path,
        blob_format: BlobFormat,
    ) -> Result<Self> {
        if !table_path.exists() {
            return Ok(Palette::new());
        }
        Self::load(table_path, blob_dir, blob_format)
    }

    /// Load a palette, logging any failure and falling back to an empty palette
    pub fn load_or_new(table_path: &Path, blob_dir: &Path, blob_format: BlobFormat) -> Self {
        match Self::load(table_path, blob_dir, blob_format) {
            Ok(palette) => palette,
            Err(e) => {
                error!("Error loading palette {}: {}", table_path.display(), e);
                Palette::new()
            }
        }
    }

    /// Insert at a fixed id, replacing whatever the id held before
    fn insert(&mut self, id: u32, entry: PaletteEntry) {
        if let Some(old) = self.by_id.remove(&id) {
            if self.by_entry.get(&old) == Some(&id) {
                self.by_entry.remove(&old);
            }
            self.blob_ids.remove(&id);
        }
        if entry.blob.is_some() {
            self.blob_ids.insert(id);
        }
        self.by_entry.insert(entry.clone(), id);
        self.by_id.insert(id, entry);
    }
}

/// A descriptor must survive one table line: no line breaks, no trailing whitespace
fn check_descriptor(id: u32, descriptor: &str) -> Result<()> {
    if descriptor.contains(['\n', '\r']) {
        return Err(Error::InvalidPaletteEntry(format!(
            "descriptor of id {:X} contains a line break: {:?}",
            id, descriptor
        )));
    }
    if descriptor.trim_end() != descriptor {
        return Err(Error::InvalidPaletteEntry(format!(
            "descriptor of id {:X} ends with whitespace: {:?}",
            id, descriptor
        )));
    }
    Ok(())
}
