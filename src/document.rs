//! A fully decoded AppleDouble file.

use std::collections::BTreeMap;

use finder_types::{FinderInfo, LabelColor};
use log::{debug, warn};
use thiserror::Error;

use crate::cursor::ByteCursor;
use crate::entry::{Entry, EntryType, FileInfo, decode_entry};
use crate::error::{DecodeError, EntryError};
use crate::header::{EntryDescriptor, Header, decode_header};

/// Something odd about a file that did not stop it being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("invalid or unusual magic number {0:02x?}")]
    UnexpectedMagic([u8; 4]),
    #[error("unknown entry type {0}")]
    UnknownEntryType(u32),
    /// The later entry replaces the earlier one.
    #[error("entry type {0} appears more than once, keeping the last")]
    DuplicateEntryType(u32),
    #[error("entry type {type_code} could not be decoded: {error}")]
    EntryFailed { type_code: u32, error: EntryError },
}

/// Collects warnings for a single parse, logging each as it arrives.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// The decoded contents of one AppleDouble buffer.
///
/// Built in a single pass by [`Document::parse`] and never modified
/// afterwards. Parsing the same bytes always yields an equal document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    header: Header,
    descriptors: Vec<EntryDescriptor>,
    entries: BTreeMap<u32, Entry>,
    label_color: Option<LabelColor>,
    warnings: Vec<Warning>,
}

impl Document {
    /// Decode a complete AppleDouble file held in memory.
    ///
    /// Fails only when the header or descriptor table is truncated. Entry
    /// problems are recorded on the entry and listed in [`Document::warnings`].
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut diagnostics = Diagnostics::default();
        let mut cursor = ByteCursor::new(bytes);

        let (header, descriptors) = decode_header(&mut cursor, &mut diagnostics)?;

        // Resolve repeated type codes first so a replaced descriptor is never
        // decoded and cannot report failures of its own.
        let mut winners = BTreeMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            if winners.insert(descriptor.entry_id, index).is_some() {
                diagnostics.warn(Warning::DuplicateEntryType(descriptor.entry_id));
            }
        }

        let mut entries = BTreeMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            if winners.get(&descriptor.entry_id) != Some(&index) {
                debug!("Skipping replaced descriptor {index} ({})", descriptor.entry_id);
                continue;
            }
            let entry = decode_entry(&mut cursor, descriptor, &mut diagnostics);
            entries.insert(descriptor.entry_id, entry);
        }

        let label_color = entries
            .get(&EntryType::FinderInfo.code())
            .and_then(Entry::finder_info)
            .and_then(FinderInfo::label_color);
        debug!("Label color: {label_color:?}");

        Ok(Self {
            header,
            descriptors,
            entries,
            label_color,
            warnings: diagnostics.into_warnings(),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn magic(&self) -> [u8; 4] {
        self.header.magic
    }

    pub fn has_expected_magic(&self) -> bool {
        self.header.has_expected_magic()
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    pub fn reserved(&self) -> &[u8; 16] {
        &self.header.reserved
    }

    /// Number of descriptors declared by the header, duplicates included.
    pub fn entry_count(&self) -> u16 {
        self.header.entry_count
    }

    /// The descriptor table in file order.
    pub fn descriptors(&self) -> &[EntryDescriptor] {
        &self.descriptors
    }

    /// Entries by type code. A repeated type code keeps its last entry.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn entry(&self, type_code: u32) -> Option<&Entry> {
        self.entries.get(&type_code)
    }

    pub fn entry_of(&self, kind: EntryType) -> Option<&Entry> {
        self.entry(kind.code())
    }

    pub fn finder_info(&self) -> Option<&FinderInfo> {
        self.entry_of(EntryType::FinderInfo)?.finder_info()
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        self.entry_of(EntryType::FileInfo)?.file_info()
    }

    /// Finder Label color, if the Finder Info entry decoded and sets one.
    pub fn label_color(&self) -> Option<LabelColor> {
        self.label_color
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
