//! Fixed header and entry descriptor table.

use log::debug;

use crate::cursor::ByteCursor;
use crate::document::{Diagnostics, Warning};
use crate::error::{CursorError, DecodeError};
use crate::raw;

/// Canonical AppleDouble magic, `00 05 16 07`.
pub const MAGIC: [u8; 4] = raw::kAppleDoubleMagic.to_be_bytes();

/// The 26-byte file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Expected to be [`MAGIC`], but producers in the wild disagree.
    pub magic: [u8; 4],
    pub version: u32,
    /// Filler in version 2, home file system name in version 1. Not
    /// interpreted.
    pub reserved: [u8; 16],
    pub entry_count: u16,
}

impl Header {
    pub fn has_expected_magic(&self) -> bool {
        self.magic == MAGIC
    }
}

/// Location of one entry body, as stored in the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Entry type code. Not necessarily one of the known types.
    pub entry_id: u32,
    /// Absolute offset of the body from the start of the file.
    pub offset: u32,
    pub length: u32,
}

fn truncated(field: &'static str) -> impl FnOnce(CursorError) -> DecodeError {
    move |source| DecodeError::Truncated { field, source }
}

/// Read the header and the full descriptor table, in file order.
///
/// Leaves the cursor just past the table. An unexpected magic number is
/// reported to `diagnostics` and decoding continues.
pub fn decode_header(
    cursor: &mut ByteCursor<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<(Header, Vec<EntryDescriptor>), DecodeError> {
    let magic: [u8; 4] = cursor.read_array().map_err(truncated("magic"))?;
    let version = cursor.read_u32_be().map_err(truncated("version"))?;
    let reserved: [u8; 16] = cursor.read_array().map_err(truncated("reserved"))?;
    let entry_count = cursor.read_u16_be().map_err(truncated("entry count"))?;

    debug!("Magic bytes: {:#010x}", u32::from_be_bytes(magic));
    debug!("AppleDouble version {version:#010x}");
    debug!("Found {entry_count} entry descriptors");

    let header = Header {
        magic,
        version,
        reserved,
        entry_count,
    };

    if !header.has_expected_magic() {
        diagnostics.warn(Warning::UnexpectedMagic(magic));
    }

    let capacity = usize::from(entry_count).min(cursor.remaining() / raw::ENTRY_DESCRIPTOR_LENGTH);
    let mut descriptors = Vec::with_capacity(capacity);
    for _ in 0..entry_count {
        let entry_id = cursor.read_u32_be().map_err(truncated("entry id"))?;
        let offset = cursor.read_u32_be().map_err(truncated("entry offset"))?;
        let length = cursor.read_u32_be().map_err(truncated("entry length"))?;

        debug!("Descriptor: id {entry_id}, offset {offset}, length {length}");
        descriptors.push(EntryDescriptor {
            entry_id,
            offset,
            length,
        });
    }

    Ok((header, descriptors))
}
