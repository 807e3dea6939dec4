//! Entry bodies, classified by their type code.

use core::fmt;

use deku::prelude::*;
use finder_types::{ExtendedFinderInfo, FinderInfo, LABEL_MASK};
use log::debug;

use crate::cursor::ByteCursor;
use crate::document::{Diagnostics, Warning};
use crate::error::EntryError;
use crate::header::EntryDescriptor;
use crate::raw;

/// Entry types defined by Apple. IDs above 15 are not standardized.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryType {
    DataFork = 1,
    ResourceFork = 2,
    RealName = 3,
    Comment = 4,
    IconBw = 5,
    IconColor = 6,
    FileInfo = 7,
    FileDatesInfo = 8,
    FinderInfo = 9,
    MacintoshFileInfo = 10,
    ProdosFileInfo = 11,
    MsdosFileInfo = 12,
    AfpShortName = 13,
    AfpFileInfo = 14,
    AfpDirectoryId = 15,
}

impl EntryType {
    pub fn from_code(code: u32) -> Option<Self> {
        let kind = match code {
            1 => EntryType::DataFork,
            2 => EntryType::ResourceFork,
            3 => EntryType::RealName,
            4 => EntryType::Comment,
            5 => EntryType::IconBw,
            6 => EntryType::IconColor,
            7 => EntryType::FileInfo,
            8 => EntryType::FileDatesInfo,
            9 => EntryType::FinderInfo,
            10 => EntryType::MacintoshFileInfo,
            11 => EntryType::ProdosFileInfo,
            12 => EntryType::MsdosFileInfo,
            13 => EntryType::AfpShortName,
            14 => EntryType::AfpFileInfo,
            15 => EntryType::AfpDirectoryId,
            _ => return None,
        };
        Some(kind)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            EntryType::DataFork => "data_fork",
            EntryType::ResourceFork => "resource_fork",
            EntryType::RealName => "real_name",
            EntryType::Comment => "comment",
            EntryType::IconBw => "icon_bw",
            EntryType::IconColor => "icon_color",
            EntryType::FileInfo => "file_info",
            EntryType::FileDatesInfo => "file_dates_info",
            EntryType::FinderInfo => "finder_info",
            EntryType::MacintoshFileInfo => "macintosh_file_info",
            EntryType::ProdosFileInfo => "prodos_file_info",
            EntryType::MsdosFileInfo => "msdos_file_info",
            EntryType::AfpShortName => "afp_short_name",
            EntryType::AfpFileInfo => "afp_file_info",
            EntryType::AfpDirectoryId => "afp_directory_id",
        }
    }
}

impl TryFrom<u32> for EntryType {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        EntryType::from_code(value).ok_or(value)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw HFS-style date. Not interpreted.
pub type Date = u32;

/// File Info entry (type 7): three dates and 32 flag bits. Some SMB servers
/// write this entry as zeroes, which is still a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, DekuRead)]
#[deku(endian = "big")]
pub struct FileInfo {
    pub create_date: Date,
    pub modification_date: Date,
    pub backup_date: Date,
    pub flags: u32,
}

impl FileInfo {
    pub const SIZE: usize = raw::FILE_INFO_LENGTH;
}

/// Decoded payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    FinderInfo {
        info: FinderInfo,
        /// Present when the body carries the trailing 16 bytes of `FXInfo`.
        extended: Option<ExtendedFinderInfo>,
    },
    FileInfo(FileInfo),
    /// A known type whose body is kept as-is.
    Opaque,
    /// A type code outside the known set.
    Unknown,
    /// The body could not be read or decoded.
    Failed(EntryError),
}

/// One entry of a document. `data` holds the body bytes as stored, and is
/// empty when they lie outside the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub type_code: u32,
    pub offset: u32,
    pub length: u32,
    pub data: Vec<u8>,
    pub body: EntryBody,
}

impl Entry {
    pub fn kind(&self) -> Option<EntryType> {
        EntryType::from_code(self.type_code)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.body, EntryBody::Failed(_))
    }

    pub fn error(&self) -> Option<&EntryError> {
        match &self.body {
            EntryBody::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn finder_info(&self) -> Option<&FinderInfo> {
        match &self.body {
            EntryBody::FinderInfo { info, .. } => Some(info),
            _ => None,
        }
    }

    pub fn extended_finder_info(&self) -> Option<&ExtendedFinderInfo> {
        match &self.body {
            EntryBody::FinderInfo { extended, .. } => extended.as_ref(),
            _ => None,
        }
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        match &self.body {
            EntryBody::FileInfo(info) => Some(info),
            _ => None,
        }
    }
}

fn short_body(kind: EntryType, expected: usize, actual: usize) -> EntryError {
    EntryError::ShortBody {
        kind,
        expected,
        actual,
    }
}

/// Seek to the body and read it, refusing ranges that end past the buffer.
fn read_body<'a>(
    cursor: &mut ByteCursor<'a>,
    descriptor: &EntryDescriptor,
) -> Result<&'a [u8], EntryError> {
    let buffer_len = cursor.len();
    let out_of_bounds = || EntryError::OutOfBounds {
        offset: descriptor.offset,
        length: descriptor.length,
        buffer_len,
    };

    let end = u64::from(descriptor.offset) + u64::from(descriptor.length);
    if end > buffer_len as u64 {
        return Err(out_of_bounds());
    }

    cursor
        .seek_absolute(descriptor.offset as usize)
        .map_err(|_| out_of_bounds())?;
    cursor
        .read_bytes(descriptor.length as usize)
        .map_err(|_| out_of_bounds())
}

fn decode_finder_info(data: &[u8]) -> Result<EntryBody, EntryError> {
    let short = |_: DekuError| short_body(EntryType::FinderInfo, FinderInfo::SIZE, data.len());
    let (_rest, info) = FinderInfo::from_bytes((data, 0)).map_err(short)?;
    debug!(
        "  Type {}, creator {}, flags {:016b} with bitmask {:016b}",
        info.file_type, info.file_creator, info.finder_flags, LABEL_MASK
    );

    let extended = if data.len() >= FinderInfo::SIZE + ExtendedFinderInfo::SIZE {
        let (_rest, extended) =
            ExtendedFinderInfo::from_bytes((&data[FinderInfo::SIZE..], 0)).map_err(short)?;
        Some(extended)
    } else {
        None
    };

    Ok(EntryBody::FinderInfo { info, extended })
}

fn decode_file_info(data: &[u8]) -> Result<EntryBody, EntryError> {
    let (_rest, info) = FileInfo::from_bytes((data, 0))
        .map_err(|_: DekuError| short_body(EntryType::FileInfo, FileInfo::SIZE, data.len()))?;
    Ok(EntryBody::FileInfo(info))
}

/// Decode the entry a descriptor points at.
///
/// Never fails as a whole: problems are recorded in the returned entry's body
/// and reported to `diagnostics`.
pub fn decode_entry(
    cursor: &mut ByteCursor<'_>,
    descriptor: &EntryDescriptor,
    diagnostics: &mut Diagnostics,
) -> Entry {
    let type_code = descriptor.entry_id;
    let kind = EntryType::from_code(type_code);
    match kind {
        Some(kind) => debug!("Reading entry {type_code} ({kind})"),
        None => {
            debug!("Reading entry {type_code} (unknown)");
            diagnostics.warn(Warning::UnknownEntryType(type_code));
        }
    }

    let (data, decoded) = match read_body(cursor, descriptor) {
        Ok(data) => {
            let decoded = match kind {
                Some(EntryType::FinderInfo) => decode_finder_info(data),
                Some(EntryType::FileInfo) => decode_file_info(data),
                Some(_) => Ok(EntryBody::Opaque),
                None => Ok(EntryBody::Unknown),
            };
            (data.to_vec(), decoded)
        }
        Err(error) => (Vec::new(), Err(error)),
    };

    let body = decoded.unwrap_or_else(|error| {
        diagnostics.warn(Warning::EntryFailed {
            type_code,
            error: error.clone(),
        });
        EntryBody::Failed(error)
    });

    Entry {
        type_code,
        offset: descriptor.offset,
        length: descriptor.length,
        data,
        body,
    }
}

#[cfg(test)]
mod tests {
    use finder_types::{FourCharCode, LabelColor};

    use super::*;

    fn decode(buf: &[u8], entry_id: u32, offset: u32, length: u32) -> (Entry, Vec<Warning>) {
        let mut diagnostics = Diagnostics::default();
        let descriptor = EntryDescriptor {
            entry_id,
            offset,
            length,
        };
        let entry = decode_entry(&mut ByteCursor::new(buf), &descriptor, &mut diagnostics);
        (entry, diagnostics.into_warnings())
    }

    fn finder_info_body(flags: u16) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"TEXT");
        body.extend_from_slice(b"ttxt");
        body.extend_from_slice(&flags.to_be_bytes());
        body.extend_from_slice(&[0u8; 6]);
        body
    }

    #[test]
    fn entry_type_codes() {
        for code in 1..=15 {
            let kind = EntryType::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(EntryType::from_code(0), None);
        assert_eq!(EntryType::try_from(16), Err(16));
        assert_eq!(EntryType::try_from(9), Ok(EntryType::FinderInfo));
        assert_eq!(EntryType::AfpDirectoryId.to_string(), "afp_directory_id");
    }

    #[test]
    fn finder_info_entry() {
        let mut buf = vec![0xAA; 4];
        buf.extend(finder_info_body(0x000C));
        buf.extend_from_slice(&[0u8; 16]);

        let (entry, warnings) = decode(&buf, 9, 4, 32);
        let info = entry.finder_info().unwrap();
        assert_eq!(info.file_type, FourCharCode(*b"TEXT"));
        assert_eq!(info.file_creator, FourCharCode(*b"ttxt"));
        assert_eq!(info.label_color(), Some(LabelColor::Red));
        assert_eq!(
            entry.extended_finder_info(),
            Some(&ExtendedFinderInfo::default())
        );
        assert_eq!(entry.data.len(), 32);
        assert!(warnings.is_empty());
    }

    #[test]
    fn finder_info_without_extended_record() {
        let buf = finder_info_body(0x0002);
        let (entry, _) = decode(&buf, 9, 0, 16);

        assert!(entry.finder_info().is_some());
        assert_eq!(entry.extended_finder_info(), None);
    }

    #[test]
    fn short_finder_info_fails_alone() {
        let buf = finder_info_body(0x0004);
        let (entry, warnings) = decode(&buf, 9, 0, 10);

        let expected = EntryError::ShortBody {
            kind: EntryType::FinderInfo,
            expected: 16,
            actual: 10,
        };
        assert_eq!(entry.error(), Some(&expected));
        assert_eq!(entry.data, buf[..10].to_vec());
        assert_eq!(
            warnings,
            vec![Warning::EntryFailed {
                type_code: 9,
                error: expected
            }]
        );
    }

    #[test]
    fn short_file_info_fails_alone() {
        let buf = [0u8; 8];
        let (entry, warnings) = decode(&buf, 7, 0, 8);

        let expected = EntryError::ShortBody {
            kind: EntryType::FileInfo,
            expected: 16,
            actual: 8,
        };
        assert_eq!(entry.error(), Some(&expected));
        assert_eq!(entry.file_info(), None);
        assert_eq!(entry.data, vec![0u8; 8]);
        assert_eq!(
            warnings,
            vec![Warning::EntryFailed {
                type_code: 7,
                error: expected
            }]
        );
    }

    #[test]
    fn zeroed_file_info_is_valid() {
        let buf = [0u8; 16];
        let (entry, warnings) = decode(&buf, 7, 0, 16);

        assert_eq!(entry.file_info(), Some(&FileInfo::default()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn file_info_fields() {
        let mut buf = Vec::new();
        for value in [0xB5F0_0000u32, 0xB5F0_0010, 0x8000_0000, 0x0000_0001] {
            buf.extend_from_slice(&value.to_be_bytes());
        }
        let (entry, _) = decode(&buf, 7, 0, 16);

        assert_eq!(
            entry.file_info(),
            Some(&FileInfo {
                create_date: 0xB5F0_0000,
                modification_date: 0xB5F0_0010,
                backup_date: 0x8000_0000,
                flags: 1,
            })
        );
    }

    #[test]
    fn other_known_types_are_opaque() {
        let buf = b"\x00\x00hello resource fork";
        let (entry, warnings) = decode(buf, 2, 2, 19);

        assert_eq!(entry.kind(), Some(EntryType::ResourceFork));
        assert_eq!(entry.body, EntryBody::Opaque);
        assert_eq!(entry.data, b"hello resource fork".to_vec());
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_type_is_kept_with_a_warning() {
        let buf = [1, 2, 3, 4];
        let (entry, warnings) = decode(&buf, 255, 1, 2);

        assert_eq!(entry.kind(), None);
        assert_eq!(entry.body, EntryBody::Unknown);
        assert_eq!(entry.data, vec![2, 3]);
        assert_eq!(warnings, vec![Warning::UnknownEntryType(255)]);
    }

    #[test]
    fn unknown_type_out_of_bounds_warns_twice() {
        let buf = [0u8; 10];
        let (entry, warnings) = decode(&buf, 255, 8, 4);

        let expected = EntryError::OutOfBounds {
            offset: 8,
            length: 4,
            buffer_len: 10,
        };
        assert_eq!(entry.body, EntryBody::Failed(expected.clone()));
        assert!(entry.data.is_empty());
        assert_eq!(
            warnings,
            vec![
                Warning::UnknownEntryType(255),
                Warning::EntryFailed {
                    type_code: 255,
                    error: expected
                },
            ]
        );
    }

    #[test]
    fn out_of_bounds_body_is_not_read() {
        let buf = [0u8; 100];
        let (entry, warnings) = decode(&buf, 9, 1000, 50);

        let expected = EntryError::OutOfBounds {
            offset: 1000,
            length: 50,
            buffer_len: 100,
        };
        assert_eq!(entry.body, EntryBody::Failed(expected.clone()));
        assert!(entry.data.is_empty());
        assert_eq!(
            warnings,
            vec![Warning::EntryFailed {
                type_code: 9,
                error: expected
            }]
        );
    }

    #[test]
    fn length_overflow_is_out_of_bounds() {
        let buf = [0u8; 8];
        let (entry, _) = decode(&buf, 2, 4, u32::MAX);
        assert!(matches!(
            entry.error(),
            Some(EntryError::OutOfBounds { .. })
        ));

        // A body ending exactly at the end of the buffer is fine.
        let (entry, _) = decode(&buf, 2, 4, 4);
        assert!(!entry.is_failed());
    }
}
