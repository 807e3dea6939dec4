//! Unvalidated on-disk structures, retaining the naming and layout of Apple's
//! [AppleSingle/AppleDouble Formats for Foreign Files Developer's Note](http://kaiser-edv.de/documents/AppleSingle_AppleDouble.pdf).
//! All integers are big-endian on disk, so these are only used for sizes and
//! offsets; decoding goes through [`crate::cursor::ByteCursor`] and deku.
#![allow(non_snake_case, non_upper_case_globals, dead_code)]

use std::mem::size_of;

/// `AppleDouble` magic number.
pub const kAppleDoubleMagic: u32 = 0x0005_1607;

/// Version 2 of the format. Version 1 used a 16-byte home file system name in
/// place of the filler.
pub const kAppleDoubleVersion2: u32 = 0x0002_0000;

#[repr(C, packed)]
pub struct ASHeader {
    pub magicNum: u32,
    pub versionNum: u32,
    pub filler: [u8; 16],
    pub numEntries: u16,
}

#[repr(C, packed)]
pub struct ASEntry {
    pub entryID: u32,
    pub entryOffset: u32,
    pub entryLength: u32,
}

/// Entry 7 of version 1 files (Macintosh File Info in version 2).
#[repr(C, packed)]
pub struct ASFileInfo {
    pub fileCreateDate: u32,
    pub fileModDate: u32,
    pub fileBackupDate: u32,
    pub attribute: u32,
}

pub const HEADER_LENGTH: usize = size_of::<ASHeader>();
pub const ENTRY_DESCRIPTOR_LENGTH: usize = size_of::<ASEntry>();
pub const FILE_INFO_LENGTH: usize = size_of::<ASFileInfo>();
